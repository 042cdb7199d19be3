//! Case conversion between train-case, PascalCase and camelCase.
//!
//! Used by the enum coercion modes. A word is one of:
//!
//! - an ASCII uppercase run not followed by a lowercase letter (`HTTP` in `HTTPServer`)
//! - a digit run
//! - an uppercase letter followed by lowercase letters
//! - a lowercase run
//! - a single `.`, which is kept as a separator between dotted parts
//!
//! Every other character separates words and is dropped.
//!
//! ```
//! use stringmap_core::naming;
//!
//! assert_eq!(naming::train_to_pascal("alfa-bravo.charlie-delta"), "AlfaBravo.CharlieDelta");
//! assert_eq!(naming::pascal_to_train("AlfaBravo.CharlieDelta"), "alfa-bravo.charlie-delta");
//! ```

/// Split `source` into words.
pub fn words(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let start = i;

        if b.is_ascii_uppercase() {
            let mut end = i;
            while end < bytes.len() && bytes[end].is_ascii_uppercase() {
                end += 1;
            }
            let followed_by_lower = end < bytes.len() && bytes[end].is_ascii_lowercase();

            if !followed_by_lower {
                i = end;
            } else if end - start > 1 {
                // The last capital starts the next word
                i = end - 1;
            } else {
                i = end;
                while i < bytes.len() && bytes[i].is_ascii_lowercase() {
                    i += 1;
                }
            }
        } else if b.is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        } else if b.is_ascii_lowercase() {
            while i < bytes.len() && bytes[i].is_ascii_lowercase() {
                i += 1;
            }
        } else if b == b'.' {
            i += 1;
        } else {
            // Separator (or a non-ASCII byte); skip a whole char
            i += source[i..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        words.push(&source[start..i]);
    }

    words
}

fn capitalize(word: &str, out: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        for ch in chars {
            out.push(ch.to_ascii_lowercase());
        }
    }
}

fn is_blank(source: &str) -> bool {
    source.trim().is_empty()
}

fn join_pascal(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for word in words(source) {
        capitalize(word, &mut out);
    }
    out
}

fn join_train(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 4);
    let mut prev: Option<&str> = None;
    for word in words(source) {
        if let Some(prev) = prev
            && word != "."
            && prev != "."
        {
            out.push('-');
        }
        out.push_str(&word.to_ascii_lowercase());
        prev = Some(word);
    }
    out
}

fn join_camel(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut first = true;
    for word in words(source) {
        if word == "." {
            out.push('.');
            first = true;
        } else if first {
            out.push_str(&word.to_ascii_lowercase());
            first = false;
        } else {
            capitalize(word, &mut out);
        }
    }
    out
}

/// `alfa-bravo` → `AlfaBravo`
pub fn train_to_pascal(source: &str) -> String {
    if is_blank(source) {
        return source.to_string();
    }
    join_pascal(source)
}

/// `AlfaBravo` → `alfa-bravo`
pub fn pascal_to_train(source: &str) -> String {
    if is_blank(source) {
        return source.to_string();
    }
    join_train(source)
}

/// `alfa-bravo` → `alfaBravo`
pub fn train_to_camel(source: &str) -> String {
    if is_blank(source) {
        return source.to_string();
    }
    join_camel(source)
}

/// `alfaBravo` → `alfa-bravo`
pub fn camel_to_train(source: &str) -> String {
    pascal_to_train(source)
}

/// `AlfaBravo` → `alfaBravo`
pub fn pascal_to_camel(source: &str) -> String {
    train_to_camel(source)
}

/// `alfaBravo` → `AlfaBravo`
pub fn camel_to_pascal(source: &str) -> String {
    train_to_pascal(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_to_pascal_keeps_dots() {
        assert_eq!(train_to_pascal("alfa-bravo.charlie-delta"), "AlfaBravo.CharlieDelta");
    }

    #[test]
    fn pascal_to_train_keeps_dots() {
        assert_eq!(pascal_to_train("AlfaBravo.CharlieDelta"), "alfa-bravo.charlie-delta");
    }

    #[test]
    fn train_to_camel_lowers_after_dot() {
        assert_eq!(train_to_camel("alfa-bravo.charlie-delta"), "alfaBravo.charlieDelta");
    }

    #[test]
    fn camel_to_train_splits_humps() {
        assert_eq!(camel_to_train("alfaBravo.charlieDelta"), "alfa-bravo.charlie-delta");
    }

    #[test]
    fn pascal_to_camel_lowers_first_word() {
        assert_eq!(pascal_to_camel("AlfaBravo.CharlieDelta"), "alfaBravo.charlieDelta");
    }

    #[test]
    fn camel_to_pascal_raises_first_word() {
        assert_eq!(camel_to_pascal("alfaBravo.charlieDelta"), "AlfaBravo.CharlieDelta");
    }

    #[test]
    fn acronyms_and_digits_are_words() {
        assert_eq!(words("HTTPServer2Go"), vec!["HTTP", "Server", "2", "Go"]);
        assert_eq!(pascal_to_train("HTTPServer"), "http-server");
        assert_eq!(pascal_to_train("IPv6"), "i-pv-6");
    }

    #[test]
    fn separators_are_dropped() {
        assert_eq!(words("alfa_bravo charlie"), vec!["alfa", "bravo", "charlie"]);
        assert_eq!(train_to_pascal("alfa_bravo"), "AlfaBravo");
    }

    #[test]
    fn blank_input_is_returned_unchanged() {
        assert_eq!(train_to_pascal(""), "");
        assert_eq!(pascal_to_train("  "), "  ");
    }
}
