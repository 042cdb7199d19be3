//! Tests for `#[derive(Mappable)]` and `#[derive(MapEnum)]`.

use stringmap::{
    EnumShape, MapEnum, MapError, Mappable, MemberFlags, Mutate, Scalar, ShapeKind, StringMap,
    Value,
};

// =============================================================================
// Structs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Mappable)]
#[stringmap(rename = "OrderKey")]
struct Key {
    #[stringmap(rename = "Pair")]
    currency_pair: String,
    sequence: u64,
    #[stringmap(skip)]
    cached: Vec<u8>,
}

#[test]
fn test_describe_named_struct() {
    let shape = Key::describe();
    assert_eq!(shape.name, "OrderKey");
    assert_eq!(shape.kind, ShapeKind::Record);

    let names: Vec<_> = shape.members.iter().map(|m| m.name).collect();
    assert_eq!(names, ["Pair", "sequence"]);
    assert_eq!(shape.members[1].type_name, "u64");
    assert_eq!(shape.members[0].flags, MemberFlags::READ);
    assert_eq!(shape.constructors.len(), 1);
    assert_eq!(shape.constructors[0].params, ["Pair", "sequence"]);
}

#[test]
fn test_renamed_member_in_template() {
    let map = StringMap::<Key>::new("keys/{Pair}/{Sequence:D6}");
    let key = Key {
        currency_pair: "btc-usd".to_string(),
        sequence: 42,
        cached: vec![1, 2, 3],
    };

    assert_eq!(map.render(&key, false).unwrap(), "keys/btc-usd/000042");

    let parsed = map.parse("keys/btc-usd/000042").unwrap().unwrap();
    assert_eq!(parsed.currency_pair, "btc-usd");
    assert_eq!(parsed.sequence, 42);
    assert!(parsed.cached.is_empty());
}

#[test]
fn test_field_name_is_not_addressable_after_rename() {
    let map = StringMap::<Key>::new("keys/{CurrencyPair}");
    assert_eq!(
        map.parse("keys/x").unwrap_err(),
        MapError::UnknownMember {
            member: "CurrencyPair".to_string(),
            type_name: "OrderKey",
        }
    );
}

#[test]
fn test_member_values() {
    let key = Key {
        currency_pair: "eth-eur".to_string(),
        sequence: 1,
        cached: Vec::new(),
    };
    assert_eq!(key.member_value(0), Value::from("eth-eur"));
    assert_eq!(key.member_value(1), Value::from(1u64));
    assert_eq!(key.member_value(2), Value::Null);
}

#[test]
fn test_mutate_keeps_skipped_fields() {
    let key = Key {
        currency_pair: "a".to_string(),
        sequence: 1,
        cached: vec![1, 2, 3],
    };
    assert_eq!(key.mutate().build().unwrap(), key);

    let next = key.mutate().set("Sequence", 2u64).build().unwrap();
    assert_eq!(next.sequence, 2);
    assert_eq!(next.cached, [1, 2, 3]);
}

/// Built through `Window::new`; `len` is derived from the parameters.
#[derive(Debug, PartialEq, Mappable)]
#[stringmap(constructor = "Window::new")]
struct Window {
    start: u32,
    end: u32,
    #[stringmap(skip)]
    len: u32,
}

impl Window {
    fn new(start: u32, end: u32) -> Self {
        Window {
            start,
            end,
            len: end.saturating_sub(start),
        }
    }
}

#[test]
fn test_custom_constructor() {
    let map = StringMap::<Window>::new("range/{start}/{end}");
    assert_eq!(map.parse("range/3/10").unwrap(), Some(Window::new(3, 10)));
    assert_eq!(map.parse("range/3/10").unwrap().map(|w| w.len), Some(7));
    assert_eq!(map.render(&Window::new(1, 2), false).unwrap(), "range/1/2");
}

#[test]
fn test_custom_constructor_recomputes_skipped_fields() {
    let window = Window::new(3, 10);
    assert_eq!(window.mutate().build().unwrap(), window);
    assert_eq!(window.mutate().set("end", 4u32).build().unwrap().len, 1);
}

#[derive(Debug, PartialEq, Mappable)]
struct Version(u32, u32);

#[test]
fn test_tuple_struct_members_are_positional() {
    let map = StringMap::<Version>::new("v{0}.{1}");
    assert_eq!(map.parse("v1.2").unwrap(), Some(Version(1, 2)));
    assert_eq!(map.render(&Version(3, 14), false).unwrap(), "v3.14");
}

#[derive(Debug, PartialEq, Mappable)]
struct Root;

#[test]
fn test_unit_struct() {
    let map = StringMap::<Root>::new("root");
    assert_eq!(map.parse("root").unwrap(), Some(Root));
    assert_eq!(map.render(&Root, false).unwrap(), "root");
    assert!(Root::describe().members.is_empty());
}

#[derive(Debug, PartialEq, Mappable)]
struct Keyed<K> {
    key: K,
    #[stringmap(set)]
    version: Option<u32>,
}

#[test]
fn test_generic_struct() {
    let map = StringMap::<Keyed<u64>>::new("k/{key}/{version}");
    assert_eq!(
        map.parse("k/7/2").unwrap(),
        Some(Keyed {
            key: 7,
            version: Some(2)
        })
    );

    let partial = Keyed::<u64> {
        key: 7,
        version: None,
    };
    assert_eq!(map.render(&partial, true).unwrap(), "k/7/");

    let shape = Keyed::<u64>::describe();
    assert_eq!(
        shape.members[1].flags,
        MemberFlags::READ | MemberFlags::WRITE
    );
    assert_eq!(shape.constructors[0].params, ["key"]);
}

#[test]
fn test_set_member_rejects_constructor_members() {
    let mut keyed = Keyed::<u64> {
        key: 1,
        version: None,
    };
    keyed.set_member(1, Value::from(5u32)).unwrap();
    assert_eq!(keyed.version, Some(5));
    assert!(matches!(
        keyed.set_member(0, Value::from(2u64)),
        Err(MapError::UnsupportedShape { .. })
    ));
}

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, MapEnum)]
enum Asset {
    #[stringmap(rename = "BTC")]
    Bitcoin,
    Ether,
    StableCoin = 10,
}

#[test]
fn test_enum_variant_table() {
    let names: Vec<_> = Asset::VARIANTS.iter().map(|m| m.name).collect();
    assert_eq!(names, ["BTC", "Ether", "StableCoin"]);

    let ordinals: Vec<_> = Asset::VARIANTS.iter().map(|m| m.ordinal).collect();
    assert_eq!(ordinals, [0, 1, 10]);

    assert_eq!(Asset::StableCoin.member().name, "StableCoin");
    assert_eq!(Asset::default_variant(), Some(Asset::Bitcoin));
}

#[test]
fn test_enum_scalar() {
    assert_eq!(Asset::parse_text("stable-coin", None).unwrap(), Some(Asset::StableCoin));
    assert_eq!(Asset::parse_text("10", Some("i")).unwrap(), Some(Asset::StableCoin));
    assert_eq!(Asset::parse_text("BTC", Some("p")).unwrap(), Some(Asset::Bitcoin));
    assert_eq!(Asset::parse_text("Bitcoin", Some("p")).unwrap(), None);

    assert_eq!(Asset::Bitcoin.render_text(None).unwrap(), Some("btc".to_string()));
    assert_eq!(Asset::StableCoin.render_text(Some("c")).unwrap(), Some("stableCoin".to_string()));
}

#[test]
fn test_enum_from_value() {
    assert_eq!(Asset::from_value(Value::Null), Ok(Asset::Bitcoin));
    assert_eq!(Asset::from_value(Value::Int(1)), Ok(Asset::Ether));
    assert_eq!(Asset::from_value(Value::from("ether")), Ok(Asset::Ether));
    assert_eq!(Asset::from_value(Value::from(Asset::StableCoin)), Ok(Asset::StableCoin));
    assert!(Asset::from_value(Value::Int(2)).is_err());
}

#[test]
fn test_enum_is_a_scalar_target() {
    let shape = Asset::describe();
    assert!(shape.is_scalar());
    assert_eq!(shape.name, "Asset");

    let map = StringMap::<Asset>::new("assets/{this:p}");
    assert_eq!(map.parse("assets/Ether").unwrap(), Some(Asset::Ether));
    assert_eq!(map.render(&Asset::Bitcoin, false).unwrap(), "assets/BTC");
}
