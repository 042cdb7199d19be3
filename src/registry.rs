//! Process-wide cache of analysed type shapes.
//!
//! Each [`Mappable`] type is described and analysed once. Concurrent first
//! callers may both analyse a type; the first entry inserted is kept and
//! handed to every caller.

use std::any::TypeId;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use stringmap_core::{Mappable, MapError, Result, TypeShape, member_key};

/// How the builder assembles a value: the constructor's parameters and the
/// settable members it does not cover, as member indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionPlan {
    pub params: Vec<usize>,
    pub setters: Vec<usize>,
}

/// A type shape with its member index and construction plan.
#[derive(Debug)]
pub struct ShapeEntry {
    pub shape: TypeShape,
    members_by_key: FxHashMap<String, usize>,
    plan: Result<ConstructionPlan>,
}

impl ShapeEntry {
    pub fn analyse(shape: TypeShape) -> Self {
        let mut members_by_key = FxHashMap::default();
        for (index, member) in shape.members.iter().enumerate() {
            members_by_key.entry(member.key()).or_insert(index);
        }

        let plan = plan_construction(&shape, &members_by_key);

        tracing::debug!(
            type_name = shape.name,
            members = shape.members.len(),
            constructible = plan.is_ok(),
            "analysed type shape"
        );

        ShapeEntry {
            shape,
            members_by_key,
            plan,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.name
    }

    /// Index of the member addressed by `name`.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members_by_key.get(&member_key(name)).copied()
    }

    pub fn plan(&self) -> Result<&ConstructionPlan> {
        self.plan.as_ref().map_err(Clone::clone)
    }
}

fn plan_construction(
    shape: &TypeShape,
    members_by_key: &FxHashMap<String, usize>,
) -> Result<ConstructionPlan> {
    let [constructor] = shape.constructors.as_slice() else {
        return Err(MapError::unsupported_shape(
            shape.name,
            format!(
                "expected exactly one constructor, found {}",
                shape.constructors.len()
            ),
        ));
    };

    let params = constructor
        .params
        .iter()
        .map(|param| {
            members_by_key.get(&member_key(param)).copied().ok_or_else(|| {
                MapError::unsupported_shape(
                    shape.name,
                    format!("constructor parameter `{param}` has no matching member"),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let setters = shape
        .members
        .iter()
        .enumerate()
        .filter(|(index, member)| member.is_writable() && !params.contains(index))
        .map(|(index, _)| index)
        .collect();

    Ok(ConstructionPlan { params, setters })
}

type Registry = RwLock<FxHashMap<TypeId, Arc<ShapeEntry>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::default)
}

/// The analysed shape of `T`.
pub fn entry<T: Mappable + 'static>() -> Arc<ShapeEntry> {
    let id = TypeId::of::<T>();

    {
        let entries = registry().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&id) {
            return Arc::clone(entry);
        }
    }

    let analysed = Arc::new(ShapeEntry::analyse(T::describe()));
    let mut entries = registry().write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(entries.entry(id).or_insert(analysed))
}
