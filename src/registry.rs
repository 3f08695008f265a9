//! type registry for one generation run
//!
//! tracks which generated type names have already been materialized and which
//! fields a restricted input type may expose. state is owned by a single
//! [`crate::FieldBuilder`] and never shared across generation runs.

use std::collections::{BTreeMap, BTreeSet};

/// built-types map plus whitelist map, growing monotonically over one run
#[derive(Debug, Default)]
pub struct TypeRegistry {
    built: BTreeSet<String>,
    whitelists: BTreeMap<String, Vec<String>>,
}

impl TypeRegistry {
    /// create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// true if a type of this name was already materialized
    pub fn has_type(&self, name: &str) -> bool {
        self.built.contains(name)
    }

    /// record a type name as materialized
    ///
    /// callers mark a name before recursing into its fields so that cyclic
    /// references short-circuit to a reference instead of re-expanding.
    pub fn mark_built(&mut self, name: impl Into<String>) {
        self.built.insert(name.into());
    }

    /// restrict a generated type to the given field names
    pub fn set_whitelist(&mut self, name: impl Into<String>, fields: Vec<String>) {
        self.whitelists.insert(name.into(), fields);
    }

    /// permitted field names for a generated type, if restricted
    pub fn whitelist(&self, name: &str) -> Option<&[String]> {
        self.whitelists.get(name).map(|fields| fields.as_slice())
    }

    /// number of materialized type names
    pub fn built_count(&self) -> usize {
        self.built.len()
    }
}
