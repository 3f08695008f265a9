//! manifest index
//!
//! read-only lookup structure over a normalized manifest: models, mappings,
//! enums, input types, output types, and the pre-located Query/Mutation
//! roots. lookup misses are fatal manifest-consistency bugs and carry the
//! caller context that triggered them.

use crate::error::{Error, Result};
use crate::manifest::{EnumType, InputType, Manifest, Mapping, Model, OutputType};
use std::collections::BTreeMap;

/// indexed view over a normalized manifest
#[derive(Debug)]
pub struct ManifestIndex {
    manifest: Manifest,
    models: BTreeMap<String, usize>,
    mappings: BTreeMap<String, usize>,
    enums: BTreeMap<String, usize>,
    inputs: BTreeMap<String, usize>,
    outputs: BTreeMap<String, usize>,
    query: usize,
    mutation: Option<usize>,
}

fn positions<T>(items: &[T], name: impl Fn(&T) -> &str) -> BTreeMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| (name(item).to_string(), idx))
        .collect()
}

impl ManifestIndex {
    /// build the index, locating the Query root (required) and Mutation root
    pub fn new(manifest: Manifest) -> Result<Self> {
        let models = positions(&manifest.models, |m| m.name.as_str());
        let mappings = positions(&manifest.mappings, |m| m.model.as_str());
        let enums = positions(&manifest.enums, |e| e.name.as_str());
        let inputs = positions(&manifest.input_types, |i| i.name.as_str());
        let outputs = positions(&manifest.output_types, |o| o.name.as_str());

        let query = *outputs.get("Query").ok_or_else(|| Error::NotFound {
            kind: "output type",
            name: "Query".to_string(),
            context: "manifest index".to_string(),
        })?;
        let mutation = outputs.get("Mutation").copied();

        Ok(Self {
            manifest,
            models,
            mappings,
            enums,
            inputs,
            outputs,
            query,
            mutation,
        })
    }

    /// the normalized manifest behind the index
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// the Query root type
    pub fn query_type(&self) -> &OutputType {
        &self.manifest.output_types[self.query]
    }

    /// the Mutation root type, if the manifest declares one
    pub fn mutation_type(&self) -> Option<&OutputType> {
        self.mutation.map(|idx| &self.manifest.output_types[idx])
    }

    /// look up a model by name
    pub fn model(&self, name: &str, context: &str) -> Result<&Model> {
        self.models
            .get(name)
            .map(|&idx| &self.manifest.models[idx])
            .ok_or_else(|| miss("model", name, context))
    }

    /// look up a model's operation mapping
    pub fn mapping(&self, model_name: &str, context: &str) -> Result<&Mapping> {
        self.mappings
            .get(model_name)
            .map(|&idx| &self.manifest.mappings[idx])
            .ok_or_else(|| miss("mapping", model_name, context))
    }

    /// look up an enum by name
    pub fn enum_type(&self, name: &str, context: &str) -> Result<&EnumType> {
        self.enums
            .get(name)
            .map(|&idx| &self.manifest.enums[idx])
            .ok_or_else(|| miss("enum", name, context))
    }

    /// look up an input type by name
    pub fn input_type(&self, name: &str, context: &str) -> Result<&InputType> {
        self.inputs
            .get(name)
            .map(|&idx| &self.manifest.input_types[idx])
            .ok_or_else(|| miss("input type", name, context))
    }

    /// look up an output type by name
    pub fn output_type(&self, name: &str, context: &str) -> Result<&OutputType> {
        self.outputs
            .get(name)
            .map(|&idx| &self.manifest.output_types[idx])
            .ok_or_else(|| miss("output type", name, context))
    }
}

fn miss(kind: &'static str, name: &str, context: &str) -> Error {
    Error::NotFound {
        kind,
        name: name.to_string(),
        context: context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::RawManifest;

    fn index() -> ManifestIndex {
        let raw: RawManifest = serde_json::from_value(serde_json::json!({
            "datamodel": { "models": [{ "name": "Blog", "fields": [] }] },
            "schema": {
                "enums": [{ "name": "OrderByDirection", "values": ["asc", "desc"] }],
                "inputTypes": [{ "name": "BlogWhereInput", "fields": [] }],
                "outputTypes": [
                    { "name": "Query", "fields": [] },
                    { "name": "Blog", "fields": [] }
                ]
            },
            "mappings": [{ "model": "Blog", "findMany": "blogs" }]
        }))
        .expect("raw manifest");
        ManifestIndex::new(raw.normalize().expect("normalize")).expect("index")
    }

    #[test]
    fn test_lookups() {
        let index = index();
        assert_eq!(index.model("Blog", "test").unwrap().name, "Blog");
        assert_eq!(
            index.mapping("Blog", "test").unwrap().find_many.as_deref(),
            Some("blogs")
        );
        assert_eq!(
            index.enum_type("OrderByDirection", "test").unwrap().values,
            vec!["asc", "desc"]
        );
        assert!(index.input_type("BlogWhereInput", "test").is_ok());
        assert_eq!(index.query_type().name, "Query");
        assert!(index.mutation_type().is_none());
    }

    #[test]
    fn test_miss_carries_context() {
        let index = index();
        let err = index.model("Post", "Query.posts").unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not find model `Post` while building Query.posts"
        );
    }

    #[test]
    fn test_query_root_is_required() {
        let raw: RawManifest = serde_json::from_value(serde_json::json!({
            "datamodel": { "models": [] },
            "schema": { "inputTypes": [], "outputTypes": [] },
            "mappings": []
        }))
        .expect("raw manifest");
        assert!(ManifestIndex::new(raw.normalize().expect("normalize")).is_err());
    }
}
