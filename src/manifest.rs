//! manifest document and normalizer
//!
//! the raw manifest is the document produced by an external data-model
//! introspection step: models, crud mappings, and the schema's enum, input,
//! and output types. [`RawManifest::normalize`] classifies input types as
//! where/order-by shapes, prunes introspection-private fields, and verifies
//! that every type reference resolves within the document itself.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// kind of a referenced type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// built-in scalar
    Scalar,
    /// enum declared in the manifest
    Enum,
    /// object (output type or input type) declared in the manifest
    Object,
}

/// reference to a type, with list/required wrapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// referenced type name
    #[serde(rename = "type")]
    pub name: String,
    /// referenced type kind
    pub kind: TypeKind,
    /// list-valued reference
    #[serde(default)]
    pub is_list: bool,
    /// non-nullable reference
    #[serde(default)]
    pub is_required: bool,
}

/// one entity in the underlying data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// model name
    pub name: String,
    /// ordered model fields
    pub fields: Vec<ModelField>,
}

/// scalar or relation field of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelField {
    /// field name
    pub name: String,
    /// scalar/enum/object kind
    pub kind: TypeKind,
    /// target type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// list-valued field
    #[serde(default)]
    pub is_list: bool,
    /// non-nullable field
    #[serde(default)]
    pub is_required: bool,
}

/// per-model binding of crud operation names
///
/// each slot carries the name of the generated root field, when the model
/// supports the operation at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// model name
    pub model: String,
    /// find-one query field name
    #[serde(default)]
    pub find_one: Option<String>,
    /// find-many query field name
    #[serde(default)]
    pub find_many: Option<String>,
    /// create mutation field name
    #[serde(default)]
    pub create: Option<String>,
    /// update mutation field name
    #[serde(default)]
    pub update: Option<String>,
    /// upsert mutation field name
    #[serde(default)]
    pub upsert: Option<String>,
    /// delete mutation field name
    #[serde(default)]
    pub delete: Option<String>,
}

/// enum declared by the manifest schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumType {
    /// enum name
    pub name: String,
    /// member values
    pub values: Vec<String>,
}

/// argument accepted by an output field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArg {
    /// argument name
    pub name: String,
    /// argument type reference
    pub input_type: TypeRef,
}

/// field of an output type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    /// field name
    pub name: String,
    /// return type reference
    pub output_type: TypeRef,
    /// accepted arguments
    #[serde(default)]
    pub args: Vec<SchemaArg>,
}

/// named output type with ordered fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputType {
    /// type name
    pub name: String,
    /// ordered fields
    pub fields: Vec<OutputField>,
}

/// field of an input type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// field name
    pub name: String,
    /// field type reference
    pub input_type: TypeRef,
}

/// input type as the introspection tool emits it, before classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInputType {
    /// type name
    pub name: String,
    /// ordered fields
    pub fields: Vec<InputField>,
}

/// normalized input type
///
/// the where/order classification is computed once during normalization and
/// immutable afterwards; it drives naming and recursion decisions downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputType {
    /// type name
    pub name: String,
    /// true if this is some model's where-filter input
    pub is_where_type: bool,
    /// true if this is some model's order-by input
    pub is_order_type: bool,
    /// ordered fields
    pub fields: Vec<InputField>,
}

/// schema section of the raw manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    /// declared enums
    #[serde(default)]
    pub enums: Vec<EnumType>,
    /// declared input types
    #[serde(default)]
    pub input_types: Vec<RawInputType>,
    /// declared output types, including the Query and Mutation roots
    #[serde(default)]
    pub output_types: Vec<OutputType>,
}

/// datamodel section of the raw manifest
#[derive(Debug, Clone, Deserialize)]
pub struct RawDatamodel {
    /// declared models
    pub models: Vec<Model>,
}

/// raw manifest document as produced by the external introspection step
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    /// models section
    pub datamodel: RawDatamodel,
    /// schema section
    pub schema: RawSchema,
    /// per-model operation mappings
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

/// normalized manifest, immutable for the rest of the generation run
#[derive(Debug, Clone)]
pub struct Manifest {
    /// models in declaration order
    pub models: Vec<Model>,
    /// per-model operation mappings
    pub mappings: Vec<Mapping>,
    /// declared enums
    pub enums: Vec<EnumType>,
    /// classified input types
    pub input_types: Vec<InputType>,
    /// output types, including the Query and Mutation roots
    pub output_types: Vec<OutputType>,
}

impl RawManifest {
    /// parse a raw manifest from its json encoding
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// normalize the document per the generation rules
    ///
    /// classifies input types, strips `__`-prefixed introspection-private
    /// fields, and fails with [`Error::MalformedManifest`] when any type
    /// reference cannot be resolved within the document.
    pub fn normalize(self) -> Result<Manifest> {
        let model_names: BTreeSet<&str> = self
            .datamodel
            .models
            .iter()
            .map(|m| m.name.as_str())
            .collect();

        let input_types: Vec<InputType> = self
            .schema
            .input_types
            .into_iter()
            .map(|input| {
                let (is_where, is_order) = classify_input(&input.name, &model_names);
                InputType {
                    name: input.name,
                    is_where_type: is_where,
                    is_order_type: is_order,
                    fields: input
                        .fields
                        .into_iter()
                        .filter(|f| !is_private(&f.name))
                        .collect(),
                }
            })
            .collect();

        let output_types: Vec<OutputType> = self
            .schema
            .output_types
            .into_iter()
            .map(|output| OutputType {
                name: output.name,
                fields: output
                    .fields
                    .into_iter()
                    .filter(|f| !is_private(&f.name))
                    .collect(),
            })
            .collect();

        let manifest = Manifest {
            models: self.datamodel.models,
            mappings: self.mappings,
            enums: self.schema.enums,
            input_types,
            output_types,
        };

        manifest.check_references()?;

        debug!(
            models = manifest.models.len(),
            input_types = manifest.input_types.len(),
            output_types = manifest.output_types.len(),
            enums = manifest.enums.len(),
            "normalized manifest"
        );

        Ok(manifest)
    }
}

impl Manifest {
    /// verify that every enum/object reference resolves within the manifest
    fn check_references(&self) -> Result<()> {
        let enums: BTreeSet<&str> = self.enums.iter().map(|e| e.name.as_str()).collect();
        let inputs: BTreeSet<&str> = self.input_types.iter().map(|i| i.name.as_str()).collect();
        let outputs: BTreeSet<&str> = self.output_types.iter().map(|o| o.name.as_str()).collect();

        let check_input_ref = |type_ref: &TypeRef, context: String| -> Result<()> {
            let known = match type_ref.kind {
                TypeKind::Scalar => true,
                TypeKind::Enum => enums.contains(type_ref.name.as_str()),
                TypeKind::Object => inputs.contains(type_ref.name.as_str()),
            };
            if known {
                Ok(())
            } else {
                Err(Error::MalformedManifest {
                    type_name: type_ref.name.clone(),
                    context,
                })
            }
        };

        for output in &self.output_types {
            for field in &output.fields {
                if field.output_type.kind == TypeKind::Object
                    && !outputs.contains(field.output_type.name.as_str())
                {
                    return Err(Error::MalformedManifest {
                        type_name: field.output_type.name.clone(),
                        context: format!("output field {}.{}", output.name, field.name),
                    });
                }
                if field.output_type.kind == TypeKind::Enum
                    && !enums.contains(field.output_type.name.as_str())
                {
                    return Err(Error::MalformedManifest {
                        type_name: field.output_type.name.clone(),
                        context: format!("output field {}.{}", output.name, field.name),
                    });
                }
                for arg in &field.args {
                    check_input_ref(
                        &arg.input_type,
                        format!("argument {}.{}.{}", output.name, field.name, arg.name),
                    )?;
                }
            }
        }

        for input in &self.input_types {
            for field in &input.fields {
                check_input_ref(
                    &field.input_type,
                    format!("input field {}.{}", input.name, field.name),
                )?;
            }
        }

        Ok(())
    }
}

/// where/order classification by name against the owning model
fn classify_input(name: &str, model_names: &BTreeSet<&str>) -> (bool, bool) {
    let is_where = name
        .strip_suffix("WhereInput")
        .map(|stem| model_names.contains(stem))
        .unwrap_or(false);
    let is_order = name
        .strip_suffix("OrderByInput")
        .map(|stem| model_names.contains(stem))
        .unwrap_or(false);
    (is_where, is_order)
}

/// introspection-private scaffolding fields are pruned during normalization
fn is_private(field_name: &str) -> bool {
    field_name.starts_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawManifest {
        serde_json::from_value(json).expect("raw manifest")
    }

    #[test]
    fn test_classify_where_and_order_inputs() {
        let manifest = raw(serde_json::json!({
            "datamodel": { "models": [{ "name": "Blog", "fields": [] }] },
            "schema": {
                "inputTypes": [
                    { "name": "BlogWhereInput", "fields": [] },
                    { "name": "BlogOrderByInput", "fields": [] },
                    { "name": "BlogWhereUniqueInput", "fields": [] },
                    { "name": "PostWhereInput", "fields": [] }
                ],
                "outputTypes": []
            },
            "mappings": []
        }))
        .normalize()
        .expect("normalize");

        let flags: Vec<(bool, bool)> = manifest
            .input_types
            .iter()
            .map(|i| (i.is_where_type, i.is_order_type))
            .collect();
        // BlogWhereUniqueInput is not a where type; PostWhereInput has no owning model
        assert_eq!(
            flags,
            vec![(true, false), (false, true), (false, false), (false, false)]
        );
    }

    #[test]
    fn test_prunes_private_fields() {
        let manifest = raw(serde_json::json!({
            "datamodel": { "models": [] },
            "schema": {
                "inputTypes": [{
                    "name": "Probe",
                    "fields": [
                        { "name": "__internal", "inputType": { "type": "String", "kind": "scalar" } },
                        { "name": "kept", "inputType": { "type": "String", "kind": "scalar" } }
                    ]
                }],
                "outputTypes": [{
                    "name": "Query",
                    "fields": [{
                        "name": "__schema",
                        "outputType": { "type": "String", "kind": "scalar" },
                        "args": []
                    }]
                }]
            },
            "mappings": []
        }))
        .normalize()
        .expect("normalize");

        assert_eq!(manifest.input_types[0].fields.len(), 1);
        assert_eq!(manifest.input_types[0].fields[0].name, "kept");
        assert!(manifest.output_types[0].fields.is_empty());
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let err = raw(serde_json::json!({
            "datamodel": { "models": [] },
            "schema": {
                "inputTypes": [{
                    "name": "BlogWhereInput",
                    "fields": [
                        { "name": "ghost", "inputType": { "type": "GhostInput", "kind": "object" } }
                    ]
                }],
                "outputTypes": []
            },
            "mappings": []
        }))
        .normalize()
        .expect_err("unresolved reference");

        match err {
            Error::MalformedManifest { type_name, context } => {
                assert_eq!(type_name, "GhostInput");
                assert_eq!(context, "input field BlogWhereInput.ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_arg_reference_is_fatal() {
        let err = raw(serde_json::json!({
            "datamodel": { "models": [] },
            "schema": {
                "inputTypes": [],
                "outputTypes": [{
                    "name": "Query",
                    "fields": [{
                        "name": "blogs",
                        "outputType": { "type": "String", "kind": "scalar" },
                        "args": [
                            { "name": "where", "inputType": { "type": "BlogWhereInput", "kind": "object" } }
                        ]
                    }]
                }]
            },
            "mappings": []
        }))
        .normalize()
        .expect_err("unresolved arg");

        assert!(err.to_string().contains("Query.blogs.where"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(RawManifest::from_json("not json").is_err());
    }
}
