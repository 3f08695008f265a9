//! static type renderer
//!
//! renders a text artifact of static type declarations mirroring the runtime
//! field surface: per model, the Query/Mutation/Read operations with their
//! return type names, and for every list-valued object field the permitted
//! filtering and ordering key sets. the renderer walks the same normalized
//! manifest the field builder consumes, so both surfaces agree on names.

use crate::error::{Error, Result};
use crate::manifest::{InputType, Manifest, Mapping, OutputField, OutputType, TypeKind};

/// render the full declaration text for a normalized manifest
///
/// output is deterministic: models and fields appear in declaration order.
pub fn render_type_declarations(manifest: &Manifest) -> Result<String> {
    let mut out = String::new();
    out.push_str("// generated type declarations; do not edit\n\n");
    out.push_str(&render_model_types(manifest));
    out.push('\n');
    out.push_str(&render_surface_inputs(manifest)?);
    out.push('\n');
    out.push_str(&render_surface_types(manifest)?);
    out.push('\n');
    out.push_str(&render_surface_methods(manifest));
    Ok(out)
}

fn query_root<'a>(manifest: &'a Manifest) -> Result<&'a OutputType> {
    manifest
        .output_types
        .iter()
        .find(|t| t.name == "Query")
        .ok_or_else(|| Error::NotFound {
            kind: "output type",
            name: "Query".to_string(),
            context: "type declarations".to_string(),
        })
}

fn mutation_root<'a>(manifest: &'a Manifest) -> Option<&'a OutputType> {
    manifest.output_types.iter().find(|t| t.name == "Mutation")
}

fn mapping_for<'a>(manifest: &'a Manifest, model: &str) -> Option<&'a Mapping> {
    manifest.mappings.iter().find(|m| m.model == model)
}

fn render_model_types(manifest: &Manifest) -> String {
    let mut out = String::new();
    out.push_str("interface ModelTypes {\n");
    for model in &manifest.models {
        out.push_str(&format!("  {}: {}\n", model.name, model.name));
    }
    out.push_str("}\n");
    out
}

/// `fieldName: 'ReturnType'` entries for one model grouping
fn render_entries(out: &mut String, entries: &[(&str, &str)]) {
    for (field, return_type) in entries {
        out.push_str(&format!("      {field}: '{return_type}'\n"));
    }
}

fn render_surface_types(manifest: &Manifest) -> Result<String> {
    let query = query_root(manifest)?;
    let mutation = mutation_root(manifest);

    let mut out = String::new();
    out.push_str("interface SurfaceTypes {\n");

    out.push_str("  Query: {\n");
    for model in &manifest.models {
        let supported = mapping_for(manifest, &model.name)
            .map(|m| m.supported_queries())
            .unwrap_or_default();
        out.push_str(&format!("    {}: {{\n", model.name));
        let entries: Vec<(&str, &str)> = query
            .fields
            .iter()
            .filter(|f| supported.contains(&f.name.as_str()))
            .map(|f| (f.name.as_str(), f.output_type.name.as_str()))
            .collect();
        render_entries(&mut out, &entries);
        out.push_str("    }\n");
    }
    out.push_str("  },\n");

    out.push_str("  Mutation: {\n");
    for model in &manifest.models {
        let supported = mapping_for(manifest, &model.name)
            .map(|m| m.supported_mutations())
            .unwrap_or_default();
        out.push_str(&format!("    {}: {{\n", model.name));
        let entries: Vec<(&str, &str)> = mutation
            .iter()
            .flat_map(|root| root.fields.iter())
            .filter(|f| supported.contains(&f.name.as_str()))
            .map(|f| (f.name.as_str(), f.output_type.name.as_str()))
            .collect();
        render_entries(&mut out, &entries);
        out.push_str("    }\n");
    }
    out.push_str("  },\n");

    out.push_str("  Read: {\n");
    for model in &manifest.models {
        out.push_str(&format!("    {}: {{\n", model.name));
        let entries: Vec<(&str, &str)> = model
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();
        render_entries(&mut out, &entries);
        out.push_str("    }\n");
    }
    out.push_str("  },\n");

    out.push_str("}\n");
    Ok(out)
}

/// where/order-by input types behind a list-valued object field, if the
/// field declares both arguments
fn list_field_inputs<'a>(
    manifest: &'a Manifest,
    field: &OutputField,
) -> Option<(&'a InputType, &'a InputType)> {
    if !field.output_type.is_list || field.output_type.kind != TypeKind::Object {
        return None;
    }
    let where_arg = field.args.iter().find(|a| a.name == "where")?;
    let order_arg = field.args.iter().find(|a| a.name == "orderBy")?;
    let where_input = manifest
        .input_types
        .iter()
        .find(|i| i.name == where_arg.input_type.name)?;
    let order_input = manifest
        .input_types
        .iter()
        .find(|i| i.name == order_arg.input_type.name)?;
    Some((where_input, order_input))
}

fn render_key_union(input: &InputType) -> String {
    if input.fields.is_empty() {
        return "never".to_string();
    }
    input
        .fields
        .iter()
        .map(|f| format!("'{}'", f.name))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_input_entries(out: &mut String, manifest: &Manifest, fields: &[&OutputField]) {
    for field in fields {
        if let Some((where_input, order_input)) = list_field_inputs(manifest, field) {
            out.push_str(&format!("      {}: {{\n", field.name));
            out.push_str(&format!(
                "        filtering: {}\n",
                render_key_union(where_input)
            ));
            out.push_str(&format!(
                "        ordering: {}\n",
                render_key_union(order_input)
            ));
            out.push_str("      }\n");
        }
    }
}

fn render_surface_inputs(manifest: &Manifest) -> Result<String> {
    let query = query_root(manifest)?;

    let mut out = String::new();
    out.push_str("interface SurfaceInputs {\n");

    out.push_str("  Query: {\n");
    for model in &manifest.models {
        let supported = mapping_for(manifest, &model.name)
            .map(|m| m.supported_queries())
            .unwrap_or_default();
        out.push_str(&format!("    {}: {{\n", model.name));
        let fields: Vec<&OutputField> = query
            .fields
            .iter()
            .filter(|f| supported.contains(&f.name.as_str()))
            .collect();
        render_input_entries(&mut out, manifest, &fields);
        out.push_str("    }\n");
    }
    out.push_str("  },\n");

    out.push_str("  Read: {\n");
    for model in &manifest.models {
        out.push_str(&format!("    {}: {{\n", model.name));
        let fields: Vec<&OutputField> = manifest
            .output_types
            .iter()
            .find(|t| t.name == model.name)
            .map(|t| t.fields.iter().collect())
            .unwrap_or_default();
        render_input_entries(&mut out, manifest, &fields);
        out.push_str("    }\n");
    }
    out.push_str("  },\n");

    out.push_str("}\n");
    Ok(out)
}

fn render_surface_methods(manifest: &Manifest) -> String {
    let mut out = String::new();
    out.push_str("interface SurfaceMethods<Definition extends keyof SurfaceTypes> {\n");
    for model in &manifest.models {
        out.push_str(&format!(
            "  {}: SurfaceFields<'{}', Definition>\n",
            model.name, model.name
        ));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::RawManifest;

    fn manifest() -> Manifest {
        let raw: RawManifest = serde_json::from_value(serde_json::json!({
            "datamodel": {
                "models": [{
                    "name": "Blog",
                    "fields": [
                        { "name": "id", "kind": "scalar", "type": "String", "isRequired": true },
                        { "name": "posts", "kind": "object", "type": "Post", "isList": true }
                    ]
                }, {
                    "name": "Post",
                    "fields": [
                        { "name": "id", "kind": "scalar", "type": "String", "isRequired": true }
                    ]
                }]
            },
            "schema": {
                "inputTypes": [
                    { "name": "PostWhereInput", "fields": [
                        { "name": "id", "inputType": { "type": "String", "kind": "scalar" } },
                        { "name": "title", "inputType": { "type": "String", "kind": "scalar" } }
                    ] },
                    { "name": "PostOrderByInput", "fields": [
                        { "name": "id", "inputType": { "type": "String", "kind": "scalar" } }
                    ] }
                ],
                "outputTypes": [
                    { "name": "Query", "fields": [
                        { "name": "posts",
                          "outputType": { "type": "Post", "kind": "object", "isList": true },
                          "args": [
                              { "name": "where", "inputType": { "type": "PostWhereInput", "kind": "object" } },
                              { "name": "orderBy", "inputType": { "type": "PostOrderByInput", "kind": "object" } }
                          ] }
                    ] },
                    { "name": "Blog", "fields": [
                        { "name": "id", "outputType": { "type": "String", "kind": "scalar" }, "args": [] },
                        { "name": "posts",
                          "outputType": { "type": "Post", "kind": "object", "isList": true },
                          "args": [
                              { "name": "where", "inputType": { "type": "PostWhereInput", "kind": "object" } },
                              { "name": "orderBy", "inputType": { "type": "PostOrderByInput", "kind": "object" } }
                          ] }
                    ] },
                    { "name": "Post", "fields": [
                        { "name": "id", "outputType": { "type": "String", "kind": "scalar" }, "args": [] }
                    ] }
                ]
            },
            "mappings": [
                { "model": "Post", "findMany": "posts" }
            ]
        }))
        .expect("raw manifest");
        raw.normalize().expect("normalize")
    }

    #[test]
    fn test_groupings_follow_the_operation_policy() {
        let text = render_type_declarations(&manifest()).expect("render");
        // Post supports findMany; Blog exposes no root operations
        assert!(text.contains("      posts: 'Post'\n"));
        assert!(text.contains("interface SurfaceTypes"));
        let query_section = text
            .split("  Query: {")
            .nth(2)
            .expect("query types section");
        let blog_block = query_section
            .split("    Blog: {")
            .nth(1)
            .expect("blog block");
        assert!(blog_block.starts_with("\n    }\n"));
    }

    #[test]
    fn test_list_fields_carry_key_unions() {
        let text = render_type_declarations(&manifest()).expect("render");
        assert!(text.contains("        filtering: 'id' | 'title'\n"));
        assert!(text.contains("        ordering: 'id'\n"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let manifest = manifest();
        let first = render_type_declarations(&manifest).expect("render");
        let second = render_type_declarations(&manifest).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn test_scalar_fields_render_without_inputs() {
        let text = render_type_declarations(&manifest()).expect("render");
        assert!(text.contains("interface ModelTypes {\n  Blog: Blog\n  Post: Post\n}\n"));
        // scalar id never gets a filtering/ordering entry
        assert!(!text.contains("      id: {\n"));
    }
}
