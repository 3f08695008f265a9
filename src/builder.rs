//! field builder
//!
//! the generation engine: walks a model's exposed operations or fields for a
//! parent type (Query, Mutation, or a model-backed object type), computes
//! correctly-scoped arguments, recursively materializes the input types they
//! reference, and wires default resolution strategies. one builder owns one
//! generation run; its registry state never leaks across runs.

use crate::client::{expect_client, ClientAccessor, DataClient};
use crate::error::{Error, Result};
use crate::graphql::{
    ArgDef, EnumDef, FieldDef, GeneratedType, InputFieldDef, InputObjectDef, Resolver,
};
use crate::index::ManifestIndex;
use crate::manifest::{InputField, Manifest, OutputField, OutputType, SchemaArg, TypeKind, TypeRef};
use crate::naming::{DefaultNamingStrategy, NamingStrategy};
use crate::registry::TypeRegistry;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// pagination argument names, always passed through unscoped
const PAGINATION_KEYS: [&str; 5] = ["first", "last", "before", "after", "skip"];

/// scalar filter shapes excluded from the relation-filter suffix heuristic
const SCALAR_FILTERS: [&str; 5] = [
    "IntFilter",
    "StringFilter",
    "BooleanFilter",
    "NullableStringFilter",
    "FloatFilter",
];

/// how much of an input type a call site exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// expose every field
    All,
    /// expose nothing
    #[default]
    None,
    /// expose only the named fields
    Subset(BTreeSet<String>),
}

impl Scope {
    /// subset scope from any collection of field names
    pub fn subset<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope::Subset(fields.into_iter().map(Into::into).collect())
    }
}

/// per-field options for [`FieldSource::field`]
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    alias: Option<String>,
    type_override: Option<String>,
    filtering: Scope,
    ordering: Scope,
    pagination: Option<Scope>,
}

impl FieldOptions {
    /// options with every knob at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// expose the field under a different name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// override the declared return type name
    pub fn output_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_override = Some(type_name.into());
        self
    }

    /// expose the where argument (default: not exposed)
    pub fn filtering(mut self, scope: Scope) -> Self {
        self.filtering = scope;
        self
    }

    /// expose the orderBy argument (default: not exposed)
    pub fn ordering(mut self, scope: Scope) -> Self {
        self.ordering = scope;
        self
    }

    /// select pagination arguments (default: all that the field declares)
    pub fn pagination(mut self, scope: Scope) -> Self {
        self.pagination = Some(scope);
        self
    }
}

/// one generation run over a normalized manifest
///
/// generic over the caller's resolver context `Ctx`; resolvers reach the
/// data client through the accessor supplied at construction time.
pub struct FieldBuilder<Ctx> {
    index: ManifestIndex,
    naming: Box<dyn NamingStrategy + Send + Sync>,
    registry: TypeRegistry,
    accessor: ClientAccessor<Ctx>,
    types: Vec<GeneratedType>,
}

impl<Ctx> FieldBuilder<Ctx> {
    /// create a builder for one generation run
    pub fn new<F>(manifest: Manifest, accessor: F) -> Result<Self>
    where
        F: Fn(&Ctx) -> Option<Arc<dyn DataClient>> + Send + Sync + 'static,
    {
        Ok(Self {
            index: ManifestIndex::new(manifest)?,
            naming: Box::new(DefaultNamingStrategy),
            registry: TypeRegistry::new(),
            accessor: Arc::new(accessor),
            types: Vec::new(),
        })
    }

    /// override the naming strategy for generated input types
    pub fn with_naming_strategy(
        mut self,
        naming: impl NamingStrategy + Send + Sync + 'static,
    ) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// the manifest index backing this run
    pub fn index(&self) -> &ManifestIndex {
        &self.index
    }

    /// input object and enum types materialized so far, in emission order
    pub fn generated_types(&self) -> &[GeneratedType] {
        &self.types
    }

    /// consume the builder, yielding the materialized types
    pub fn into_generated_types(self) -> Vec<GeneratedType> {
        self.types
    }

    /// start selecting fields of `model` for a parent type
    ///
    /// `parent_type` is `"Query"`, `"Mutation"`, or the name of a
    /// model-backed object type. for root parents the exposable fields are
    /// the root type's fields whose names match the model's supported
    /// operations; for model parents they are the model's declared fields,
    /// each required to have a matching declared output field.
    pub fn surface(&mut self, parent_type: &str, model: &str) -> Result<FieldSource<'_, Ctx>> {
        let context = format!("{parent_type}.{model}");
        let candidates = match parent_type {
            "Query" => {
                let mapping = self.index.mapping(model, &context)?;
                let supported: Vec<String> = mapping
                    .supported_queries()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                self.root_candidates(self.index.query_type(), &supported)
            }
            "Mutation" => {
                let mapping = self.index.mapping(model, &context)?;
                let supported: Vec<String> = mapping
                    .supported_mutations()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let mutation = self.index.mutation_type().ok_or_else(|| Error::NotFound {
                    kind: "output type",
                    name: "Mutation".to_string(),
                    context: context.clone(),
                })?;
                self.root_candidates(mutation, &supported)
            }
            _ => self.model_candidates(model, &context)?,
        };

        trace!(
            parent = parent_type,
            model,
            exposable = candidates.len(),
            "opened field surface"
        );

        Ok(FieldSource {
            builder: self,
            model: model.to_string(),
            parent_type: parent_type.to_string(),
            candidates,
            fields: Vec::new(),
        })
    }

    fn root_candidates(&self, root: &OutputType, supported: &[String]) -> Vec<Candidate> {
        root.fields
            .iter()
            .filter(|f| supported.iter().any(|s| s == &f.name))
            .map(|f| Candidate {
                model_field_kind: None,
                output: f.clone(),
            })
            .collect()
    }

    fn model_candidates(&self, model_name: &str, context: &str) -> Result<Vec<Candidate>> {
        let model = self.index.model(model_name, context)?;
        let output = self.index.output_type(&model.name, context)?;
        model
            .fields
            .iter()
            .map(|model_field| {
                let declared = output
                    .fields
                    .iter()
                    .find(|f| f.name == model_field.name)
                    .ok_or_else(|| Error::FieldNotFound {
                        model: model.name.clone(),
                        field: model_field.name.clone(),
                    })?;
                Ok(Candidate {
                    model_field_kind: Some(model_field.kind),
                    output: declared.clone(),
                })
            })
            .collect()
    }

    /// compute the argument descriptors for one generated field
    ///
    /// mutation root fields take their declared arguments as-is; query and
    /// model fields assemble them from the requested scopes.
    fn compute_args(
        &mut self,
        model: &str,
        parent_type: &str,
        field: &OutputField,
        opts: &FieldOptions,
    ) -> Result<Vec<ArgDef>> {
        let selected: Vec<SchemaArg> = if parent_type == "Mutation" {
            field.args.clone()
        } else {
            self.select_args(model, parent_type, field, opts)?
        };

        selected
            .iter()
            .map(|arg| self.arg_def(parent_type, &field.name, arg))
            .collect()
    }

    fn select_args(
        &mut self,
        model: &str,
        parent_type: &str,
        field: &OutputField,
        opts: &FieldOptions,
    ) -> Result<Vec<SchemaArg>> {
        let mut selected = Vec::new();

        // where/orderBy shapes belong to the field's declared return model,
        // which differs from the surfaced model on relation fields
        let target = &field.output_type.name;

        if opts.filtering != Scope::None {
            let arg = self.scoped_arg(
                model,
                parent_type,
                field,
                "where",
                &format!("{target}WhereInput"),
                &opts.filtering,
                "filtering",
            )?;
            selected.push(arg);
        }

        if opts.ordering != Scope::None {
            let arg = self.scoped_arg(
                model,
                parent_type,
                field,
                "orderBy",
                &format!("{target}OrderByInput"),
                &opts.ordering,
                "ordering",
            )?;
            selected.push(arg);
        }

        match opts.pagination.clone().unwrap_or(Scope::All) {
            Scope::None => {}
            Scope::All => selected.extend(
                field
                    .args
                    .iter()
                    .filter(|a| PAGINATION_KEYS.contains(&a.name.as_str()))
                    .cloned(),
            ),
            Scope::Subset(keys) => selected.extend(
                field
                    .args
                    .iter()
                    .filter(|a| {
                        PAGINATION_KEYS.contains(&a.name.as_str()) && keys.contains(&a.name)
                    })
                    .cloned(),
            ),
        }

        Ok(selected)
    }

    /// locate a where/orderBy argument and register its whitelist if the
    /// scope is a subset
    #[allow(clippy::too_many_arguments)]
    fn scoped_arg(
        &mut self,
        model: &str,
        parent_type: &str,
        field: &OutputField,
        arg_name: &str,
        wanted_type: &str,
        scope: &Scope,
        option: &'static str,
    ) -> Result<SchemaArg> {
        let arg = field
            .args
            .iter()
            .find(|a| a.name == arg_name && a.input_type.name == wanted_type)
            .ok_or_else(|| Error::MissingArgument {
                arg: option,
                model: model.to_string(),
                field: field.name.clone(),
            })?;

        if let Scope::Subset(keys) = scope {
            let scoped_name = match option {
                "filtering" => self.naming.where_input(parent_type, &field.name),
                _ => self.naming.order_by_input(parent_type, &field.name),
            };
            debug!(name = %scoped_name, keys = keys.len(), "registered whitelist");
            self.registry
                .set_whitelist(scoped_name, keys.iter().cloned().collect());
        }

        Ok(arg.clone())
    }

    fn arg_def(&mut self, parent_type: &str, field_name: &str, arg: &SchemaArg) -> Result<ArgDef> {
        match arg.input_type.kind {
            TypeKind::Scalar => Ok(ArgDef {
                name: arg.name.clone(),
                type_ref: arg.input_type.clone(),
            }),
            _ => {
                let generated = self.materialize(parent_type, field_name, &arg.input_type)?;
                Ok(ArgDef {
                    name: arg.name.clone(),
                    type_ref: TypeRef {
                        name: generated,
                        ..arg.input_type.clone()
                    },
                })
            }
        }
    }

    /// final name for a referenced input type at this call site
    ///
    /// where/order/relation-filter shapes move to their field-scoped
    /// generated name only when a whitelist was registered for that name;
    /// unrestricted sites keep the base name so the materialization is
    /// shared.
    fn generated_type_name(
        &self,
        parent_type: &str,
        field_name: &str,
        type_ref: &TypeRef,
    ) -> Result<String> {
        if type_ref.kind != TypeKind::Object {
            return Ok(type_ref.name.clone());
        }

        let context = format!("{parent_type}.{field_name}");
        let input = self.index.input_type(&type_ref.name, &context)?;

        let candidate = if input.is_where_type {
            self.naming.where_input(parent_type, field_name)
        } else if input.is_order_type {
            self.naming.order_by_input(parent_type, field_name)
        } else if is_relation_filter(&input.name) {
            self.naming
                .relation_filter_input(parent_type, field_name, &input.name)
        } else {
            return Ok(type_ref.name.clone());
        };

        if self.registry.whitelist(&candidate).is_some() {
            Ok(candidate)
        } else {
            Ok(type_ref.name.clone())
        }
    }

    /// materialize an enum or input type, memoized per generated name
    ///
    /// the name is marked built before its fields are expanded, so cyclic
    /// input graphs terminate: a re-entrant reference resolves to the name
    /// alone instead of re-expanding the definition.
    fn materialize(
        &mut self,
        parent_type: &str,
        field_name: &str,
        type_ref: &TypeRef,
    ) -> Result<String> {
        let context = format!("{parent_type}.{field_name}");

        match type_ref.kind {
            TypeKind::Scalar => Ok(type_ref.name.clone()),
            TypeKind::Enum => {
                if !self.registry.has_type(&type_ref.name) {
                    self.registry.mark_built(type_ref.name.clone());
                    let enum_type = self.index.enum_type(&type_ref.name, &context)?.clone();
                    trace!(name = %enum_type.name, "materialized enum");
                    self.types.push(GeneratedType::Enum(EnumDef {
                        name: enum_type.name,
                        values: enum_type.values,
                    }));
                }
                Ok(type_ref.name.clone())
            }
            TypeKind::Object => {
                let generated = self.generated_type_name(parent_type, field_name, type_ref)?;
                if self.registry.has_type(&generated) {
                    return Ok(generated);
                }
                self.registry.mark_built(generated.clone());

                let input = self.index.input_type(&type_ref.name, &context)?.clone();
                let retained: Vec<InputField> = match self.registry.whitelist(&generated) {
                    Some(allowed) => input
                        .fields
                        .iter()
                        .filter(|f| allowed.contains(&f.name))
                        .cloned()
                        .collect(),
                    None => input.fields.clone(),
                };

                let mut fields = Vec::with_capacity(retained.len());
                for input_field in &retained {
                    match input_field.input_type.kind {
                        TypeKind::Scalar => fields.push(InputFieldDef {
                            name: input_field.name.clone(),
                            type_ref: input_field.input_type.clone(),
                        }),
                        _ => {
                            let nested =
                                self.materialize(parent_type, field_name, &input_field.input_type)?;
                            fields.push(InputFieldDef {
                                name: input_field.name.clone(),
                                type_ref: TypeRef {
                                    name: nested,
                                    ..input_field.input_type.clone()
                                },
                            });
                        }
                    }
                }

                debug!(name = %generated, base = %input.name, fields = fields.len(), "materialized input type");
                self.types.push(GeneratedType::Input(InputObjectDef {
                    name: generated.clone(),
                    fields,
                }));
                Ok(generated)
            }
        }
    }
}

#[derive(Clone)]
struct Candidate {
    /// `None` for root fields; the model field kind for model surfaces
    model_field_kind: Option<TypeKind>,
    output: OutputField,
}

/// chained field selection over one (parent type, model) pair
///
/// each [`FieldSource::field`] call appends one generated field definition
/// and returns the source for further chaining; [`FieldSource::finish`]
/// yields the accumulated definitions.
pub struct FieldSource<'a, Ctx> {
    builder: &'a mut FieldBuilder<Ctx>,
    model: String,
    parent_type: String,
    candidates: Vec<Candidate>,
    fields: Vec<FieldDef<Ctx>>,
}

// boxed resolvers are `'static`, so the context type they close over must be too
impl<'a, Ctx: 'static> FieldSource<'a, Ctx> {
    /// names this surface can expose, in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.output.name.as_str())
            .collect()
    }

    /// build one exposed field
    pub fn field(mut self, name: &str, opts: FieldOptions) -> Result<Self> {
        let candidate = self
            .candidates
            .iter()
            .find(|c| c.output.name == name)
            .cloned()
            .ok_or_else(|| {
                if self.root() {
                    Error::NotFound {
                        kind: "field",
                        name: name.to_string(),
                        context: format!("{}.{}", self.parent_type, self.model),
                    }
                } else {
                    Error::FieldNotFound {
                        model: self.model.clone(),
                        field: name.to_string(),
                    }
                }
            })?;

        let declared = &candidate.output;
        let exposed_name = opts.alias.clone().unwrap_or_else(|| declared.name.clone());
        let output_type = TypeRef {
            name: opts
                .type_override
                .clone()
                .unwrap_or_else(|| declared.output_type.name.clone()),
            ..declared.output_type.clone()
        };

        let args =
            self.builder
                .compute_args(&self.model, &self.parent_type, declared, &opts)?;

        let resolver = match candidate.model_field_kind {
            None => Some(self.root_resolver(declared)?),
            Some(TypeKind::Scalar) => None,
            Some(_) => Some(self.relation_resolver(declared)),
        };

        trace!(
            parent = %self.parent_type,
            field = %exposed_name,
            args = args.len(),
            "built field"
        );

        self.fields.push(FieldDef {
            name: exposed_name,
            output_type,
            args,
            resolver,
        });

        Ok(self)
    }

    /// the accumulated field definitions
    pub fn finish(self) -> Vec<FieldDef<Ctx>> {
        self.fields
    }

    fn root(&self) -> bool {
        self.parent_type == "Query" || self.parent_type == "Mutation"
    }

    /// resolver for a root field: invoke the mapped crud operation
    fn root_resolver(&self, declared: &OutputField) -> Result<Resolver<Ctx>> {
        let context = format!("{}.{}", self.parent_type, self.model);
        let mapping = self.builder.index.mapping(&self.model, &context)?;
        let operation =
            mapping
                .operation_for(&declared.name)
                .ok_or_else(|| Error::NotFound {
                    kind: "operation",
                    name: declared.name.clone(),
                    context,
                })?;

        let accessor = Arc::clone(&self.builder.accessor);
        let model = self.model.clone();
        Ok(Box::new(move |_parent, args, ctx| {
            let client = expect_client(&accessor, ctx)?;
            client.execute(&model, operation, args)
        }))
    }

    /// resolver for a relation field: refetch the owning record by id, then
    /// navigate the relation
    fn relation_resolver(&self, declared: &OutputField) -> Resolver<Ctx> {
        let accessor = Arc::clone(&self.builder.accessor);
        let model = self.model.clone();
        let relation = declared.name.clone();
        Box::new(move |parent, args, ctx| {
            let client = expect_client(&accessor, ctx)?;
            let record_id = parent.get("id").cloned().unwrap_or(Value::Null);
            client.relation(&model, record_id, &relation, args)
        })
    }
}

/// relation-filter suffix heuristic with the scalar-filter excluded list
fn is_relation_filter(type_name: &str) -> bool {
    type_name.ends_with("Filter")
        && type_name != "Filter"
        && !SCALAR_FILTERS.contains(&type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relation_filter() {
        assert!(is_relation_filter("PostFilter"));
        assert!(!is_relation_filter("StringFilter"));
        assert!(!is_relation_filter("Filter"));
        assert!(!is_relation_filter("BlogWhereInput"));
    }

    #[test]
    fn test_scope_subset() {
        let scope = Scope::subset(["id", "name"]);
        match scope {
            Scope::Subset(keys) => {
                assert!(keys.contains("id"));
                assert!(keys.contains("name"));
            }
            other => panic!("unexpected scope: {other:?}"),
        }
    }

    #[test]
    fn test_field_options_defaults() {
        let opts = FieldOptions::new();
        assert_eq!(opts.filtering, Scope::None);
        assert_eq!(opts.ordering, Scope::None);
        assert!(opts.pagination.is_none());
    }
}
