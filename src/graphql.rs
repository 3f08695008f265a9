//! generated surface types
//!
//! the runtime artifact of a generation run: field definitions with wired
//! resolvers, plus the input object and enum types materialized for their
//! arguments. these are plain data handed to the host schema library; the
//! core never executes them itself.

use crate::error::Result;
use crate::manifest::TypeRef;
use serde_json::Value;
use std::fmt;

/// resolver attached to a generated field: `(parent, args, context) -> result`
pub type Resolver<Ctx> = Box<dyn Fn(&Value, Value, &Ctx) -> Result<Value> + Send + Sync>;

/// argument descriptor on a generated field
///
/// for object and enum arguments, `type_ref.name` is the generated type name
/// and refers to an entry in the run's materialized types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    /// argument name
    pub name: String,
    /// argument type, by (possibly generated) name
    pub type_ref: TypeRef,
}

/// generated field definition
pub struct FieldDef<Ctx> {
    /// exposed field name (alias applied)
    pub name: String,
    /// return type (override applied)
    pub output_type: TypeRef,
    /// arguments in declaration order
    pub args: Vec<ArgDef>,
    /// attached resolver; `None` means default pass-through resolution
    pub resolver: Option<Resolver<Ctx>>,
}

impl<Ctx> FieldDef<Ctx> {
    /// invoke the attached resolver
    ///
    /// fields without a resolver read the field straight off the parent
    /// value, the default strategy for scalar model fields.
    pub fn resolve(&self, parent: &Value, args: Value, ctx: &Ctx) -> Result<Value> {
        match &self.resolver {
            Some(resolver) => resolver(parent, args, ctx),
            None => Ok(parent.get(&self.name).cloned().unwrap_or(Value::Null)),
        }
    }
}

impl<Ctx> fmt::Debug for FieldDef<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("output_type", &self.output_type)
            .field("args", &self.args)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// field of a materialized input object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFieldDef {
    /// field name
    pub name: String,
    /// field type, by (possibly generated) name
    pub type_ref: TypeRef,
}

/// materialized input object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectDef {
    /// generated type name
    pub name: String,
    /// retained fields after whitelist filtering
    pub fields: Vec<InputFieldDef>,
}

/// materialized enum type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// enum name
    pub name: String,
    /// member values
    pub values: Vec<String>,
}

/// a type materialized during a generation run, emitted exactly once per name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedType {
    /// input object type
    Input(InputObjectDef),
    /// enum type
    Enum(EnumDef),
}

impl GeneratedType {
    /// the generated type name
    pub fn name(&self) -> &str {
        match self {
            GeneratedType::Input(input) => &input.name,
            GeneratedType::Enum(enum_def) => &enum_def.name,
        }
    }
}
