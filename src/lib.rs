//! derive a graphql field surface from a data-model manifest
//!
//! this crate turns a normalized data-model manifest (models, relations, and
//! supported crud operations) into two agreeing artifacts: a runtime field
//! surface — field definitions with scoped arguments, materialized input
//! types, and wired data-access resolvers — and a textual rendering of static
//! type declarations describing that same surface for compile-time consumers.
//!
//! ## quick start
//!
//! ```no_run
//! use surfacegen::{FieldBuilder, FieldOptions, RawManifest, Scope};
//!
//! # fn example(text: &str) -> surfacegen::Result<()> {
//! let manifest = RawManifest::from_json(text)?.normalize()?;
//! let declarations = surfacegen::render_type_declarations(&manifest)?;
//!
//! let mut builder: FieldBuilder<()> = FieldBuilder::new(manifest, |_ctx| None)?;
//! let fields = builder
//!     .surface("Query", "Blog")?
//!     .field("blog", FieldOptions::new())?
//!     .field(
//!         "blogs",
//!         FieldOptions::new().filtering(Scope::All).ordering(Scope::All),
//!     )?
//!     .finish();
//! # let _ = (declarations, fields);
//! # Ok(())
//! # }
//! ```
//!
//! execution, transport, and the data-access client itself are external
//! collaborators: resolvers reach the client through the accessor supplied
//! to [`FieldBuilder::new`], and the rendered declaration text is returned
//! to the caller instead of being written anywhere.

mod builder;
mod client;
mod error;
mod graphql;
mod index;
mod manifest;
mod naming;
mod operation;
mod registry;
mod typegen;

pub use builder::{FieldBuilder, FieldOptions, FieldSource, Scope};
pub use client::{ClientAccessor, DataClient};
pub use error::{Error, Result};
pub use graphql::{
    ArgDef, EnumDef, FieldDef, GeneratedType, InputFieldDef, InputObjectDef, Resolver,
};
pub use index::ManifestIndex;
pub use manifest::{
    EnumType, InputField, InputType, Manifest, Mapping, Model, ModelField, OutputField, OutputType,
    RawDatamodel, RawInputType, RawManifest, RawSchema, SchemaArg, TypeKind, TypeRef,
};
pub use naming::{DefaultNamingStrategy, NamingStrategy};
pub use operation::Operation;
pub use registry::TypeRegistry;
pub use typegen::render_type_declarations;
