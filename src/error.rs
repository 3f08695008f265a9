//! error types
//!
//! structured errors for manifest normalization, surface generation,
//! and resolver invocation.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for generation and generated resolvers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the raw manifest references a type name absent from its own type lists
    #[error("malformed manifest: {context} references unknown type `{type_name}`")]
    MalformedManifest {
        /// the unresolved type name
        type_name: String,
        /// where the reference came from (model/field/arg)
        context: String,
    },

    /// an index lookup missed
    #[error("could not find {kind} `{name}` while building {context}")]
    NotFound {
        /// lookup category (model, mapping, enum, input type, output type, operation)
        kind: &'static str,
        /// the requested name
        name: String,
        /// the model/field that triggered the lookup
        context: String,
    },

    /// a filtering/ordering option was requested but the field declares no matching argument
    #[error("could not find {arg} argument for {model}.{field}")]
    MissingArgument {
        /// which option was requested ("filtering" or "ordering")
        arg: &'static str,
        /// target model name
        model: String,
        /// target field name
        field: String,
    },

    /// the caller-supplied accessor yielded no data client at resolver-invocation time
    #[error("could not find data client in resolver context")]
    MissingDataClient,

    /// a model field has no matching declared output field
    #[error("could not find output field {model}.{field}")]
    FieldNotFound {
        /// model name
        model: String,
        /// model field name
        field: String,
    },

    /// raw manifest document failed to parse
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// true if the error is fatal for the whole generation run
    ///
    /// everything except [`Error::MissingDataClient`] aborts generation;
    /// a missing client is a request-time failure raised from a resolver.
    pub fn is_generation_error(&self) -> bool {
        !matches!(self, Error::MissingDataClient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_generation_error() {
        let err = Error::NotFound {
            kind: "model",
            name: "Blog".to_string(),
            context: "Query.blogs".to_string(),
        };
        assert!(err.is_generation_error());

        assert!(!Error::MissingDataClient.is_generation_error());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = Error::MissingArgument {
            arg: "filtering",
            model: "Blog".to_string(),
            field: "blogs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not find filtering argument for Blog.blogs"
        );

        let err = Error::MalformedManifest {
            type_name: "GhostInput".to_string(),
            context: "input field BlogWhereInput.ghost".to_string(),
        };
        assert!(err.to_string().contains("GhostInput"));
        assert!(err.to_string().contains("BlogWhereInput.ghost"));
    }
}
