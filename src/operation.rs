//! crud operations and the supported-ops policy
//!
//! a model's [`Mapping`] binds logical operations to root field names; the
//! policy here decides which root fields are legal to expose for a model and
//! which operation a generated resolver should invoke.

use crate::manifest::Mapping;

/// logical crud operation invoked through the data client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// fetch a single record
    FindOne,
    /// fetch a list of records
    FindMany,
    /// create a record
    Create,
    /// update a record
    Update,
    /// create-or-update a record
    Upsert,
    /// delete a record
    Delete,
}

impl Operation {
    /// stable operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FindOne => "findOne",
            Operation::FindMany => "findMany",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Upsert => "upsert",
            Operation::Delete => "delete",
        }
    }

    /// true for operations exposed on the Query root
    pub fn is_query(&self) -> bool {
        matches!(self, Operation::FindOne | Operation::FindMany)
    }
}

impl Mapping {
    /// root field names this model exposes on Query
    pub fn supported_queries(&self) -> Vec<&str> {
        [&self.find_one, &self.find_many]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// root field names this model exposes on Mutation
    pub fn supported_mutations(&self) -> Vec<&str> {
        [&self.create, &self.update, &self.upsert, &self.delete]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// operation bound to a root field name, if any
    pub fn operation_for(&self, field_name: &str) -> Option<Operation> {
        let slots = [
            (Operation::FindOne, &self.find_one),
            (Operation::FindMany, &self.find_many),
            (Operation::Create, &self.create),
            (Operation::Update, &self.update),
            (Operation::Upsert, &self.upsert),
            (Operation::Delete, &self.delete),
        ];
        slots
            .into_iter()
            .find(|(_, bound)| bound.as_deref() == Some(field_name))
            .map(|(op, _)| op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> Mapping {
        Mapping {
            model: "Blog".to_string(),
            find_one: Some("blog".to_string()),
            find_many: Some("blogs".to_string()),
            create: Some("createBlog".to_string()),
            update: None,
            upsert: None,
            delete: Some("deleteBlog".to_string()),
        }
    }

    #[test]
    fn test_supported_ops() {
        let mapping = mapping();
        assert_eq!(mapping.supported_queries(), vec!["blog", "blogs"]);
        assert_eq!(mapping.supported_mutations(), vec!["createBlog", "deleteBlog"]);
    }

    #[test]
    fn test_operation_for() {
        let mapping = mapping();
        assert_eq!(mapping.operation_for("blogs"), Some(Operation::FindMany));
        assert_eq!(mapping.operation_for("deleteBlog"), Some(Operation::Delete));
        assert_eq!(mapping.operation_for("updateBlog"), None);
    }

    #[test]
    fn test_query_split() {
        assert!(Operation::FindMany.is_query());
        assert!(!Operation::Upsert.is_query());
    }
}
