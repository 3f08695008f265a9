//! naming strategy for generated input types
//!
//! when a call site restricts a where/order-by/relation-filter shape, the
//! restricted copy needs its own type name so it cannot collide with the
//! shared, unrestricted materialization. names are pure functions of the
//! enclosing type name, the field name, and (for relation filters) the base
//! type name, so repeated runs over the same manifest emit identical names.

/// computes names for field-scoped generated input types
///
/// implementations must be deterministic and collision-free across distinct
/// `(type_name, field_name)` pairs.
pub trait NamingStrategy {
    /// name for a field-scoped where input
    fn where_input(&self, type_name: &str, field_name: &str) -> String;

    /// name for a field-scoped order-by input
    fn order_by_input(&self, type_name: &str, field_name: &str) -> String;

    /// name for a field-scoped relation filter
    ///
    /// folds in the base type name: a single call site can reach several
    /// relation filters through one where input, and they must not collapse
    /// onto one generated name.
    fn relation_filter_input(&self, type_name: &str, field_name: &str, base_name: &str) -> String;
}

/// default `{Parent}{Field}WhereInput` / `{Parent}{Field}OrderByInput` /
/// `{Parent}{Field}{Base}` convention
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn where_input(&self, type_name: &str, field_name: &str) -> String {
        format!(
            "{}{}WhereInput",
            upper_first(type_name),
            upper_first(field_name)
        )
    }

    fn order_by_input(&self, type_name: &str, field_name: &str) -> String {
        format!(
            "{}{}OrderByInput",
            upper_first(type_name),
            upper_first(field_name)
        )
    }

    fn relation_filter_input(&self, type_name: &str, field_name: &str, base_name: &str) -> String {
        format!(
            "{}{}{}",
            upper_first(type_name),
            upper_first(field_name),
            base_name
        )
    }
}

/// uppercase the first character
pub(crate) fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_convention() {
        let naming = DefaultNamingStrategy;
        assert_eq!(naming.where_input("Blog", "posts"), "BlogPostsWhereInput");
        assert_eq!(
            naming.order_by_input("Query", "blogs"),
            "QueryBlogsOrderByInput"
        );
        assert_eq!(
            naming.relation_filter_input("Blog", "posts", "PostFilter"),
            "BlogPostsPostFilter"
        );
    }

    #[test]
    fn test_determinism() {
        let naming = DefaultNamingStrategy;
        assert_eq!(
            naming.where_input("Blog", "posts"),
            naming.where_input("Blog", "posts")
        );
    }

    #[test]
    fn test_distinct_sites_get_distinct_names() {
        let naming = DefaultNamingStrategy;
        let a = naming.where_input("Blog", "posts");
        let b = naming.where_input("Author", "posts");
        let c = naming.where_input("Blog", "drafts");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_relation_filters_keep_base_apart() {
        let naming = DefaultNamingStrategy;
        assert_ne!(
            naming.relation_filter_input("Query", "blogs", "PostFilter"),
            naming.relation_filter_input("Query", "blogs", "AuthorFilter")
        );
    }

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("posts"), "Posts");
        assert_eq!(upper_first(""), "");
        assert_eq!(upper_first("Blog"), "Blog");
    }
}
