//! List parameters (filters, pagination, search) shared by every `list` call.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Filter and pagination parameters for a list query.
///
/// Parameters are kept sorted by name, so two `ListParams` built in a different order
/// render the same query string and hit the same cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    pairs: BTreeMap<String, String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, page: u32) -> Self {
        self.filter("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.filter("limit", limit)
    }

    pub fn search(self, term: impl Into<String>) -> Self {
        self.filter("search", term.into())
    }

    /// Add an arbitrary filter. A later value for the same key replaces the earlier one.
    pub fn filter(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.pairs.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Key/value pairs in canonical order, ready for a query string.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Canonical `k=v&k=v` rendering for logs. Not escaped, so not an identity.
    pub fn canonical(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_order_independent() {
        let a = ListParams::new().page(2).filter("category", "summer").limit(20);
        let b = ListParams::new().limit(20).filter("category", "summer").page(2);
        assert_eq!(a, b);
        assert_eq!(a.canonical(), "category=summer&limit=20&page=2");
    }

    #[test]
    fn test_separator_in_value_is_a_different_param_set() {
        let embedded = ListParams::new().filter("category", "summer&page=2");
        let split = ListParams::new().filter("category", "summer").page(2);
        assert_eq!(embedded.canonical(), split.canonical());
        assert_ne!(embedded, split);
        assert_eq!(embedded.get("category"), Some("summer&page=2"));
        assert_eq!(embedded.get("page"), None);
    }

    #[test]
    fn test_filter_replaces_value() {
        let params = ListParams::new().page(1).page(3);
        assert_eq!(params.get("page"), Some("3"));
        assert_eq!(params.pairs().len(), 1);
        assert!(ListParams::new().is_empty());
    }
}
