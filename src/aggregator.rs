use crate::extractor::EndpointResult;
use serde::Serialize;
use std::collections::HashMap;

/// Endpoints grouped by the source file of their controller.
///
/// Keys keep the order in which they were first added, and endpoints keep their
/// discovery order within a key. A key is only ever created with at least one
/// endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<(String, Vec<EndpointResult>)>,
    /// Position of each key in `entries`
    index: HashMap<String, usize>,
}

/// One report row: an endpoint paired with its (display) controller key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow<'a> {
    pub controller: String,
    #[serde(flatten)]
    pub endpoint: &'a EndpointResult,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `endpoints` under `key`, creating the key on first use.
    ///
    /// An empty `endpoints` list is ignored so that classes without surviving
    /// entry points never appear.
    pub fn add(&mut self, key: impl Into<String>, endpoints: Vec<EndpointResult>) {
        if endpoints.is_empty() {
            return;
        }

        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1.extend(endpoints),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, endpoints));
            }
        }
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&[EndpointResult]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Iterates `(key, endpoints)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EndpointResult])> {
        self.entries
            .iter()
            .map(|(key, list)| (key.as_str(), list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of endpoints across all keys.
    pub fn endpoint_count(&self) -> usize {
        self.entries.iter().map(|(_, list)| list.len()).sum()
    }

    /// Flattens the set into report rows, mapping each key through `display_key`.
    pub fn rows<F>(&self, display_key: F) -> Vec<ReportRow<'_>>
    where
        F: Fn(&str) -> String,
    {
        self.iter()
            .flat_map(|(key, endpoints)| {
                let controller = display_key(key);
                endpoints.iter().map(move |endpoint| ReportRow {
                    controller: controller.clone(),
                    endpoint,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::HttpMethod;

    fn endpoint(name: &str) -> EndpointResult {
        EndpointResult {
            method_name: name.to_string(),
            route: String::new(),
            http_methods: vec![HttpMethod::Get],
            attributes: vec![],
        }
    }

    #[test]
    fn test_add_preserves_key_order() {
        let mut results = ResultSet::new();
        results.add("b/Second.cs", vec![endpoint("One")]);
        results.add("a/First.cs", vec![endpoint("Two")]);

        assert_eq!(results.keys(), vec!["b/Second.cs", "a/First.cs"]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_add_same_key_concatenates() {
        let mut results = ResultSet::new();
        results.add("Home.cs", vec![endpoint("Index")]);
        results.add("Other.cs", vec![endpoint("Other")]);
        results.add("Home.cs", vec![endpoint("About"), endpoint("Contact")]);

        assert_eq!(results.keys(), vec!["Home.cs", "Other.cs"]);
        let names: Vec<_> = results
            .get("Home.cs")
            .unwrap()
            .iter()
            .map(|e| e.method_name.as_str())
            .collect();
        assert_eq!(names, vec!["Index", "About", "Contact"]);
        assert_eq!(results.endpoint_count(), 4);
    }

    #[test]
    fn test_many_keys_lookup() {
        let mut results = ResultSet::new();
        for i in 0..500 {
            results.add(format!("Controllers/C{}.cs", i), vec![endpoint("Index")]);
        }
        for i in (0..500).step_by(7) {
            results.add(format!("Controllers/C{}.cs", i), vec![endpoint("Extra")]);
        }

        assert_eq!(results.len(), 500);
        assert_eq!(results.keys()[499], "Controllers/C499.cs");
        assert_eq!(results.get("Controllers/C7.cs").unwrap().len(), 2);
        assert_eq!(results.get("Controllers/C8.cs").unwrap().len(), 1);
        assert!(results.get("Controllers/C500.cs").is_none());
        assert_eq!(results.endpoint_count(), 500 + 72);
    }

    #[test]
    fn test_empty_endpoints_do_not_create_key() {
        let mut results = ResultSet::new();
        results.add("Empty.cs", vec![]);

        assert!(results.is_empty());
        assert!(results.get("Empty.cs").is_none());
    }

    #[test]
    fn test_rows_follow_insertion_order() {
        let mut results = ResultSet::new();
        results.add("src/A.cs", vec![endpoint("A1"), endpoint("A2")]);
        results.add("src/B.cs", vec![endpoint("B1")]);

        let rows = results.rows(|key| key.trim_start_matches("src/").to_string());
        let flat: Vec<_> = rows
            .iter()
            .map(|row| (row.controller.as_str(), row.endpoint.method_name.as_str()))
            .collect();
        assert_eq!(flat, vec![("A.cs", "A1"), ("A.cs", "A2"), ("B.cs", "B1")]);
    }
}
