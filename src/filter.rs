use crate::extractor::EndpointResult;

/// Attribute presence/absence filter applied to extracted endpoints.
///
/// An endpoint passes when it carries the `include` attribute (if set) and does not
/// carry the `exclude` attribute (if set). Names are compared exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    pub include: Option<String>,
    pub exclude: Option<String>,
}

impl AttributeFilter {
    pub fn new(include: Option<String>, exclude: Option<String>) -> Self {
        Self { include, exclude }
    }

    /// Whether a single endpoint passes both stages.
    pub fn matches(&self, endpoint: &EndpointResult) -> bool {
        let included = self
            .include
            .as_deref()
            .map_or(true, |name| endpoint.has_attribute(name));
        let excluded = self
            .exclude
            .as_deref()
            .is_some_and(|name| endpoint.has_attribute(name));

        included && !excluded
    }

    /// Keeps the endpoints that pass, preserving their order.
    pub fn apply(&self, endpoints: Vec<EndpointResult>) -> Vec<EndpointResult> {
        endpoints
            .into_iter()
            .filter(|endpoint| self.matches(endpoint))
            .collect()
    }
}
