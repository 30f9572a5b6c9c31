//! Settings consumed by the enumeration engine.

use crate::classifier::DEFAULT_CONTROLLER_BASES;

/// Core scan configuration, normally built from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Base type names that mark a class as a controller
    pub base_type_names: Vec<String>,
    /// Keep only entry points carrying this attribute
    pub include_attribute: Option<String>,
    /// Drop entry points carrying this attribute
    pub exclude_attribute: Option<String>,
    /// Follow base classes defined in the scanned sources when classifying
    pub resolve_inheritance: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_type_names: DEFAULT_CONTROLLER_BASES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            include_attribute: None,
            exclude_attribute: None,
            resolve_inheritance: false,
        }
    }
}

impl ScanConfig {
    /// Whether either attribute filter was requested.
    pub fn has_filter(&self) -> bool {
        self.include_attribute.is_some() || self.exclude_attribute.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(config.base_type_names.contains(&"Controller".to_string()));
        assert!(config.base_type_names.contains(&"ApiController".to_string()));
        assert!(!config.has_filter());
        assert!(!config.resolve_inheritance);
    }

    #[test]
    fn test_has_filter() {
        let config = ScanConfig {
            exclude_attribute: Some("Authorize".to_string()),
            ..ScanConfig::default()
        };
        assert!(config.has_filter());
    }
}
