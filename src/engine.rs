//! Enumeration engine: classification, extraction, filtering and aggregation.
//!
//! The engine consumes parsed [`SourceUnit`]s one at a time and owns the
//! [`ResultSet`] until [`EnumerationEngine::finish`] hands it over for reporting.

use crate::aggregator::ResultSet;
use crate::classifier::{ControllerClassifier, InheritanceResolver};
use crate::config::ScanConfig;
use crate::extractor::EndpointExtractor;
use crate::filter::AttributeFilter;
use crate::model::{ClassDeclaration, SourceUnit};
use log::debug;

pub struct EnumerationEngine {
    base_type_names: Vec<String>,
    filter: AttributeFilter,
    resolver: Option<InheritanceResolver>,
    results: ResultSet,
}

impl EnumerationEngine {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            base_type_names: config.base_type_names.clone(),
            filter: AttributeFilter::new(
                config.include_attribute.clone(),
                config.exclude_attribute.clone(),
            ),
            resolver: None,
            results: ResultSet::new(),
        }
    }

    /// Enables transitive classification through classes defined in `units`.
    pub fn with_resolver(mut self, resolver: InheritanceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Analyses every class of `unit` and records the surviving endpoints.
    ///
    /// Endpoints are filtered before insertion, so a controller whose entry points
    /// are all filtered out never becomes a key.
    pub fn process_unit(&mut self, unit: &SourceUnit) {
        let key = unit.path.display().to_string();

        for class in &unit.classes {
            if !self.is_controller(class) {
                continue;
            }

            let extracted = EndpointExtractor::extract(class);
            let extracted_count = extracted.len();
            let endpoints = self.filter.apply(extracted);
            debug!(
                "Controller {} in {}: {} actions, {} after filtering",
                class.qualified_name,
                key,
                extracted_count,
                endpoints.len()
            );

            self.results.add(key.clone(), endpoints);
        }
    }

    /// Completes the scan and returns the aggregated results.
    pub fn finish(self) -> ResultSet {
        self.results
    }

    fn is_controller(&self, class: &ClassDeclaration) -> bool {
        match &self.resolver {
            Some(resolver) => resolver.is_controller(class, &self.base_type_names),
            None => ControllerClassifier::is_controller(class, &self.base_type_names),
        }
    }
}

/// Runs the engine over already parsed units.
///
/// When `config.resolve_inheritance` is set, an [`InheritanceResolver`] is built
/// from all units before any class is classified.
pub fn enumerate(units: &[SourceUnit], config: &ScanConfig) -> ResultSet {
    let mut engine = EnumerationEngine::new(config);
    if config.resolve_inheritance {
        engine = engine.with_resolver(InheritanceResolver::from_units(units));
    }

    for unit in units {
        engine.process_unit(unit);
    }

    engine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::HttpMethod;
    use crate::model::{AttributeInstance, MethodDeclaration};
    use std::path::PathBuf;

    fn class(name: &str, bases: &[&str], methods: Vec<MethodDeclaration>) -> ClassDeclaration {
        let mut class = ClassDeclaration::new(name);
        class.base_types = bases.iter().map(|b| b.to_string()).collect();
        class.methods = methods;
        class
    }

    fn attributed(name: &str, attrs: &[&str]) -> MethodDeclaration {
        let mut method = MethodDeclaration::new(name);
        method.attributes = attrs
            .iter()
            .map(|a| AttributeInstance::new(*a, vec![]))
            .collect();
        method
    }

    fn unit(path: &str, classes: Vec<ClassDeclaration>) -> SourceUnit {
        SourceUnit {
            path: PathBuf::from(path),
            classes,
        }
    }

    #[test]
    fn test_controller_and_plain_class() {
        let units = vec![unit(
            "web/Controllers/UsersController.cs",
            vec![
                class(
                    "UsersController",
                    &["Controller"],
                    vec![MethodDeclaration::new("GetUsers"), attributed("Create", &["HttpPost"])],
                ),
                class("UserService", &[], vec![MethodDeclaration::new("GetAll")]),
            ],
        )];

        let results = enumerate(&units, &ScanConfig::default());

        assert_eq!(results.keys(), vec!["web/Controllers/UsersController.cs"]);
        let endpoints = results.get("web/Controllers/UsersController.cs").unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].http_methods, vec![HttpMethod::Get]);
        assert_eq!(endpoints[1].http_methods, vec![HttpMethod::Post]);
    }

    #[test]
    fn test_fully_filtered_class_is_omitted() {
        let units = vec![
            unit(
                "a/Open.cs",
                vec![class("OpenController", &["Controller"], vec![MethodDeclaration::new("Index")])],
            ),
            unit(
                "a/Secure.cs",
                vec![class(
                    "SecureController",
                    &["Controller"],
                    vec![attributed("Index", &["Authorize"])],
                )],
            ),
        ];
        let config = ScanConfig {
            include_attribute: Some("Authorize".to_string()),
            ..ScanConfig::default()
        };

        let results = enumerate(&units, &config);
        assert_eq!(results.keys(), vec!["a/Secure.cs"]);
    }

    #[test]
    fn test_controller_without_actions_is_omitted() {
        let mut helper = MethodDeclaration::new("Helper");
        helper.visibility = crate::model::Visibility::Private;
        let units = vec![unit(
            "Empty.cs",
            vec![class("EmptyController", &["Controller"], vec![helper])],
        )];

        let results = enumerate(&units, &ScanConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_two_controllers_in_one_file_share_key() {
        let units = vec![unit(
            "Controllers.cs",
            vec![
                class("AController", &["Controller"], vec![MethodDeclaration::new("A")]),
                class("BController", &["ApiController"], vec![MethodDeclaration::new("B")]),
            ],
        )];

        let results = enumerate(&units, &ScanConfig::default());
        assert_eq!(results.len(), 1);
        let names: Vec<_> = results
            .get("Controllers.cs")
            .unwrap()
            .iter()
            .map(|e| e.method_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_inheritance_resolution_is_opt_in() {
        let units = vec![
            unit(
                "Base.cs",
                vec![class("BaseController", &["Controller"], vec![])],
            ),
            unit(
                "Users.cs",
                vec![class(
                    "UsersController",
                    &["BaseController"],
                    vec![MethodDeclaration::new("Index")],
                )],
            ),
        ];

        let shallow = enumerate(&units, &ScanConfig::default());
        assert!(shallow.is_empty());

        let config = ScanConfig {
            resolve_inheritance: true,
            ..ScanConfig::default()
        };
        let resolved = enumerate(&units, &config);
        assert_eq!(resolved.keys(), vec!["Users.cs"]);
    }
}
