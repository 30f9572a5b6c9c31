use crate::model::{ClassDeclaration, SourceUnit};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Controller base classes recognised when no override is configured.
///
/// Covers ASP.NET MVC (`Controller`, `AsyncController`), Web API 2
/// (`ApiController`) and ASP.NET Core (`ControllerBase`).
pub const DEFAULT_CONTROLLER_BASES: &[&str] =
    &["Controller", "ApiController", "ControllerBase", "AsyncController"];

/// Decides whether a class declaration is a controller.
///
/// The check is purely syntactic: a class is a controller when one of the base types
/// written in its own base list matches a configured name exactly. A class deriving
/// from a project-local `BaseController : Controller` is *not* a controller under this
/// check. Use [`InheritanceResolver`] to opt into following local base classes.
pub struct ControllerClassifier;

impl ControllerClassifier {
    /// Returns `true` if any direct base type of `class` equals one of `base_names`.
    ///
    /// Matching is case-sensitive and does not strip generic arguments or namespaces,
    /// so `Controller<T>` and `Mvc.Controller` only match when configured verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use mvc_enumerator::classifier::ControllerClassifier;
    /// use mvc_enumerator::model::ClassDeclaration;
    ///
    /// let mut class = ClassDeclaration::new("HomeController");
    /// class.base_types.push("Controller".to_string());
    /// assert!(ControllerClassifier::is_controller(&class, &["Controller".to_string()]));
    /// ```
    pub fn is_controller(class: &ClassDeclaration, base_names: &[String]) -> bool {
        class
            .base_types
            .iter()
            .any(|base| base_names.iter().any(|name| name == base))
    }
}

/// Opt-in transitive controller detection over locally defined classes.
///
/// Built in a first pass over every parsed unit, recording each class's simple name
/// and direct base types. [`InheritanceResolver::is_controller`] then follows the
/// base chain through this map until it reaches a configured base name. Base types
/// defined outside the scanned sources are never resolved.
#[derive(Debug, Default)]
pub struct InheritanceResolver {
    bases_by_class: HashMap<String, Vec<String>>,
}

impl InheritanceResolver {
    /// Records the direct bases of every class in `units`.
    ///
    /// When two classes share a simple name their base lists are merged.
    pub fn from_units(units: &[SourceUnit]) -> Self {
        let mut bases_by_class: HashMap<String, Vec<String>> = HashMap::new();

        for class in units.iter().flat_map(|unit| unit.classes.iter()) {
            let entry = bases_by_class.entry(class.name.clone()).or_default();
            for base in &class.base_types {
                if !entry.contains(base) {
                    entry.push(base.clone());
                }
            }
        }

        debug!("Recorded {} local classes for inheritance resolution", bases_by_class.len());

        Self { bases_by_class }
    }

    /// Returns `true` if `class` directly or transitively derives from a configured base.
    pub fn is_controller(&self, class: &ClassDeclaration, base_names: &[String]) -> bool {
        if ControllerClassifier::is_controller(class, base_names) {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(class.name.as_str());
        let mut pending: Vec<&str> = class.base_types.iter().map(String::as_str).collect();

        while let Some(base) = pending.pop() {
            if base_names.iter().any(|name| name == base) {
                debug!("{} reaches controller base {}", class.qualified_name, base);
                return true;
            }
            if !visited.insert(base) {
                continue;
            }
            if let Some(next) = self.bases_by_class.get(base) {
                pending.extend(next.iter().map(String::as_str));
            }
        }

        false
    }
}
