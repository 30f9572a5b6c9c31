//! Entry-point extraction for controller classes.
//!
//! Given a class already classified as a controller, the [`EndpointExtractor`]
//! enumerates its public actions and derives, per action, the HTTP verbs it serves,
//! its route template and the attributes applied to it.
//!
//! - Verb derivation lives in [`verb`]
//! - Route template composition lives in [`route`]
//!
//! # Example
//!
//! ```
//! use mvc_enumerator::extractor::{EndpointExtractor, HttpMethod};
//! use mvc_enumerator::model::{ClassDeclaration, MethodDeclaration};
//!
//! let mut class = ClassDeclaration::new("HomeController");
//! class.base_types.push("Controller".to_string());
//! class.methods.push(MethodDeclaration::new("GetIndex"));
//!
//! let endpoints = EndpointExtractor::extract(&class);
//! assert_eq!(endpoints[0].http_methods, vec![HttpMethod::Get]);
//! ```

pub mod route;
pub mod verb;

use crate::model::{ClassDeclaration, MethodDeclaration, Visibility};
use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;

/// Attribute that marks a public controller method as not being an action.
const NON_ACTION_ATTRIBUTE: &str = "NonAction";

/// Routing metadata of a single controller action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointResult {
    /// Name of the action method
    pub method_name: String,
    /// Route template, empty when neither class nor method declares one
    pub route: String,
    /// Verbs served by the action, without duplicates
    pub http_methods: Vec<HttpMethod>,
    /// Attribute names on the method, as written
    pub attributes: Vec<String>,
}

/// HTTP methods an action can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Parses a verb token case-insensitively (`"get"`, `"Post"`, `"DELETE"`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Upper-case verb token as used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Extracts endpoints from controller classes.
pub struct EndpointExtractor;

impl EndpointExtractor {
    /// Returns one [`EndpointResult`] per action of `class`, in declaration order.
    ///
    /// An action is a public, non-static method not marked `[NonAction]`. Methods the
    /// parser flagged as malformed are skipped.
    pub fn extract(class: &ClassDeclaration) -> Vec<EndpointResult> {
        class
            .methods
            .iter()
            .filter(|method| Self::is_action(method))
            .filter_map(|method| Self::extract_method(class, method))
            .collect()
    }

    /// Whether `method` can be invoked as an HTTP handler.
    pub fn is_action(method: &MethodDeclaration) -> bool {
        method.visibility == Visibility::Public
            && !method.is_static
            && !method
                .attributes
                .iter()
                .any(|attr| attr.short_name() == NON_ACTION_ATTRIBUTE)
    }

    fn extract_method(class: &ClassDeclaration, method: &MethodDeclaration) -> Option<EndpointResult> {
        if method.malformed || method.name.is_empty() {
            debug!(
                "Skipping malformed method {} in {}",
                method.name, class.qualified_name
            );
            return None;
        }

        let endpoint = EndpointResult {
            method_name: method.name.clone(),
            route: route::compose_route(class, method),
            http_methods: verb::derive_http_methods(method),
            attributes: method.attributes.iter().map(|attr| attr.name.clone()).collect(),
        };

        debug!(
            "Found action {}.{} [{}] {}",
            class.qualified_name,
            endpoint.method_name,
            endpoint.verbs_joined(", "),
            endpoint.route
        );

        Some(endpoint)
    }
}

impl EndpointResult {
    /// Verb tokens joined with `separator`.
    pub fn verbs_joined(&self, separator: &str) -> String {
        self.http_methods
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Whether an attribute with exactly this name is applied to the action.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr == name)
    }
}
