//! Route template composition.

use crate::extractor::verb::verb_attribute_method;
use crate::model::{AttributeInstance, ClassDeclaration, MethodDeclaration};

/// Attribute names that carry a route template as their first positional argument.
const ROUTE_ATTRIBUTES: &[&str] = &["Route", "RoutePrefix"];

/// Named argument that may supply the template instead (`[Route(template: "x")]`).
const TEMPLATE_ARGUMENT: &str = "template";

/// Route template declared on the controller class, if any.
pub fn class_template(class: &ClassDeclaration) -> Option<&str> {
    route_template(&class.attributes)
}

/// Route template declared on the action.
///
/// A `[Route]` attribute takes precedence; otherwise the first verb attribute with a
/// literal template (`[HttpGet("{id}")]`) is used.
pub fn method_template(method: &MethodDeclaration) -> Option<&str> {
    route_template(&method.attributes).or_else(|| {
        method
            .attributes
            .iter()
            .filter(|attr| verb_attribute_method(attr).is_some())
            .find_map(literal_template)
    })
}

/// Full route of an action: the class template joined with the method template.
///
/// Placeholders such as `{id}` are kept verbatim.
pub fn compose_route(class: &ClassDeclaration, method: &MethodDeclaration) -> String {
    join_templates(class_template(class), method_template(method))
}

/// Joins two templates with exactly one `/` between them.
///
/// Separators at either end of both segments are dropped, so `"/api/"` and `"{id}/"`
/// give `"api/{id}"`. Missing or empty segments contribute nothing.
pub fn join_templates(prefix: Option<&str>, path: Option<&str>) -> String {
    [prefix, path]
        .into_iter()
        .flatten()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn route_template(attributes: &[AttributeInstance]) -> Option<&str> {
    attributes
        .iter()
        .filter(|attr| ROUTE_ATTRIBUTES.contains(&attr.short_name()))
        .find_map(literal_template)
}

/// Template literal of a routing attribute.
///
/// Only the first positional argument or a `template:` argument count; properties
/// such as `Name = "..."` or `Order = 1` never do.
fn literal_template(attr: &AttributeInstance) -> Option<&str> {
    match attr.positional().next() {
        Some(first) => first.as_literal(),
        None => attr.named(TEMPLATE_ARGUMENT)?.as_literal(),
    }
}
