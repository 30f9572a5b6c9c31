//! HTTP verb derivation for controller actions.

use crate::extractor::HttpMethod;
use crate::model::{AttributeInstance, MethodDeclaration};

/// Attributes that carry their verbs as arguments, e.g. `[AcceptVerbs("GET", "POST")]`.
const VERB_LIST_ATTRIBUTES: &[&str] = &["AcceptVerbs", "HttpMethod"];

/// Method name prefixes used by the action naming convention.
const CONVENTION_PREFIXES: &[(&str, HttpMethod)] = &[
    ("Get", HttpMethod::Get),
    ("Post", HttpMethod::Post),
    ("Put", HttpMethod::Put),
    ("Delete", HttpMethod::Delete),
    ("Patch", HttpMethod::Patch),
    ("Head", HttpMethod::Head),
    ("Options", HttpMethod::Options),
];

/// Derives the verbs served by `method`.
///
/// Precedence:
/// 1. explicit verb attributes (`[HttpGet]`, `[HttpPost]`, ...) in attribute order
/// 2. verbs listed by a generic attribute such as `[AcceptVerbs(...)]`
/// 3. the method name convention (`GetUser` -> GET), falling back to GET
///
/// The returned list never contains duplicates and is never empty.
pub fn derive_http_methods(method: &MethodDeclaration) -> Vec<HttpMethod> {
    let explicit: Vec<HttpMethod> = method
        .attributes
        .iter()
        .filter_map(verb_attribute_method)
        .collect();
    if !explicit.is_empty() {
        return dedup(explicit);
    }

    let declared: Vec<HttpMethod> = method
        .attributes
        .iter()
        .filter(|attr| VERB_LIST_ATTRIBUTES.contains(&attr.short_name()))
        .flat_map(declared_verbs)
        .collect();
    if !declared.is_empty() {
        return dedup(declared);
    }

    vec![method_from_name(&method.name)]
}

/// Maps `HttpGet`, `HttpPostAttribute`, `Mvc.HttpPut`... to their verb.
pub fn verb_attribute_method(attr: &AttributeInstance) -> Option<HttpMethod> {
    let rest = attr.short_name().strip_prefix("Http")?;
    if rest.is_empty() || rest == "Method" {
        return None;
    }
    HttpMethod::parse(rest)
}

/// Verbs listed in the arguments of a verb-declaring attribute.
///
/// Accepts string literals (`"POST"`) and enum flag expressions
/// (`HttpVerbs.Get | HttpVerbs.Post`). Named arguments are ignored.
fn declared_verbs(attr: &AttributeInstance) -> Vec<HttpMethod> {
    attr.positional()
        .flat_map(|arg| arg.text().split(['|', ',']))
        .filter_map(|token| {
            let token = token.trim().trim_matches('"');
            let last = token.rsplit('.').next().unwrap_or(token);
            HttpMethod::parse(last)
        })
        .collect()
}

/// Infers a verb from the longest matching convention prefix, ignoring case.
pub fn method_from_name(name: &str) -> HttpMethod {
    let lower = name.to_ascii_lowercase();

    CONVENTION_PREFIXES
        .iter()
        .filter(|(prefix, _)| lower.starts_with(&prefix.to_ascii_lowercase()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, method)| *method)
        .unwrap_or(HttpMethod::Get)
}

fn dedup(methods: Vec<HttpMethod>) -> Vec<HttpMethod> {
    let mut unique = Vec::with_capacity(methods.len());
    for method in methods {
        if !unique.contains(&method) {
            unique.push(method);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeArgument;

    fn method_with_attrs(name: &str, attrs: Vec<AttributeInstance>) -> MethodDeclaration {
        let mut method = MethodDeclaration::new(name);
        method.attributes = attrs;
        method
    }

    fn attr(name: &str) -> AttributeInstance {
        AttributeInstance::new(name, vec![])
    }

    #[test]
    fn test_explicit_attribute_wins_over_name() {
        let method = method_with_attrs("GetUser", vec![attr("HttpPost")]);
        assert_eq!(derive_http_methods(&method), vec![HttpMethod::Post]);
    }

    #[test]
    fn test_multiple_verb_attributes_keep_order() {
        let method = method_with_attrs(
            "Save",
            vec![attr("HttpPut"), attr("Authorize"), attr("HttpPost"), attr("HttpPut")],
        );
        assert_eq!(
            derive_http_methods(&method),
            vec![HttpMethod::Put, HttpMethod::Post]
        );
    }

    #[test]
    fn test_qualified_and_suffixed_verb_attribute() {
        let method = method_with_attrs(
            "Remove",
            vec![attr("System.Web.Http.HttpDeleteAttribute")],
        );
        assert_eq!(derive_http_methods(&method), vec![HttpMethod::Delete]);
    }

    #[test]
    fn test_accept_verbs_with_string_literals() {
        let accept = AttributeInstance::new(
            "AcceptVerbs",
            vec![
                AttributeArgument::Literal("GET".to_string()),
                AttributeArgument::Literal("POST".to_string()),
            ],
        );
        let method = method_with_attrs("Index", vec![accept]);
        assert_eq!(
            derive_http_methods(&method),
            vec![HttpMethod::Get, HttpMethod::Post]
        );
    }

    #[test]
    fn test_accept_verbs_with_enum_flags() {
        let accept = AttributeInstance::new(
            "AcceptVerbs",
            vec![AttributeArgument::Expression(
                "HttpVerbs.Put | HttpVerbs.Patch".to_string(),
            )],
        );
        let method = method_with_attrs("Update", vec![accept]);
        assert_eq!(
            derive_http_methods(&method),
            vec![HttpMethod::Put, HttpMethod::Patch]
        );
    }

    #[test]
    fn test_accept_verbs_ignores_named_arguments() {
        let accept = AttributeInstance::new(
            "AcceptVerbs",
            vec![
                AttributeArgument::Literal("POST".to_string()),
                AttributeArgument::named("Route", AttributeArgument::Literal("head".to_string())),
            ],
        );
        let method = method_with_attrs("Submit", vec![accept]);
        assert_eq!(derive_http_methods(&method), vec![HttpMethod::Post]);
    }

    #[test]
    fn test_verb_attribute_beats_accept_verbs() {
        let accept = AttributeInstance::new(
            "AcceptVerbs",
            vec![AttributeArgument::Literal("PUT".to_string())],
        );
        let method = method_with_attrs("Update", vec![accept, attr("HttpPatch")]);
        assert_eq!(derive_http_methods(&method), vec![HttpMethod::Patch]);
    }

    #[test]
    fn test_name_convention() {
        assert_eq!(method_from_name("GetUsers"), HttpMethod::Get);
        assert_eq!(method_from_name("postComment"), HttpMethod::Post);
        assert_eq!(method_from_name("DELETEItem"), HttpMethod::Delete);
        assert_eq!(method_from_name("PatchOrder"), HttpMethod::Patch);
        assert_eq!(method_from_name("HeadCheck"), HttpMethod::Head);
        assert_eq!(method_from_name("OptionsPreflight"), HttpMethod::Options);
        assert_eq!(method_from_name("Putative"), HttpMethod::Put);
    }

    #[test]
    fn test_name_convention_defaults_to_get() {
        assert_eq!(method_from_name("Index"), HttpMethod::Get);
        assert_eq!(method_from_name(""), HttpMethod::Get);
    }

    #[test]
    fn test_unrelated_http_attribute_is_not_a_verb() {
        assert_eq!(verb_attribute_method(&attr("HttpMethod")), None);
        assert_eq!(verb_attribute_method(&attr("Http")), None);
        assert_eq!(verb_attribute_method(&attr("HttpsOnly")), None);
    }
}
