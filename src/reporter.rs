//! Console and CSV rendering of a [`ResultSet`].
//!
//! Controller keys are shown with the common directory prefix removed; see
//! [`crate::paths::common_prefix`].

use crate::aggregator::ResultSet;
use crate::paths::trim_prefix;

/// CSV column headers, in output order.
///
/// The header line joins them with `", "`; data rows use a bare `,`.
pub const CSV_HEADERS: [&str; 5] = ["Controller", "Method Name", "Route", "HTTP Method", "Attributes"];

/// Separator used for multi-valued fields (verbs, attributes).
pub const VALUE_SEPARATOR: &str = ", ";

const SECTION_RULE: &str = "======================";

/// Renders the console listing: every controller followed by its action names.
pub fn render_console(results: &ResultSet, prefix: &str) -> String {
    let mut out = String::new();

    for (key, endpoints) in results.iter() {
        out.push_str("Controller:\n");
        out.push_str(&trim_prefix(key, prefix));
        out.push_str("\n\nMethods:\n");
        for endpoint in endpoints {
            out.push_str(&endpoint.method_name);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(SECTION_RULE);
        out.push_str("\n\n");
    }

    out
}

/// Renders the CSV document: a header row and one row per endpoint.
pub fn render_csv(results: &ResultSet, prefix: &str) -> String {
    let mut out = CSV_HEADERS.join(", ");
    out.push_str("\r\n");

    for row in results.rows(|key| trim_prefix(key, prefix)) {
        push_record(
            &mut out,
            [
                row.controller.clone(),
                row.endpoint.method_name.clone(),
                row.endpoint.route.clone(),
                row.endpoint.verbs_joined(VALUE_SEPARATOR),
                row.endpoint.attributes.join(VALUE_SEPARATOR),
            ],
        );
    }

    out
}

fn push_record<I>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = String>,
{
    let line = fields
        .into_iter()
        .map(|field| escape_field(&field))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Quotes a field only when it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
