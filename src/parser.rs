use crate::error::{Error, Result};
use crate::model::{
    AttributeArgument, AttributeInstance, ClassDeclaration, MethodDeclaration, SourceUnit,
    Visibility,
};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Keywords that may appear in a member's modifier list.
const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "abstract", "virtual",
    "override", "sealed", "async", "extern", "new", "partial", "unsafe", "readonly",
];

/// C# parser producing the declaration model.
///
/// The `CSharpParser` uses `tree-sitter-c-sharp` to build a concrete syntax tree and
/// walks it to collect namespaces, classes, their base lists and attributes, and the
/// methods declared in each class body. Parsing is error tolerant: a syntax error
/// inside a method marks that method as malformed instead of failing the file.
///
/// # Example
///
/// ```no_run
/// use mvc_enumerator::parser::CSharpParser;
/// use std::path::Path;
///
/// let mut parser = CSharpParser::new().unwrap();
/// let unit = parser.parse_file(Path::new("Controllers/HomeController.cs")).unwrap();
/// println!("Parsed {} classes", unit.classes.len());
/// ```
pub struct CSharpParser {
    parser: Parser,
}

/// Namespace and enclosing type names while walking the tree.
#[derive(Clone, Default)]
struct Scope {
    namespaces: Vec<String>,
    types: Vec<String>,
}

impl Scope {
    fn qualify(&self, name: &str) -> String {
        self.namespaces
            .iter()
            .chain(self.types.iter())
            .map(String::as_str)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn with_namespace(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.namespaces.extend(
            name.split('.')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );
        next
    }

    fn with_type(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.types.push(name.to_string());
        next
    }
}

impl CSharpParser {
    /// Creates a parser with the C# grammar loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is incompatible with the linked tree-sitter runtime.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Reads and parses a single C# source file.
    ///
    /// Files that are not valid UTF-8 are decoded lossily; a leading byte order mark
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The parser produces no syntax tree
    pub fn parse_file(&mut self, path: &Path) -> Result<SourceUnit> {
        debug!("Parsing file: {}", path.display());

        let bytes = fs::read(path).map_err(|source| Error::Read {
            file: path.to_path_buf(),
            source,
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                debug!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        self.parse_source(path, &content)
    }

    /// Parses C# source text that belongs to `path`.
    pub fn parse_source(&mut self, path: &Path, source: &str) -> Result<SourceUnit> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let tree = self.parser.parse(source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            message: "parser returned no syntax tree".to_string(),
        })?;
        let root = tree.root_node();

        let mut classes = Vec::new();
        walk_declarations(root, &Scope::default(), source, &mut classes);

        if root.has_error() {
            if classes.is_empty() {
                warn!(
                    "{} contains syntax errors and no class could be recovered",
                    path.display()
                );
            } else {
                warn!(
                    "{} contains syntax errors, continuing with {} recovered classes",
                    path.display(),
                    classes.len()
                );
            }
        }

        debug!(
            "Successfully parsed file: {} ({} classes)",
            path.display(),
            classes.len()
        );

        Ok(SourceUnit {
            path: path.to_path_buf(),
            classes,
        })
    }

    /// Parses multiple files, continuing even if some fail.
    ///
    /// Failures are logged as warnings and returned in place, so the caller can skip
    /// them while keeping every successfully parsed unit.
    pub fn parse_files(&mut self, paths: &[PathBuf]) -> Vec<Result<SourceUnit>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<SourceUnit>> = paths
            .iter()
            .map(|path| {
                let result = self.parse_file(path);
                if let Err(e) = &result {
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
                result
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Walks namespace-level declarations, collecting classes in source order.
///
/// Error recovery can split one broken class over several sibling nodes, so a level
/// containing an `ERROR` node is rebuilt as a whole by [`recover_classes`].
fn walk_declarations(node: Node<'_>, scope: &Scope, source: &str, out: &mut Vec<ClassDeclaration>) {
    let mut cursor = node.walk();
    if node.named_children(&mut cursor).any(|child| child.is_error()) {
        recover_classes(node, scope, source, out);
        return;
    }

    // A file-scoped namespace applies to every sibling that follows it
    let mut scope = scope.clone();
    for child in node.named_children(&mut cursor) {
        walk_declaration(child, &mut scope, source, out);
    }
}

fn walk_declaration(
    node: Node<'_>,
    scope: &mut Scope,
    source: &str,
    out: &mut Vec<ClassDeclaration>,
) {
    match node.kind() {
        "file_scoped_namespace_declaration" => {
            if let Some(name) = field_text(node, "name", source) {
                *scope = scope.with_namespace(&name);
            }
            walk_declarations(node, scope, source, out);
        }
        "namespace_declaration" => {
            let inner = match field_text(node, "name", source) {
                Some(name) => scope.with_namespace(&name),
                None => scope.clone(),
            };
            if let Some(body) = node.child_by_field_name("body") {
                walk_declarations(body, &inner, source, out);
            }
        }
        "class_declaration" => handle_class(node, scope, source, out),
        _ => {}
    }
}

/// What the next name token in an error region belongs to.
#[derive(Clone, Copy)]
enum Pending {
    Nothing,
    Namespace,
    ClassName,
    BaseTypes,
}

/// Rebuilds classes from a declaration level the grammar could only partly parse.
///
/// The children of `region` are flattened into intact subtrees and loose tokens,
/// looking through `ERROR` nodes. A `class` keyword followed by a name opens a class
/// that collects the intact methods after it, so an unbalanced brace costs the broken
/// member rather than the whole controller.
fn recover_classes(region: Node<'_>, scope: &Scope, source: &str, out: &mut Vec<ClassDeclaration>) {
    let mut nodes = Vec::new();
    flatten_error(region, &mut nodes);

    let mut scope = scope.clone();
    let mut current: Option<ClassDeclaration> = None;
    let mut nested = Vec::new();
    let mut attributes = Vec::new();
    let mut pending = Pending::Nothing;

    for node in nodes {
        match (node.kind(), pending) {
            ("namespace", _) => pending = Pending::Namespace,
            ("identifier" | "qualified_name", Pending::Namespace) => {
                scope = scope.with_namespace(&node_text(node, source));
                pending = Pending::Nothing;
            }
            ("class", _) => {
                flush_recovered(current.take(), &mut nested, out);
                pending = Pending::ClassName;
            }
            ("identifier", Pending::ClassName) => {
                let name = node_text(node, source);
                let mut class = ClassDeclaration::new(name.clone());
                class.qualified_name = scope.qualify(&name);
                class.attributes = std::mem::take(&mut attributes);
                current = Some(class);
                pending = Pending::Nothing;
            }
            (":", Pending::Nothing) => {
                if current.as_ref().is_some_and(|c| c.methods.is_empty()) {
                    pending = Pending::BaseTypes;
                }
            }
            ("identifier" | "qualified_name" | "generic_name", Pending::BaseTypes) => {
                if let Some(class) = current.as_mut() {
                    class.base_types.push(node_text(node, source));
                }
            }
            ("base_list", _) => {
                if let Some(class) = current.as_mut() {
                    class.base_types.extend(base_list_names(node, source));
                }
            }
            ("attribute_list", _) => attributes.extend(attribute_list_entries(node, source)),
            ("method_declaration" | "local_function_statement", _) => {
                if let Some(class) = current.as_mut() {
                    class.methods.extend(method_of(node, source));
                }
                attributes.clear();
                pending = Pending::Nothing;
            }
            ("class_declaration", _) if node.child_by_field_name("body").is_none() => {
                // Header parsed on its own; the members follow as loose nodes
                flush_recovered(current.take(), &mut nested, out);
                let mut header = Vec::new();
                handle_class(node, &scope, source, &mut header);
                current = header.into_iter().next();
                attributes.clear();
                pending = Pending::Nothing;
            }
            ("class_declaration", _) => match current.as_ref() {
                Some(class) => handle_class(node, &scope.with_type(&class.name), source, &mut nested),
                None => handle_class(node, &scope, source, out),
            },
            ("namespace_declaration" | "file_scoped_namespace_declaration", _) => {
                walk_declaration(node, &mut scope, source, out)
            }
            (",", Pending::BaseTypes) => {}
            _ => pending = Pending::Nothing,
        }
    }

    flush_recovered(current, &mut nested, out);
}

/// Intact subtrees and tokens below `node`, in source order.
fn flatten_error<'tree>(node: Node<'tree>, out: &mut Vec<Node<'tree>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.kind() == "global_statement" {
            flatten_error(child, out);
        } else {
            out.push(child);
        }
    }
}

fn flush_recovered(
    class: Option<ClassDeclaration>,
    nested: &mut Vec<ClassDeclaration>,
    out: &mut Vec<ClassDeclaration>,
) {
    if let Some(class) = class {
        debug!(
            "Recovered class {} with {} methods from a syntax error",
            class.qualified_name,
            class.methods.len()
        );
        out.push(class);
    }
    out.append(nested);
}

fn handle_class(node: Node<'_>, scope: &Scope, source: &str, out: &mut Vec<ClassDeclaration>) {
    let Some(name) = field_text(node, "name", source) else {
        return;
    };

    let mut class = ClassDeclaration::new(name.clone());
    class.qualified_name = scope.qualify(&name);
    class.attributes = attributes_of(node, source);
    class.base_types = base_types_of(node, source);

    let inner = scope.with_type(&name);
    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_members(body, &mut class, &inner, source, &mut nested);
    }

    debug!(
        "Found class {} : [{}] with {} methods",
        class.qualified_name,
        class.base_types.join(", "),
        class.methods.len()
    );

    out.push(class);
    out.extend(nested);
}

/// Methods and nested classes of a class body, looking inside recovered error regions.
fn collect_members(
    body: Node<'_>,
    class: &mut ClassDeclaration,
    inner: &Scope,
    source: &str,
    nested: &mut Vec<ClassDeclaration>,
) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "method_declaration" => class.methods.extend(method_of(member, source)),
            "class_declaration" => handle_class(member, inner, source, nested),
            "ERROR" => collect_members(member, class, inner, source, nested),
            _ => {}
        }
    }
}

fn method_of(node: Node<'_>, source: &str) -> Option<MethodDeclaration> {
    let Some(name) = field_text(node, "name", source) else {
        debug!("Skipping method without a name at line {}", node.start_position().row + 1);
        return None;
    };

    let modifiers = modifiers_of(node, source);
    let parameters = node
        .child_by_field_name("parameters")
        .map(|list| parameter_names(list, source))
        .unwrap_or_default();

    Some(MethodDeclaration {
        visibility: Visibility::from_modifiers(&modifiers),
        is_static: modifiers.iter().any(|m| m == "static"),
        attributes: attributes_of(node, source),
        parameters,
        malformed: node.has_error(),
        name,
    })
}

/// Modifier keywords of a declaration, in source order.
fn modifiers_of(node: Node<'_>, source: &str) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let text = node_text(child, source);
        let is_modifier = child.kind() == "modifier" || MODIFIER_KEYWORDS.contains(&child.kind());
        if is_modifier && MODIFIER_KEYWORDS.contains(&text.as_str()) {
            modifiers.push(text);
        }
    }
    modifiers
}

/// Attributes applied directly to a declaration.
///
/// Attribute lists with an explicit target other than the declaration itself
/// (such as `[return: ...]`) are ignored.
fn attributes_of(node: Node<'_>, source: &str) -> Vec<AttributeInstance> {
    let mut attributes = Vec::new();
    let mut cursor = node.walk();
    for list in node.named_children(&mut cursor) {
        if list.kind() == "attribute_list" {
            attributes.extend(attribute_list_entries(list, source));
        }
    }
    attributes
}

fn attribute_list_entries(list: Node<'_>, source: &str) -> Vec<AttributeInstance> {
    if has_foreign_target(list, source) {
        return Vec::new();
    }
    let mut attributes = Vec::new();
    let mut cursor = list.walk();
    for attr in list.named_children(&mut cursor) {
        if attr.kind() != "attribute" {
            continue;
        }
        let Some(name) = field_text(attr, "name", source) else {
            continue;
        };
        attributes.push(AttributeInstance::new(name, attribute_arguments(attr, source)));
    }
    attributes
}

fn has_foreign_target(list: Node<'_>, source: &str) -> bool {
    let mut cursor = list.walk();
    let targets: Vec<String> = list
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "attribute_target_specifier")
        .map(|child| node_text(child, source))
        .collect();
    targets
        .iter()
        .any(|target| !matches!(target.trim_end_matches(':').trim(), "method" | "type"))
}

fn attribute_arguments(attr: Node<'_>, source: &str) -> Vec<AttributeArgument> {
    let mut arguments = Vec::new();
    let mut cursor = attr.walk();
    for list in attr.named_children(&mut cursor) {
        if list.kind() != "attribute_argument_list" {
            continue;
        }
        let mut arg_cursor = list.walk();
        for arg in list.named_children(&mut arg_cursor) {
            if arg.kind() != "attribute_argument" {
                continue;
            }
            // The expression is the last named child, after any `Name =` / `name:` prefix
            let mut expr_cursor = arg.walk();
            let Some(expr) = arg.named_children(&mut expr_cursor).last() else {
                continue;
            };
            let value = argument_value(expr, source);
            match field_text(arg, "name", source) {
                Some(name) => arguments.push(AttributeArgument::named(name, value)),
                None => arguments.push(value),
            }
        }
    }
    arguments
}

fn argument_value(expr: Node<'_>, source: &str) -> AttributeArgument {
    let raw = node_text(expr, source);
    match expr.kind() {
        "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
            match unquote_string_literal(&raw) {
                Some(value) => AttributeArgument::Literal(value),
                None => AttributeArgument::Expression(raw),
            }
        }
        _ => AttributeArgument::Expression(raw),
    }
}

fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("@\"") {
        let value = rest.strip_suffix('"')?;
        return Some(value.replace("\"\"", "\""));
    }
    let quotes = trimmed.chars().take_while(|ch| *ch == '"').count();
    if quotes >= 3 {
        let fence = "\"".repeat(quotes);
        let value = trimmed.strip_prefix(&fence)?.strip_suffix(&fence)?;
        return Some(value.trim().to_string());
    }
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
}

fn base_types_of(node: Node<'_>, source: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = node.walk();
    for list in node.named_children(&mut cursor) {
        if list.kind() == "base_list" {
            bases.extend(base_list_names(list, source));
        }
    }
    bases
}

fn base_list_names(list: Node<'_>, source: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = list.walk();
    for base in list.named_children(&mut cursor) {
        let name = match base.kind() {
            "argument_list" => continue,
            "primary_constructor_base_type" => base
                .child_by_field_name("type")
                .map(|ty| node_text(ty, source))
                .unwrap_or_else(|| node_text(base, source)),
            _ => node_text(base, source),
        };
        if !name.is_empty() {
            bases.push(name);
        }
    }
    bases
}

fn parameter_names(list: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = list.walk();
    let names: Vec<String> = list
        .named_children(&mut cursor)
        .filter(|param| param.kind() == "parameter")
        .filter_map(|param| field_text(param, "name", source))
        .collect();
    names
}

fn field_text(node: Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source))
        .filter(|text| !text.is_empty())
}

fn node_text(node: Node<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or("")
        .trim()
        .to_string()
}
