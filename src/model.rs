//! Language-agnostic declaration model produced by the parser.
//!
//! A parsed source file becomes a [`SourceUnit`]: a flat, source-ordered list of
//! [`ClassDeclaration`]s, each owning its [`MethodDeclaration`]s. Attributes are
//! plain `{name, arguments}` records; nothing here knows what a route or a verb is.

use std::path::PathBuf;

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path of the file the declarations were read from
    pub path: PathBuf,
    /// Classes in source order; nested classes follow their container
    pub classes: Vec<ClassDeclaration>,
}

/// A class declaration with its direct base types and members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    /// Simple class name (e.g. `UsersController`)
    pub name: String,
    /// Namespace and containing types joined with `.` (e.g. `App.Web.UsersController`)
    pub qualified_name: String,
    /// Base types exactly as written in the base list, unresolved
    pub base_types: Vec<String>,
    /// Attributes applied to the class
    pub attributes: Vec<AttributeInstance>,
    /// Methods declared directly in the class body
    pub methods: Vec<MethodDeclaration>,
}

/// A method declared in a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Attributes applied to the method, in source order
    pub attributes: Vec<AttributeInstance>,
    /// Parameter names, in declaration order
    pub parameters: Vec<String>,
    /// Set when the parser recovered from a syntax error inside this declaration
    pub malformed: bool,
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl Visibility {
    /// Derives accessibility from the modifier keywords of a member.
    ///
    /// C# class members without an access modifier are private.
    pub fn from_modifiers<S: AsRef<str>>(modifiers: &[S]) -> Self {
        let has = |keyword: &str| modifiers.iter().any(|m| m.as_ref() == keyword);

        match (has("public"), has("protected"), has("internal"), has("private")) {
            (true, _, _, _) => Visibility::Public,
            (_, true, true, _) => Visibility::ProtectedInternal,
            (_, true, _, true) => Visibility::PrivateProtected,
            (_, true, _, _) => Visibility::Protected,
            (_, _, true, _) => Visibility::Internal,
            _ => Visibility::Private,
        }
    }
}

/// An attribute instance such as `[HttpGet("{id}")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInstance {
    /// Attribute name as written, without resolving namespaces
    pub name: String,
    /// Arguments in order: string literals unquoted, anything else as raw source text.
    /// Named arguments (`Name = "x"`, `template: "x"`) keep their name.
    pub arguments: Vec<AttributeArgument>,
}

/// A single attribute argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeArgument {
    /// A string literal, with quotes removed
    Literal(String),
    /// Any other expression, kept as opaque source text
    Expression(String),
    /// A property assignment (`Name = "x"`) or named constructor argument (`template: "x"`)
    Named {
        name: String,
        value: Box<AttributeArgument>,
    },
}

impl AttributeArgument {
    pub fn named(name: impl Into<String>, value: AttributeArgument) -> Self {
        AttributeArgument::Named {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Returns the unquoted value for string literals.
    ///
    /// Named arguments are looked through to their value.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttributeArgument::Literal(value) => Some(value),
            AttributeArgument::Expression(_) => None,
            AttributeArgument::Named { value, .. } => value.as_literal(),
        }
    }

    /// Returns the value text regardless of its kind, without any argument name.
    pub fn text(&self) -> &str {
        match self {
            AttributeArgument::Literal(value) | AttributeArgument::Expression(value) => value,
            AttributeArgument::Named { value, .. } => value.text(),
        }
    }

    /// Argument name for named arguments.
    pub fn name(&self) -> Option<&str> {
        match self {
            AttributeArgument::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl AttributeInstance {
    pub fn new(name: impl Into<String>, arguments: Vec<AttributeArgument>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Attribute name with any namespace qualification and `Attribute` suffix removed.
    ///
    /// `System.Web.Mvc.HttpGetAttribute` and `HttpGet` both yield `HttpGet`.
    pub fn short_name(&self) -> &str {
        let name = self.name.rsplit('.').next().unwrap_or(&self.name);
        match name.strip_suffix("Attribute") {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        }
    }

    /// Arguments passed by position, in order.
    pub fn positional(&self) -> impl Iterator<Item = &AttributeArgument> {
        self.arguments.iter().filter(|arg| arg.name().is_none())
    }

    /// Value of the named argument `name`, compared case-insensitively.
    pub fn named(&self, name: &str) -> Option<&AttributeArgument> {
        self.arguments
            .iter()
            .find(|arg| arg.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualified_name: name.clone(),
            name,
            base_types: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }
}

impl MethodDeclaration {
    /// Creates a public, non-static method without attributes or parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            attributes: Vec::new(),
            parameters: Vec::new(),
            malformed: false,
        }
    }
}
