//! Java syntax tree.
//!
//! Every node is a plain value; trees are assembled through the builders in
//! [`super::builder`] and rendered by [`super::codegen`].

use std::fmt;

use crate::error::BuildError;

/// A validated simple or qualified Java name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// A simple name such as a field, method or class name.
    pub fn simple(node: &'static str, name: &str) -> Result<Self, BuildError> {
        if name.is_empty() {
            return Err(BuildError::EmptyIdentifier { node });
        }
        if !is_simple_name(name) {
            return Err(BuildError::InvalidIdentifier {
                node,
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// A dotted name such as a package or a fully-qualified import.
    /// The last segment of an import may be `*`.
    pub fn qualified(node: &'static str, name: &str) -> Result<Self, BuildError> {
        if name.is_empty() {
            return Err(BuildError::EmptyIdentifier { node });
        }
        let segments: Vec<&str> = name.split('.').collect();
        let last = segments.len() - 1;
        let valid = segments
            .iter()
            .enumerate()
            .all(|(i, s)| is_simple_name(s) || (i == last && i > 0 && *s == "*"));
        if !valid {
            return Err(BuildError::InvalidIdentifier {
                node,
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_simple_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Already-rendered Java source, emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment(pub Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineComment(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment(pub Vec<String>);

/// Declaration modifiers. Variant order is the canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

/// A possibly generic, possibly array type such as `Long`, `byte[]` or
/// `Repository<User, Long>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: Identifier,
    pub generics: Vec<TypeRef>,
    pub array_dims: usize,
}

impl TypeRef {
    /// Parse a type as written in Java source: `String`, `byte[]`,
    /// `java.util.List` or `Map<String, List<Long>>`.
    pub fn new(name: &str) -> Result<Self, BuildError> {
        let source = name.trim();
        if source.is_empty() {
            return Err(BuildError::EmptyIdentifier { node: "type" });
        }
        match parse_type(source) {
            Some((ty, rest)) if rest.trim().is_empty() => Ok(ty),
            _ => Err(BuildError::InvalidIdentifier {
                node: "type",
                name: name.to_string(),
            }),
        }
    }

    pub fn generic(name: &str, generics: Vec<TypeRef>) -> Result<Self, BuildError> {
        let mut type_ref = Self::new(name)?;
        type_ref.generics = generics;
        Ok(type_ref)
    }

    /// The simple name, without generics or array suffix.
    #[cfg(test)]
    pub fn simple_name(&self) -> &str {
        let name = self.name.as_str();
        name.rsplit('.').next().unwrap_or(name)
    }
}

/// Parse one type off the front of `input`, returning it with the unparsed rest.
fn parse_type(input: &str) -> Option<(TypeRef, &str)> {
    let input = input.trim_start();
    let end = input
        .find(|c: char| matches!(c, '<' | '>' | ',' | '['))
        .unwrap_or(input.len());
    let name = Identifier::qualified("type", input[..end].trim()).ok()?;
    let mut rest = &input[end..];

    let mut generics = Vec::new();
    if let Some(args) = rest.strip_prefix('<') {
        rest = args;
        loop {
            let (arg, after) = parse_type(rest)?;
            generics.push(arg);
            let after = after.trim_start();
            match after.strip_prefix(',') {
                Some(next) => rest = next,
                None => {
                    rest = after.strip_prefix('>')?;
                    break;
                }
            }
        }
    }

    let mut array_dims = 0;
    while let Some(after) = rest
        .trim_start()
        .strip_prefix('[')
        .and_then(|r| r.trim_start().strip_prefix(']'))
    {
        rest = after;
        array_dims += 1;
    }

    Some((
        TypeRef {
            name,
            generics,
            array_dims,
        },
        rest,
    ))
}

/// An annotation attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Rendered as a quoted Java string.
    Str(String),
    /// A numeric or boolean literal, rendered verbatim.
    Literal(String),
    /// Rendered as `Type.class`.
    Class(TypeRef),
    /// Rendered as `{a, b}`.
    Array(Vec<AttributeValue>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Literal(value.to_string())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Literal(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Literal(value.to_string())
    }
}

impl From<TypeRef> for AttributeValue {
    fn from(value: TypeRef) -> Self {
        AttributeValue::Class(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: Identifier,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: Identifier,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl(pub Identifier);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl(pub Identifier);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Identifier,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Expr(Expression),
    #[allow(dead_code)]
    Block(Block),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block(pub Vec<Statement>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub ty: TypeRef,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub params: Vec<Parameter>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub params: Vec<Parameter>,
    pub return_type: TypeRef,
    /// `None` renders a `;`-terminated signature.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub super_class: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub extends: Vec<TypeRef>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class(c) => c.name.as_str(),
            TypeDecl::Interface(i) => i.name.as_str(),
        }
    }
}

/// A top-level item of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Package(PackageDecl),
    Import(ImportDecl),
    Doc(DocComment),
    LineComment(LineComment),
    BlockComment(BlockComment),
    Type(TypeDecl),
}

/// Discriminator used for ordering and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Package,
    Import,
    Doc,
    LineComment,
    BlockComment,
    Type,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Package(_) => ItemKind::Package,
            Item::Import(_) => ItemKind::Import,
            Item::Doc(_) => ItemKind::Doc,
            Item::LineComment(_) => ItemKind::LineComment,
            Item::BlockComment(_) => ItemKind::BlockComment,
            Item::Type(_) => ItemKind::Type,
        }
    }
}

impl ItemKind {
    /// Rendering priority inside a compilation unit; lower comes first.
    pub fn priority(self) -> u32 {
        match self {
            ItemKind::Package => 0,
            ItemKind::Import => 1,
            ItemKind::Doc => 2,
            ItemKind::Type => 3,
            ItemKind::LineComment | ItemKind::BlockComment => 100,
        }
    }
}

/// One logical output file: package, imports, optional doc and one type.
///
/// Only [`super::builder::CompilationUnitBuilder`] creates these, so the
/// single-package / single-type invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub(super) items: Vec<Item>,
}

impl CompilationUnit {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn package(&self) -> &str {
        self.items
            .iter()
            .find_map(|item| match item {
                Item::Package(p) => Some(p.0.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Item::Import(i) => Some(i.0.as_str()),
            _ => None,
        })
    }

    pub fn type_decl(&self) -> Option<&TypeDecl> {
        self.items.iter().find_map(|item| match item {
            Item::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn type_name(&self) -> &str {
        self.type_decl().map(TypeDecl::name).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn class(&self) -> Option<&ClassDecl> {
        match self.type_decl()? {
            TypeDecl::Class(c) => Some(c),
            TypeDecl::Interface(_) => None,
        }
    }

    #[cfg(test)]
    pub fn interface(&self) -> Option<&InterfaceDecl> {
        match self.type_decl()? {
            TypeDecl::Interface(i) => Some(i),
            TypeDecl::Class(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_identifier_validation() {
        assert!(Identifier::simple("field", "userId").is_ok());
        assert!(Identifier::simple("field", "$value_1").is_ok());
        assert_eq!(
            Identifier::simple("field", ""),
            Err(BuildError::EmptyIdentifier { node: "field" })
        );
        assert!(Identifier::simple("field", "1abc").is_err());
        assert!(Identifier::simple("field", "user id").is_err());
        assert!(Identifier::simple("field", "a.b").is_err());
    }

    #[test]
    fn test_qualified_identifier_validation() {
        assert!(Identifier::qualified("import", "java.math.BigDecimal").is_ok());
        assert!(Identifier::qualified("import", "java.util.*").is_ok());
        assert!(Identifier::qualified("import", "*").is_err());
        assert!(Identifier::qualified("import", "lombok.Data;").is_err());
        assert!(Identifier::qualified("import", "java..List").is_err());
    }

    #[test]
    fn test_type_ref_arrays() {
        let t = TypeRef::new("byte[]").unwrap();
        assert_eq!(t.name.as_str(), "byte");
        assert_eq!(t.array_dims, 1);
        assert!(TypeRef::new("[]").is_err());
        assert_eq!(TypeRef::new("java.util.List").unwrap().simple_name(), "List");
    }

    #[test]
    fn test_type_ref_generics() {
        let t = TypeRef::new("Map<String, List<Long>>").unwrap();
        assert_eq!(t.name.as_str(), "Map");
        assert_eq!(t.generics.len(), 2);
        assert_eq!(t.generics[0].name.as_str(), "String");
        assert_eq!(t.generics[1].name.as_str(), "List");
        assert_eq!(t.generics[1].generics[0].name.as_str(), "Long");

        let t = TypeRef::new("java.util.List<byte[]>[]").unwrap();
        assert_eq!(t.array_dims, 1);
        assert_eq!(t.generics[0].array_dims, 1);
    }

    #[test]
    fn test_malformed_generics_rejected() {
        for bad in ["Map<String", "Map<>", "Map<String,>", "List<Long>>", "Map String"] {
            assert_eq!(
                TypeRef::new(bad),
                Err(BuildError::InvalidIdentifier {
                    node: "type",
                    name: bad.to_string()
                }),
                "{bad}"
            );
        }
        assert_eq!(
            TypeRef::new("  "),
            Err(BuildError::EmptyIdentifier { node: "type" })
        );
    }

    #[test]
    fn test_modifier_order_is_canonical() {
        let mut mods = vec![Modifier::Final, Modifier::Static, Modifier::Public];
        mods.sort();
        assert_eq!(mods, vec![Modifier::Public, Modifier::Static, Modifier::Final]);
    }

    #[test]
    fn test_item_priority() {
        assert!(ItemKind::Package.priority() < ItemKind::Import.priority());
        assert!(ItemKind::Import.priority() < ItemKind::Doc.priority());
        assert!(ItemKind::Doc.priority() < ItemKind::Type.priority());
        assert_eq!(ItemKind::LineComment.priority(), 100);
    }
}
