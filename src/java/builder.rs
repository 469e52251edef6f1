//! Builders that assemble well-formed Java trees.
//!
//! Builders collect raw parts and validate them in `build()`. Operations that
//! can only be misused by repetition (`super_class`, `package`, `doc`) fail
//! immediately instead.

use crate::error::BuildError;

use super::ast::{
    Annotation, Attribute, AttributeValue, Block, BlockComment, ClassDecl, CompilationUnit,
    ConstructorDecl, DocComment, Expression, FieldDecl, Identifier, InterfaceDecl, Item,
    LineComment, Member, MethodDecl, Modifier, PackageDecl, Parameter, Statement, TypeDecl,
    TypeRef,
};
use super::imports::ImportSet;

fn modifiers(node: &'static str, mods: &[Modifier]) -> Result<Vec<Modifier>, BuildError> {
    if mods.is_empty() {
        return Err(BuildError::EmptyModifiers { node });
    }
    let mut mods = mods.to_vec();
    mods.sort();
    mods.dedup();
    Ok(mods)
}

fn statements(node: &'static str, raw: Vec<String>) -> Result<Block, BuildError> {
    raw.into_iter()
        .map(|s| {
            let s = s.trim().trim_end_matches(';').trim_end().to_string();
            if s.is_empty() {
                Err(BuildError::EmptyStatement { node })
            } else {
                Ok(Statement::Expr(Expression(s)))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Block)
}

fn parameters(raw: Vec<(String, TypeRef)>) -> Result<Vec<Parameter>, BuildError> {
    raw.into_iter()
        .map(|(name, ty)| {
            Ok(Parameter {
                name: Identifier::simple("parameter", &name)?,
                ty,
            })
        })
        .collect()
}

/// Builds an annotation. `attr_opt` with `None` drops the attribute.
#[derive(Debug, Clone)]
pub struct AnnotationBuilder {
    name: String,
    attributes: Vec<(String, AttributeValue)>,
}

impl AnnotationBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((key.to_string(), value.into()));
        self
    }

    pub fn attr_opt<V: Into<AttributeValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    pub fn build(self) -> Result<Annotation, BuildError> {
        let name = Identifier::qualified("annotation", &self.name)?;
        let attributes = self
            .attributes
            .into_iter()
            .map(|(key, value)| {
                Ok(Attribute {
                    key: Identifier::simple("annotation attribute", &key)?,
                    value,
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        Ok(Annotation { name, attributes })
    }
}

/// A marker annotation such as `@Entity`.
pub fn marker(name: &str) -> Result<Annotation, BuildError> {
    AnnotationBuilder::new(name).build()
}

#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<Annotation>,
    ty: TypeRef,
    initializer: Option<String>,
}

impl FieldBuilder {
    pub fn new(modifiers: &[Modifier], name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            modifiers: modifiers.to_vec(),
            annotations: Vec::new(),
            ty,
            initializer: None,
        }
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    pub fn initializer(mut self, expr: impl Into<String>) -> Self {
        self.initializer = Some(expr.into());
        self
    }

    pub fn initializer_opt(mut self, expr: Option<impl Into<String>>) -> Self {
        self.initializer = expr.map(Into::into);
        self
    }

    pub fn build(self) -> Result<FieldDecl, BuildError> {
        let initializer = match self.initializer {
            Some(expr) if expr.trim().is_empty() => {
                return Err(BuildError::EmptyStatement { node: "field initializer" })
            }
            Some(expr) => Some(Expression(expr.trim().to_string())),
            None => None,
        };
        Ok(FieldDecl {
            name: Identifier::simple("field", &self.name)?,
            modifiers: modifiers("field", &self.modifiers)?,
            annotations: self.annotations,
            ty: self.ty,
            initializer,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<Annotation>,
    params: Vec<(String, TypeRef)>,
    return_type: TypeRef,
    statements: Vec<String>,
    has_body: bool,
}

impl MethodBuilder {
    pub fn new(modifiers: &[Modifier], name: &str, return_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            modifiers: modifiers.to_vec(),
            annotations: Vec::new(),
            params: Vec::new(),
            return_type,
            statements: Vec::new(),
            has_body: true,
        }
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn param(mut self, name: &str, ty: TypeRef) -> Self {
        self.params.push((name.to_string(), ty));
        self
    }

    pub fn statement(mut self, text: impl Into<String>) -> Self {
        self.statements.push(text.into());
        self
    }

    /// Render as a `;`-terminated signature.
    #[allow(dead_code)]
    pub fn without_body(mut self) -> Self {
        self.has_body = false;
        self
    }

    pub fn build(self) -> Result<MethodDecl, BuildError> {
        let body = if self.has_body {
            Some(statements("method", self.statements)?)
        } else {
            None
        };
        Ok(MethodDecl {
            name: Identifier::simple("method", &self.name)?,
            modifiers: modifiers("method", &self.modifiers)?,
            annotations: self.annotations,
            params: parameters(self.params)?,
            return_type: self.return_type,
            body,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorBuilder {
    name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<Annotation>,
    params: Vec<(String, TypeRef)>,
    statements: Vec<String>,
}

impl ConstructorBuilder {
    pub fn new(modifiers: &[Modifier], name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: modifiers.to_vec(),
            annotations: Vec::new(),
            params: Vec::new(),
            statements: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, ty: TypeRef) -> Self {
        self.params.push((name.to_string(), ty));
        self
    }

    pub fn statement(mut self, text: impl Into<String>) -> Self {
        self.statements.push(text.into());
        self
    }

    pub fn build(self) -> Result<ConstructorDecl, BuildError> {
        Ok(ConstructorDecl {
            name: Identifier::simple("constructor", &self.name)?,
            modifiers: modifiers("constructor", &self.modifiers)?,
            annotations: self.annotations,
            params: parameters(self.params)?,
            body: statements("constructor", self.statements)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<Annotation>,
    super_class: Option<TypeRef>,
    implements: Vec<TypeRef>,
    fields: Vec<FieldDecl>,
    constructors: Vec<ConstructorDecl>,
    methods: Vec<MethodDecl>,
}

impl ClassBuilder {
    pub fn new(modifiers: &[Modifier], name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: modifiers.to_vec(),
            annotations: Vec::new(),
            super_class: None,
            implements: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn super_class(mut self, ty: TypeRef) -> Result<Self, BuildError> {
        if self.super_class.is_some() {
            return Err(BuildError::DuplicateSuperclass { class: self.name });
        }
        self.super_class = Some(ty);
        Ok(self)
    }

    pub fn implement(mut self, ty: TypeRef) -> Self {
        self.implements.push(ty);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDecl>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDecl) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Members come out as fields, then constructors, then methods.
    pub fn build(self) -> Result<ClassDecl, BuildError> {
        let members = self
            .fields
            .into_iter()
            .map(Member::Field)
            .chain(self.constructors.into_iter().map(Member::Constructor))
            .chain(self.methods.into_iter().map(Member::Method))
            .collect();
        Ok(ClassDecl {
            name: Identifier::simple("class", &self.name)?,
            modifiers: modifiers("class", &self.modifiers)?,
            annotations: self.annotations,
            super_class: self.super_class,
            implements: self.implements,
            members,
        })
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<Annotation>,
    extends: Vec<TypeRef>,
    methods: Vec<MethodDecl>,
}

impl InterfaceBuilder {
    pub fn new(modifiers: &[Modifier], name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: modifiers.to_vec(),
            annotations: Vec::new(),
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn extend(mut self, ty: TypeRef) -> Self {
        self.extends.push(ty);
        self
    }

    #[allow(dead_code)]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Result<InterfaceDecl, BuildError> {
        Ok(InterfaceDecl {
            name: Identifier::simple("interface", &self.name)?,
            modifiers: modifiers("interface", &self.modifiers)?,
            annotations: self.annotations,
            extends: self.extends,
            members: self.methods.into_iter().map(Member::Method).collect(),
        })
    }
}

#[derive(Debug, Default)]
pub struct CompilationUnitBuilder {
    package: Option<PackageDecl>,
    imports: ImportSet,
    doc: Option<DocComment>,
    comments: Vec<Item>,
    class: Option<ClassDecl>,
    interface: Option<InterfaceDecl>,
}

impl CompilationUnitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, name: &str) -> Result<Self, BuildError> {
        if self.package.is_some() {
            return Err(BuildError::DuplicatePackage);
        }
        self.package = Some(PackageDecl(Identifier::qualified("package", name)?));
        Ok(self)
    }

    pub fn import(mut self, fqn: &str) -> Result<Self, BuildError> {
        self.imports.add(fqn)?;
        Ok(self)
    }

    pub fn imports<I, S>(mut self, fqns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fqn in fqns {
            self = self.import(fqn.as_ref())?;
        }
        Ok(self)
    }

    pub fn import_set(self, imports: ImportSet) -> Result<Self, BuildError> {
        let decls = imports.into_decls();
        self.imports(decls.iter().map(|decl| decl.0.as_str()))
    }

    pub fn doc<I, S>(mut self, lines: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.doc.is_some() {
            return Err(BuildError::DuplicateDocComment);
        }
        self.doc = Some(DocComment(lines.into_iter().map(Into::into).collect()));
        Ok(self)
    }

    #[allow(dead_code)]
    pub fn line_comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(Item::LineComment(LineComment(text.into())));
        self
    }

    #[allow(dead_code)]
    pub fn block_comment<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.comments.push(Item::BlockComment(BlockComment(lines)));
        self
    }

    /// Set the class declaration, replacing any previous one.
    pub fn class(mut self, class: ClassDecl) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the interface declaration, replacing any previous one.
    pub fn interface(mut self, interface: InterfaceDecl) -> Self {
        self.interface = Some(interface);
        self
    }

    pub fn build(self) -> Result<CompilationUnit, BuildError> {
        let package = self.package.ok_or(BuildError::MissingPackage)?;
        let type_decl = match (self.class, self.interface) {
            (Some(class), None) => TypeDecl::Class(class),
            (None, Some(interface)) => TypeDecl::Interface(interface),
            (None, None) => return Err(BuildError::MissingTypeDeclaration),
            (Some(class), Some(interface)) => {
                return Err(BuildError::ConflictingTypeDeclaration {
                    class: class.name.to_string(),
                    interface: interface.name.to_string(),
                })
            }
        };

        let mut items = vec![Item::Package(package)];
        items.extend(self.imports.into_decls().into_iter().map(Item::Import));
        if let Some(doc) = self.doc {
            items.push(Item::Doc(doc));
        }
        items.push(Item::Type(type_decl));
        items.extend(self.comments);
        Ok(CompilationUnit { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::ast::ItemKind;

    fn ty(name: &str) -> TypeRef {
        TypeRef::new(name).unwrap()
    }

    fn empty_class(name: &str) -> ClassDecl {
        ClassBuilder::new(&[Modifier::Public], name).build().unwrap()
    }

    #[test]
    fn test_duplicate_super_class() {
        let err = ClassBuilder::new(&[Modifier::Public], "Users")
            .super_class(ty("BaseEntity"))
            .unwrap()
            .super_class(ty("Other"))
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateSuperclass {
                class: "Users".to_string()
            }
        );
    }

    #[test]
    fn test_missing_package() {
        let err = CompilationUnitBuilder::new()
            .class(empty_class("Users"))
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingPackage);
    }

    #[test]
    fn test_missing_type_declaration() {
        let err = CompilationUnitBuilder::new()
            .package("com.example")
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingTypeDeclaration);
    }

    #[test]
    fn test_conflicting_type_declaration() {
        let interface = InterfaceBuilder::new(&[Modifier::Public], "UsersRepository")
            .build()
            .unwrap();
        let err = CompilationUnitBuilder::new()
            .package("com.example")
            .unwrap()
            .class(empty_class("Users"))
            .interface(interface)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::ConflictingTypeDeclaration { .. }));
    }

    #[test]
    fn test_package_and_doc_only_once() {
        let builder = CompilationUnitBuilder::new().package("com.example").unwrap();
        assert_eq!(
            builder.package("com.other").unwrap_err(),
            BuildError::DuplicatePackage
        );
        let builder = CompilationUnitBuilder::new().doc(["a"]).unwrap();
        assert_eq!(
            builder.doc(["b"]).unwrap_err(),
            BuildError::DuplicateDocComment
        );
    }

    #[test]
    fn test_unit_item_layout() {
        let unit = CompilationUnitBuilder::new()
            .package("com.example")
            .unwrap()
            .imports(["lombok.Data", "lombok.Data", "lombok.Builder"])
            .unwrap()
            .doc(["@author me"])
            .unwrap()
            .class(empty_class("Users"))
            .build()
            .unwrap();
        let kinds: Vec<ItemKind> = unit.items().iter().map(Item::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Package,
                ItemKind::Import,
                ItemKind::Import,
                ItemKind::Doc,
                ItemKind::Type
            ]
        );
        assert_eq!(unit.package(), "com.example");
        assert_eq!(unit.type_name(), "Users");
    }

    #[test]
    fn test_attr_opt_drops_only_none() {
        let ann = AnnotationBuilder::new("Column")
            .attr("name", "id_")
            .attr_opt("length", None::<u64>)
            .attr_opt("scale", Some(0u64))
            .attr("nullable", false)
            .attr_opt("columnDefinition", Some(""))
            .build()
            .unwrap();
        let keys: Vec<&str> = ann.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "scale", "nullable", "columnDefinition"]);
    }

    #[test]
    fn test_empty_modifiers_rejected() {
        let err = FieldBuilder::new(&[], "age", ty("Integer")).build().unwrap_err();
        assert_eq!(err, BuildError::EmptyModifiers { node: "field" });
    }

    #[test]
    fn test_modifiers_deduplicated_and_sorted() {
        let field = FieldBuilder::new(
            &[Modifier::Final, Modifier::Static, Modifier::Private, Modifier::Static],
            "serialVersionUID",
            ty("long"),
        )
        .initializer("1L")
        .build()
        .unwrap();
        assert_eq!(
            field.modifiers,
            vec![Modifier::Private, Modifier::Static, Modifier::Final]
        );
    }

    #[test]
    fn test_empty_statement_rejected() {
        let err = MethodBuilder::new(&[Modifier::Public], "getId", ty("Long"))
            .statement("  ;")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyStatement { node: "method" });
    }

    #[test]
    fn test_invalid_field_name_rejected() {
        let err = FieldBuilder::new(&[Modifier::Private], "user id", ty("String"))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidIdentifier { node: "field", .. }));
    }

    #[test]
    fn test_members_ordered_by_kind() {
        let class = ClassBuilder::new(&[Modifier::Public], "UsersKey")
            .method(
                MethodBuilder::new(&[Modifier::Public, Modifier::Static], "of", ty("UsersKey"))
                    .statement("return new UsersKey()")
                    .build()
                    .unwrap(),
            )
            .constructor(
                ConstructorBuilder::new(&[Modifier::Private], "UsersKey")
                    .build()
                    .unwrap(),
            )
            .field(
                FieldBuilder::new(&[Modifier::Private], "id", ty("Long"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let names: Vec<&str> = class
            .members
            .iter()
            .map(|member| match member {
                Member::Field(f) => f.name.as_str(),
                Member::Constructor(c) => c.name.as_str(),
                Member::Method(m) => m.name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["id", "UsersKey", "of"]);
    }
}
