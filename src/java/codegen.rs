//! Serializes Java trees into source lines.
//!
//! Output is structural only: one construct per line, no indentation and no
//! blank lines. Layout is left to the formatter.

use super::ast::{
    Annotation, AttributeValue, Block, BlockComment, ClassDecl, CompilationUnit,
    ConstructorDecl, DocComment, FieldDecl, ImportDecl, InterfaceDecl, Item, LineComment,
    Member, MethodDecl, Modifier, PackageDecl, Parameter, Statement, TypeDecl, TypeRef,
};

/// Render a node to source lines.
pub trait Render {
    fn render(&self) -> Vec<String>;
}

/// Render a whole unit into a newline-terminated string.
pub fn render_unit(unit: &CompilationUnit) -> String {
    let mut out = unit.render().join("\n");
    out.push('\n');
    out
}

fn modifier_prefix(modifiers: &[Modifier]) -> String {
    let mut sorted = modifiers.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
        .iter()
        .map(|m| format!("{} ", m.as_str()))
        .collect()
}

fn annotation_lines(annotations: &[Annotation]) -> Vec<String> {
    annotations.iter().map(render_annotation).collect()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_type(ty: &TypeRef) -> String {
    let mut out = ty.name.to_string();
    if !ty.generics.is_empty() {
        let args: Vec<String> = ty.generics.iter().map(render_type).collect();
        out.push('<');
        out.push_str(&args.join(", "));
        out.push('>');
    }
    for _ in 0..ty.array_dims {
        out.push_str("[]");
    }
    out
}

fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => format!("\"{}\"", escape(s)),
        AttributeValue::Literal(lit) => lit.clone(),
        AttributeValue::Class(ty) => format!("{}.class", render_type(ty)),
        AttributeValue::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

pub fn render_annotation(annotation: &Annotation) -> String {
    match annotation.attributes.as_slice() {
        [] => format!("@{}", annotation.name),
        [only] if only.key.as_str() == "value" => {
            format!("@{}({})", annotation.name, render_value(&only.value))
        }
        attrs => {
            let attrs: Vec<String> = attrs
                .iter()
                .map(|a| format!("{} = {}", a.key, render_value(&a.value)))
                .collect();
            format!("@{}({})", annotation.name, attrs.join(", "))
        }
    }
}

fn render_params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", render_type(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_types(types: &[TypeRef]) -> String {
    types.iter().map(render_type).collect::<Vec<_>>().join(", ")
}

impl Render for Block {
    fn render(&self) -> Vec<String> {
        let mut lines = vec!["{".to_string()];
        for stmt in &self.0 {
            lines.extend(stmt.render());
        }
        lines.push("}".to_string());
        lines
    }
}

impl Render for Statement {
    fn render(&self) -> Vec<String> {
        match self {
            Statement::Expr(expr) => vec![format!("{};", expr.0)],
            Statement::Block(block) => block.render(),
        }
    }
}

/// Attach a body to a declaration header: `header {` ... `}`.
fn with_body(header: String, body: &Block) -> Vec<String> {
    let mut body = body.render();
    body[0] = format!("{header} {{");
    body
}

impl Render for FieldDecl {
    fn render(&self) -> Vec<String> {
        let mut lines = annotation_lines(&self.annotations);
        let mut decl = format!(
            "{}{} {}",
            modifier_prefix(&self.modifiers),
            render_type(&self.ty),
            self.name
        );
        if let Some(init) = &self.initializer {
            decl.push_str(" = ");
            decl.push_str(&init.0);
        }
        decl.push(';');
        lines.push(decl);
        lines
    }
}

impl Render for ConstructorDecl {
    fn render(&self) -> Vec<String> {
        let mut lines = annotation_lines(&self.annotations);
        let header = format!(
            "{}{}({})",
            modifier_prefix(&self.modifiers),
            self.name,
            render_params(&self.params)
        );
        lines.extend(with_body(header, &self.body));
        lines
    }
}

impl Render for MethodDecl {
    fn render(&self) -> Vec<String> {
        let mut lines = annotation_lines(&self.annotations);
        let header = format!(
            "{}{} {}({})",
            modifier_prefix(&self.modifiers),
            render_type(&self.return_type),
            self.name,
            render_params(&self.params)
        );
        match &self.body {
            Some(body) => lines.extend(with_body(header, body)),
            None => lines.push(format!("{header};")),
        }
        lines
    }
}

impl Render for Member {
    fn render(&self) -> Vec<String> {
        match self {
            Member::Field(f) => f.render(),
            Member::Constructor(c) => c.render(),
            Member::Method(m) => m.render(),
        }
    }
}

fn type_body(header: String, members: &[Member]) -> Vec<String> {
    let mut lines = vec![format!("{header} {{")];
    for member in members {
        lines.extend(member.render());
    }
    lines.push("}".to_string());
    lines
}

impl Render for ClassDecl {
    fn render(&self) -> Vec<String> {
        let mut header = format!("{}class {}", modifier_prefix(&self.modifiers), self.name);
        if let Some(sup) = &self.super_class {
            header.push_str(" extends ");
            header.push_str(&render_type(sup));
        }
        if !self.implements.is_empty() {
            header.push_str(" implements ");
            header.push_str(&render_types(&self.implements));
        }
        let mut lines = annotation_lines(&self.annotations);
        lines.extend(type_body(header, &self.members));
        lines
    }
}

impl Render for InterfaceDecl {
    fn render(&self) -> Vec<String> {
        let mut header = format!("{}interface {}", modifier_prefix(&self.modifiers), self.name);
        if !self.extends.is_empty() {
            header.push_str(" extends ");
            header.push_str(&render_types(&self.extends));
        }
        let mut lines = annotation_lines(&self.annotations);
        lines.extend(type_body(header, &self.members));
        lines
    }
}

impl Render for TypeDecl {
    fn render(&self) -> Vec<String> {
        match self {
            TypeDecl::Class(c) => c.render(),
            TypeDecl::Interface(i) => i.render(),
        }
    }
}

impl Render for PackageDecl {
    fn render(&self) -> Vec<String> {
        vec![format!("package {};", self.0)]
    }
}

impl Render for ImportDecl {
    fn render(&self) -> Vec<String> {
        vec![format!("import {};", self.0)]
    }
}

impl Render for DocComment {
    fn render(&self) -> Vec<String> {
        let mut lines = vec!["/**".to_string()];
        lines.extend(self.0.iter().map(|l| format!(" * {l}").trim_end().to_string()));
        lines.push(" */".to_string());
        lines
    }
}

impl Render for LineComment {
    fn render(&self) -> Vec<String> {
        vec![format!("// {}", self.0)]
    }
}

impl Render for BlockComment {
    fn render(&self) -> Vec<String> {
        let mut lines = vec!["/*".to_string()];
        lines.extend(self.0.iter().map(|l| format!(" {l}")));
        lines.push(" */".to_string());
        lines
    }
}

impl Render for Item {
    fn render(&self) -> Vec<String> {
        match self {
            Item::Package(p) => p.render(),
            Item::Import(i) => i.render(),
            Item::Doc(d) => d.render(),
            Item::LineComment(c) => c.render(),
            Item::BlockComment(c) => c.render(),
            Item::Type(t) => t.render(),
        }
    }
}

impl Render for CompilationUnit {
    fn render(&self) -> Vec<String> {
        let mut items: Vec<&Item> = self.items().iter().collect();
        items.sort_by_key(|item| item.kind().priority());
        items.into_iter().flat_map(Render::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::java::builder::{
        marker, AnnotationBuilder, ClassBuilder, CompilationUnitBuilder, FieldBuilder,
        InterfaceBuilder, MethodBuilder,
    };

    fn ty(name: &str) -> TypeRef {
        TypeRef::new(name).unwrap()
    }

    #[test]
    fn test_modifiers_render_in_canonical_order() {
        let orders = [
            vec![Modifier::Final, Modifier::Static, Modifier::Public],
            vec![Modifier::Static, Modifier::Public, Modifier::Final],
            vec![Modifier::Public, Modifier::Final, Modifier::Static],
        ];
        for mods in orders {
            let field = FieldBuilder::new(&mods, "MAX", ty("int"))
                .initializer("1")
                .build()
                .unwrap();
            assert_eq!(field.render(), vec!["public static final int MAX = 1;"]);
        }
    }

    #[test]
    fn test_annotation_forms() {
        assert_eq!(render_annotation(&marker("Entity").unwrap()), "@Entity");
        let column = AnnotationBuilder::new("Column")
            .attr("name", "age")
            .attr("precision", 16u64)
            .attr("nullable", true)
            .build()
            .unwrap();
        assert_eq!(
            render_annotation(&column),
            r#"@Column(name = "age", precision = 16, nullable = true)"#
        );
        let json = AnnotationBuilder::new("Type")
            .attr("value", ty("StringJsonUserType"))
            .build()
            .unwrap();
        assert_eq!(render_annotation(&json), "@Type(StringJsonUserType.class)");
        let array = AnnotationBuilder::new("SuppressWarnings")
            .attr(
                "value",
                AttributeValue::Array(vec!["unchecked".into(), "rawtypes".into()]),
            )
            .build()
            .unwrap();
        assert_eq!(
            render_annotation(&array),
            r#"@SuppressWarnings({"unchecked", "rawtypes"})"#
        );
    }

    #[test]
    fn test_string_values_escaped() {
        let ann = AnnotationBuilder::new("Comment")
            .attr("text", "say \"hi\"")
            .build()
            .unwrap();
        assert_eq!(render_annotation(&ann), r#"@Comment(text = "say \"hi\"")"#);
    }

    #[test]
    fn test_method_with_and_without_body() {
        let with_body = MethodBuilder::new(&[Modifier::Public], "getId", ty("Long"))
            .annotation(marker("Override").unwrap())
            .statement("return this.id")
            .build()
            .unwrap();
        assert_eq!(
            with_body.render(),
            vec!["@Override", "public Long getId() {", "return this.id;", "}"]
        );
        let signature = MethodBuilder::new(&[Modifier::Public], "findAll", ty("int"))
            .param("limit", ty("int"))
            .without_body()
            .build()
            .unwrap();
        assert_eq!(signature.render(), vec!["public int findAll(int limit);"]);
    }

    #[test]
    fn test_render_unit() {
        let class = ClassBuilder::new(&[Modifier::Public], "Users")
            .annotation(marker("Entity").unwrap())
            .super_class(ty("BaseEntity"))
            .unwrap()
            .implement(TypeRef::generic("Persistable", vec![ty("String")]).unwrap())
            .field(
                FieldBuilder::new(&[Modifier::Private], "age", ty("Integer"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let unit = CompilationUnitBuilder::new()
            .package("com.example.entity")
            .unwrap()
            .line_comment("generated")
            .block_comment(["do not edit"])
            .class(class)
            .doc(["@author Entity Generator G3"])
            .unwrap()
            .import("jakarta.persistence.Entity")
            .unwrap()
            .build()
            .unwrap();
        let expected = indoc! {"
            package com.example.entity;
            import jakarta.persistence.Entity;
            /**
             * @author Entity Generator G3
             */
            @Entity
            public class Users extends BaseEntity implements Persistable<String> {
            private Integer age;
            }
            // generated
            /*
             do not edit
             */
        "};
        assert_eq!(render_unit(&unit), expected);
    }

    #[test]
    fn test_render_interface() {
        let repo = InterfaceBuilder::new(&[Modifier::Public], "UsersRepository")
            .annotation(marker("Repository").unwrap())
            .extend(
                TypeRef::generic("ExtensionRepository", vec![ty("Users"), ty("String")])
                    .unwrap(),
            )
            .build()
            .unwrap();
        insta::assert_snapshot!(repo.render().join("\n"), @r"
        @Repository
        public interface UsersRepository extends ExtensionRepository<Users, String> {
        }
        ");
    }

    #[test]
    fn test_render_is_deterministic() {
        let build = || {
            let class = ClassBuilder::new(&[Modifier::Public], "A").build().unwrap();
            CompilationUnitBuilder::new()
                .package("p")
                .unwrap()
                .class(class)
                .build()
                .unwrap()
        };
        assert_eq!(render_unit(&build()), render_unit(&build()));
    }
}
