use crate::error::GenError;
use crate::java::ast::TypeRef;
use crate::java::builder::{
    marker, AnnotationBuilder, ClassBuilder, CompilationUnitBuilder, FieldBuilder, MethodBuilder,
};
use crate::java::imports::ImportSet;
use crate::java::{CompilationUnit, Modifier};
use crate::meta::EntityMeta;

use super::fields::{entity_field, serial_version_uid};
use super::Policy;

const ENTITY_IMPORTS: &[&str] = &[
    "jakarta.persistence.Column",
    "jakarta.persistence.Entity",
    "jakarta.persistence.Id",
    "jakarta.persistence.PostLoad",
    "jakarta.persistence.PostPersist",
    "jakarta.persistence.Table",
    "jakarta.persistence.Transient",
    "lombok.Getter",
    "lombok.Setter",
    "org.springframework.data.domain.Persistable",
];

/// Build the JPA entity class for `meta`.
pub fn build(meta: &EntityMeta, policy: Policy) -> Result<CompilationUnit, GenError> {
    let ids = meta.require_id()?;
    let key_type = meta.key_type()?;

    let mut imports = ImportSet::new();
    imports.add(&meta.entity_super.import())?;
    imports.extend(ENTITY_IMPORTS)?;

    let mut class = ClassBuilder::new(&[Modifier::Public], &meta.class_name)
        .annotation(marker("Entity")?)
        .annotation(marker("Getter")?)
        .annotation(marker("Setter")?);
    if policy.composite_key {
        imports.add("jakarta.persistence.IdClass")?;
        if meta.packages.entity_key != meta.packages.entity {
            imports.add(&format!("{}.{}", meta.packages.entity_key, key_type))?;
        }
        class = class.annotation(
            AnnotationBuilder::new("IdClass")
                .attr("value", TypeRef::new(&key_type)?)
                .build()?,
        );
    }
    class = class
        .annotation(
            AnnotationBuilder::new("Table")
                .attr("name", meta.table_name.as_str())
                .build()?,
        )
        .super_class(TypeRef::new(&meta.entity_super.name)?)?
        .implement(TypeRef::generic("Persistable", vec![TypeRef::new(&key_type)?])?)
        .field(serial_version_uid()?);

    for field in &meta.fields {
        class = class.field(entity_field(field, policy, &mut imports)?);
    }

    let id_expr = if policy.composite_key {
        let args: Vec<&str> = ids.iter().map(|f| f.field_name.as_str()).collect();
        format!("{}.of({})", key_type, args.join(", "))
    } else {
        ids[0].field_name.clone()
    };
    let class = add_lifecycle(class, &key_type, &id_expr)?.build()?;

    let unit = CompilationUnitBuilder::new()
        .package(&meta.packages.entity)?
        .import_set(imports)?
        .doc([format!("@author {}", meta.author)])?
        .class(class)
        .build()?;
    Ok(unit)
}

/// `isNew` flag, `getId()`, `isNew()` and the `markAsNotNew()` hook.
fn add_lifecycle(class: ClassBuilder, key_type: &str, id_expr: &str) -> Result<ClassBuilder, GenError> {
    let is_new = FieldBuilder::new(&[Modifier::Private], "isNew", TypeRef::new("boolean")?)
        .annotation(marker("Transient")?)
        .initializer("true")
        .build()?;
    let get_id = MethodBuilder::new(&[Modifier::Public], "getId", TypeRef::new(key_type)?)
        .annotation(marker("Override")?)
        .statement(format!("return {id_expr}"))
        .build()?;
    let is_new_method = MethodBuilder::new(&[Modifier::Public], "isNew", TypeRef::new("boolean")?)
        .annotation(marker("Override")?)
        .statement("return isNew")
        .build()?;
    let mark = MethodBuilder::new(&[Modifier::Public], "markAsNotNew", TypeRef::new("void")?)
        .annotation(marker("PostPersist")?)
        .annotation(marker("PostLoad")?)
        .statement("this.isNew = false")
        .build()?;
    Ok(class
        .field(is_new)
        .method(get_id)
        .method(is_new_method)
        .method(mark))
}
