//! Field and annotation helpers shared by every generated type.

use crate::error::BuildError;
use crate::java::ast::{Annotation, FieldDecl, TypeRef};
use crate::java::builder::{marker, AnnotationBuilder, FieldBuilder};
use crate::java::imports::ImportSet;
use crate::java::Modifier;
use crate::meta::EntityFieldMeta;

use super::Policy;

pub const SNOWFLAKE_GENERATOR: &str = "com.ymsl.solid.jpa.uuid.annotation.SnowflakeGenerator";
const JSON_TYPE_ANNOTATION: &str = "Type";
const JSON_USER_TYPE: &str = "StringJsonUserType";

/// `private static final long serialVersionUID = 1L;`
pub fn serial_version_uid() -> Result<FieldDecl, BuildError> {
    FieldBuilder::new(
        &[Modifier::Private, Modifier::Static, Modifier::Final],
        "serialVersionUID",
        TypeRef::new("long")?,
    )
    .initializer("1L")
    .build()
}

/// `@Column(name = ..., length?, precision?, scale?, nullable = ...)`
pub fn column_annotation(field: &EntityFieldMeta) -> Result<Annotation, BuildError> {
    let col = &field.column;
    AnnotationBuilder::new("Column")
        .attr("name", col.name.as_str())
        .attr_opt("length", col.length)
        .attr_opt("precision", col.precision)
        .attr_opt("scale", col.scale)
        .attr("nullable", col.nullable)
        .build()
}

/// A private field without annotations, typed from the column mapping.
pub fn plain_field(field: &EntityFieldMeta) -> Result<FieldDecl, BuildError> {
    FieldBuilder::new(
        &[Modifier::Private],
        &field.field_name,
        TypeRef::new(&field.field_type)?,
    )
    .build()
}

/// Initializer for a non-key field, registering the import it needs.
pub fn default_value(
    field: &EntityFieldMeta,
    imports: &mut ImportSet,
) -> Result<Option<String>, BuildError> {
    if field.column.is_primary_key {
        return Ok(None);
    }
    if field.default_value.is_some() {
        if let Some(import) = &field.default_import {
            imports.add(import)?;
        }
    }
    Ok(field.default_value.clone())
}

/// Entity field: identity, JSON handling and column mapping annotations.
pub fn entity_field(
    field: &EntityFieldMeta,
    policy: Policy,
    imports: &mut ImportSet,
) -> Result<FieldDecl, BuildError> {
    imports.extend(&field.imports)?;

    let mut annotations = Vec::new();
    if field.is_id() {
        annotations.push(marker("Id")?);
        if policy.generate_identity && field.field_type == "Long" {
            imports.add(SNOWFLAKE_GENERATOR)?;
            annotations.push(marker("SnowflakeGenerator")?);
        }
    }
    if field.column.json {
        annotations.push(
            AnnotationBuilder::new(JSON_TYPE_ANNOTATION)
                .attr("value", TypeRef::new(JSON_USER_TYPE)?)
                .build()?,
        );
    }
    annotations.push(column_annotation(field)?);

    let initializer = default_value(field, imports)?;
    FieldBuilder::new(
        &[Modifier::Private],
        &field.field_name,
        TypeRef::new(&field.field_type)?,
    )
    .annotations(annotations)
    .initializer_opt(initializer)
    .build()
}

/// VO field: a plain field carrying the configured default.
pub fn vo_field(field: &EntityFieldMeta, imports: &mut ImportSet) -> Result<FieldDecl, BuildError> {
    if !field.column.json {
        imports.extend(&field.imports)?;
    }
    let initializer = default_value(field, imports)?;
    FieldBuilder::new(
        &[Modifier::Private],
        &field.field_name,
        TypeRef::new(&field.field_type)?,
    )
    .initializer_opt(initializer)
    .build()
}
