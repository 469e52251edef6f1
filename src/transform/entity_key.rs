use crate::context::Collaborators;
use crate::error::GenError;
use crate::java::ast::TypeRef;
use crate::java::builder::{
    marker, ClassBuilder, CompilationUnitBuilder, ConstructorBuilder, FieldBuilder, MethodBuilder,
};
use crate::java::imports::ImportSet;
use crate::java::{CompilationUnit, Modifier};
use crate::meta::EntityMeta;

use super::fields::{plain_field, serial_version_uid};

/// Build the composite key class `<Entity>Key`.
///
/// Holds every identifying key field plus the partition field. The partition
/// value is never passed in; the constructor asks the partition context.
pub fn build(meta: &EntityMeta, collab: Collaborators<'_>) -> Result<CompilationUnit, GenError> {
    let ids = meta.require_id()?;
    let key_name = meta.key_class_name();
    let partition_name = meta
        .partition_field
        .clone()
        .ok_or_else(|| GenError::TableMetadata(format!("{} has no partition column", meta.table_name)))?;
    let partition_type = meta
        .partition_field()
        .map(|f| f.field_type.as_str())
        .unwrap_or("String");
    let lookup = collab.partition.partition_lookup();

    let mut imports = ImportSet::new();
    imports.extend(["lombok.Data", "lombok.NoArgsConstructor", "java.io.Serializable"])?;
    if let Some(import) = &lookup.import {
        imports.add(import)?;
    }

    let mut class = ClassBuilder::new(&[Modifier::Public], &key_name)
        .annotation(marker("Data")?)
        .annotation(marker("NoArgsConstructor")?)
        .implement(TypeRef::new("Serializable")?)
        .field(serial_version_uid()?);

    let mut constructor = ConstructorBuilder::new(&[Modifier::Private], &key_name);
    let mut of = MethodBuilder::new(
        &[Modifier::Public, Modifier::Static],
        "of",
        TypeRef::new(&key_name)?,
    );
    for id in &ids {
        imports.extend(&id.imports)?;
        let ty = TypeRef::new(&id.field_type)?;
        class = class.field(plain_field(id)?);
        constructor = constructor
            .param(&id.field_name, ty.clone())
            .statement(format!("this.{0} = {0}", id.field_name));
        of = of.param(&id.field_name, ty);
    }
    if let Some(partition) = meta.partition_field() {
        imports.extend(&partition.imports)?;
    }
    class = class.field(
        FieldBuilder::new(&[Modifier::Private], &partition_name, TypeRef::new(partition_type)?)
            .build()?,
    );
    constructor = constructor.statement(format!("this.{} = {}", partition_name, lookup.expression));

    let args: Vec<&str> = ids.iter().map(|f| f.field_name.as_str()).collect();
    of = of.statement(format!("return new {}({})", key_name, args.join(", ")));

    let class = class.constructor(constructor.build()?).method(of.build()?).build()?;

    let unit = CompilationUnitBuilder::new()
        .package(&meta.packages.entity_key)?
        .import_set(imports)?
        .doc([format!("@author {}", meta.author)])?
        .class(class)
        .build()?;
    Ok(unit)
}
