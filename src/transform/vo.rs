use crate::context::{Collaborators, JavaCall};
use crate::error::GenError;
use crate::java::ast::{MethodDecl, TypeRef};
use crate::java::builder::{marker, AnnotationBuilder, ClassBuilder, CompilationUnitBuilder, MethodBuilder};
use crate::java::imports::ImportSet;
use crate::java::{CompilationUnit, Modifier};
use crate::meta::EntityMeta;

use super::fields::{serial_version_uid, vo_field};
use super::Policy;

const VO_IMPORTS: &[&str] = &[
    "lombok.AllArgsConstructor",
    "lombok.Builder",
    "lombok.Data",
    "lombok.EqualsAndHashCode",
    "lombok.NoArgsConstructor",
];

/// Build the value object `<Entity>VO`.
///
/// `builderWithId()` and `builderWithDefault()` are only generated when the
/// key is a `Long` or a `String`, the two types the id generator can produce.
pub fn build(
    meta: &EntityMeta,
    policy: Policy,
    collab: Collaborators<'_>,
) -> Result<CompilationUnit, GenError> {
    let ids = meta.require_id()?;
    let vo_name = meta.vo_name();

    let mut imports = ImportSet::new();
    imports.add(&meta.vo_super.import())?;
    imports.extend(VO_IMPORTS)?;
    let fields = meta
        .fields
        .iter()
        .map(|field| vo_field(field, &mut imports))
        .collect::<Result<Vec<_>, _>>()?;

    let mut class = ClassBuilder::new(&[Modifier::Public], &vo_name)
        .annotation(marker("Data")?)
        .annotation(marker("Builder")?)
        .annotation(marker("AllArgsConstructor")?)
        .annotation(marker("NoArgsConstructor")?)
        .annotation(
            AnnotationBuilder::new("EqualsAndHashCode")
                .attr("callSuper", true)
                .build()?,
        )
        .super_class(TypeRef::new(&meta.vo_super.name)?)?
        .field(serial_version_uid()?)
        .fields(fields);

    let id_calls: Vec<(&str, JavaCall)> = ids
        .iter()
        .filter_map(|f| {
            let call = match f.field_type.as_str() {
                "Long" => collab.ids.next_id(),
                "String" => collab.ids.next_id_as_string(),
                _ => return None,
            };
            Some((f.field_name.as_str(), call))
        })
        .collect();
    let first_id_generated = id_calls
        .first()
        .is_some_and(|(name, _)| *name == ids[0].field_name);

    if first_id_generated {
        for (_, call) in &id_calls {
            if let Some(import) = &call.import {
                imports.add(import)?;
            }
        }
        let mut with_default: Vec<(String, String)> = id_calls
            .iter()
            .map(|(name, call)| (name.to_string(), call.expression.clone()))
            .collect();
        let with_id = with_default.clone();

        for field in meta.fields.iter().filter(|f| !f.column.is_primary_key) {
            if let Some(value) = &field.default_value {
                with_default.push((field.field_name.clone(), value.clone()));
            }
        }
        if policy.vo_populates_partition {
            if let Some(partition) = meta.partition_field() {
                let lookup = collab.partition.partition_lookup();
                if let Some(import) = &lookup.import {
                    imports.add(import)?;
                }
                with_default.push((partition.field_name.clone(), lookup.expression));
            }
        }

        class = class
            .method(builder_method(&vo_name, "builderWithId", &with_id)?)
            .method(builder_method(&vo_name, "builderWithDefault", &with_default)?);
    }

    let unit = CompilationUnitBuilder::new()
        .package(&meta.packages.vo)?
        .import_set(imports)?
        .doc([format!("@author {}", meta.author)])?
        .class(class.build()?)
        .build()?;
    Ok(unit)
}

/// `public static XVOBuilder name() { return XVO.builder().a(..).b(..); }`
fn builder_method(
    vo_name: &str,
    name: &str,
    setters: &[(String, String)],
) -> Result<MethodDecl, GenError> {
    let chain: String = setters
        .iter()
        .map(|(field, value)| format!(".{field}({value})"))
        .collect();
    let method = MethodBuilder::new(
        &[Modifier::Public, Modifier::Static],
        name,
        TypeRef::new(&format!("{vo_name}Builder"))?,
    )
    .statement(format!("return {vo_name}.builder(){chain}"))
    .build()?;
    Ok(method)
}
