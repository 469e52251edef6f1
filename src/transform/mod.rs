//! Derive the Java types for one table.
//!
//! Both transformers share the same builders; they only differ in the
//! [`Policy`] they hand to them.

pub mod entity;
pub mod entity_key;
pub mod fields;
pub mod repository;
pub mod vo;

use crate::context::Collaborators;
use crate::error::GenError;
use crate::java::CompilationUnit;
use crate::meta::{EntityMeta, Partitioning};

/// Knobs that distinguish the simple and the partitioned shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Emit `@IdClass` and the companion key class.
    pub composite_key: bool,
    /// Attach `@SnowflakeGenerator` to `Long` id fields.
    pub generate_identity: bool,
    /// `builderWithDefault()` fills the partition field from the partition context.
    pub vo_populates_partition: bool,
}

/// All units generated for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpaUnit {
    pub entity: CompilationUnit,
    pub entity_key: Option<CompilationUnit>,
    pub repository: CompilationUnit,
    pub vo: CompilationUnit,
}

impl JpaUnit {
    pub fn into_units(self) -> Vec<CompilationUnit> {
        let mut units = vec![self.entity];
        units.extend(self.entity_key);
        units.push(self.repository);
        units.push(self.vo);
        units
    }
}

/// Trait for table-to-Java transformers.
pub trait Transformer {
    fn policy(&self, meta: &EntityMeta) -> Policy;

    fn transform_entity(&self, meta: &EntityMeta) -> Result<CompilationUnit, GenError> {
        entity::build(meta, self.policy(meta))
    }

    fn transform_entity_key(
        &self,
        meta: &EntityMeta,
        collab: Collaborators<'_>,
    ) -> Result<Option<CompilationUnit>, GenError> {
        if !self.policy(meta).composite_key {
            return Ok(None);
        }
        entity_key::build(meta, collab).map(Some)
    }

    fn transform_repository(&self, meta: &EntityMeta) -> Result<CompilationUnit, GenError> {
        repository::build(meta, self.policy(meta))
    }

    fn transform_vo(
        &self,
        meta: &EntityMeta,
        collab: Collaborators<'_>,
    ) -> Result<CompilationUnit, GenError> {
        vo::build(meta, self.policy(meta), collab)
    }

    /// Produce every unit, or nothing when any of them fails.
    fn transform(&self, meta: &EntityMeta, collab: Collaborators<'_>) -> Result<JpaUnit, GenError> {
        meta.require_id()?;
        Ok(JpaUnit {
            entity: self.transform_entity(meta)?,
            entity_key: self.transform_entity_key(meta, collab)?,
            repository: self.transform_repository(meta)?,
            vo: self.transform_vo(meta, collab)?,
        })
    }
}

/// Tables without a partition key in their primary key.
pub struct SimpleTransformer;

impl Transformer for SimpleTransformer {
    fn policy(&self, meta: &EntityMeta) -> Policy {
        Policy {
            composite_key: false,
            generate_identity: true,
            vo_populates_partition: meta.partitioning == Partitioning::Clause,
        }
    }
}

/// Tables whose primary key includes the partition key.
pub struct PartitionTransformer;

impl Transformer for PartitionTransformer {
    fn policy(&self, _meta: &EntityMeta) -> Policy {
        Policy {
            composite_key: true,
            generate_identity: false,
            vo_populates_partition: true,
        }
    }
}

/// Pick the transformer matching the table's partitioning.
pub fn transformer_for(meta: &EntityMeta) -> &'static dyn Transformer {
    match meta.partitioning {
        Partitioning::CompositeKey => &PartitionTransformer,
        Partitioning::None | Partitioning::Clause => &SimpleTransformer,
    }
}

/// Transform `meta` with the matching transformer.
pub fn transform(meta: &EntityMeta, collab: Collaborators<'_>) -> Result<JpaUnit, GenError> {
    let transformer = transformer_for(meta);
    tracing::debug!(
        "Transforming table {} ({:?})",
        meta.table_name,
        meta.partitioning
    );
    transformer.transform(meta, collab)
}
