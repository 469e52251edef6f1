//! Capabilities injected into the transformers.
//!
//! Generated code needs to call into the host application for the current
//! partition value and for fresh identifiers. The transformers only see these
//! traits, so the exact Java calls are swappable per project.

use crate::config::{Config, IdGeneratorConfig, PartitionContextConfig};

/// A Java expression plus the import it needs, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaCall {
    pub expression: String,
    pub import: Option<String>,
}

impl JavaCall {
    pub fn new(expression: impl Into<String>, import: Option<&str>) -> Self {
        Self {
            expression: expression.into(),
            import: import.map(str::to_string),
        }
    }
}

pub trait PartitionContext: Send + Sync {
    /// Expression that evaluates to the caller's partition value.
    fn partition_lookup(&self) -> JavaCall;
}

pub trait IdGenerator: Send + Sync {
    /// Expression producing a new `Long` id.
    fn next_id(&self) -> JavaCall;
    /// Expression producing a new `String` id.
    fn next_id_as_string(&self) -> JavaCall;
}

impl PartitionContext for PartitionContextConfig {
    fn partition_lookup(&self) -> JavaCall {
        JavaCall::new(&self.expression, self.import.as_deref())
    }
}

impl IdGenerator for IdGeneratorConfig {
    fn next_id(&self) -> JavaCall {
        JavaCall::new(&self.next_id, self.import.as_deref())
    }

    fn next_id_as_string(&self) -> JavaCall {
        JavaCall::new(&self.next_id_as_string, self.import.as_deref())
    }
}

#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub partition: &'a dyn PartitionContext,
    pub ids: &'a dyn IdGenerator,
}

impl<'a> Collaborators<'a> {
    /// The calls configured in `config`.
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            partition: &config.partition_context,
            ids: &config.id_generator,
        }
    }
}
