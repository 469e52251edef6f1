use std::collections::HashSet;

use crate::error::BuildError;

use super::ast::{Identifier, ImportDecl};

/// Collects Java imports for one compilation unit.
///
/// Keeps first-insertion order and ignores repeats of the same
/// fully-qualified name, so the rendered unit never imports anything twice.
#[derive(Debug, Default, Clone)]
pub struct ImportSet {
    order: Vec<Identifier>,
    seen: HashSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import: `import {fqn};`. Adding an existing name is a no-op.
    pub fn add(&mut self, fqn: &str) -> Result<(), BuildError> {
        let fqn = fqn.trim();
        if self.seen.contains(fqn) {
            return Ok(());
        }
        let id = Identifier::qualified("import", fqn)?;
        self.seen.insert(fqn.to_string());
        self.order.push(id);
        Ok(())
    }

    pub fn extend<I, S>(&mut self, fqns: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fqn in fqns {
            self.add(fqn.as_ref())?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn contains(&self, fqn: &str) -> bool {
        self.seen.contains(fqn)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_decls(self) -> Vec<ImportDecl> {
        self.order.into_iter().map(ImportDecl).collect()
    }
}
