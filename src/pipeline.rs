//! Batch driver: every `CREATE TABLE` in a script becomes up to four files.
//!
//! Per-table failures are logged and counted; the batch always runs to the
//! end. A table's files are only written once all of its units rendered and
//! formatted successfully.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::Config;
use crate::context::Collaborators;
use crate::ddl::{adapter, declared_table_name, parse_table, split_statements};
use crate::error::GenError;
use crate::format::Formatter;
use crate::java::render_unit;
use crate::meta::EntityMeta;
use crate::output::{prepare_root, GeneratedFile};
use crate::schema::TableMeta;
use crate::transform;

/// Where and what to generate.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output: PathBuf,
    /// Remove the output root before generating.
    pub clean: bool,
    /// Only generate these tables; empty means all.
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub generated: usize,
    pub failed: usize,
    pub files: Vec<PathBuf>,
}

impl RunOptions {
    /// Whether the table filter lets `table` through.
    pub fn selects(&self, table: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Parse one statement into table metadata.
pub fn read_table(ddl: &str, config: &Config) -> Result<TableMeta, GenError> {
    let parsed = parse_table(ddl)?;
    adapter::extract_table(&parsed.statement, parsed.partition_clause, config)
}

/// Transform, render and format every unit for `table`.
pub async fn generate_table<F: Formatter>(
    table: &TableMeta,
    config: &Config,
    formatter: &Arc<F>,
) -> Result<Vec<GeneratedFile>, GenError> {
    let meta = EntityMeta::from_table(table, config);
    let units = transform::transform(&meta, Collaborators::from_config(config))?.into_units();

    let mut set = JoinSet::new();
    let mut files = Vec::with_capacity(units.len());
    for (index, unit) in units.iter().enumerate() {
        let source = render_unit(unit);
        let formatter = Arc::clone(formatter);
        set.spawn(async move { (index, formatter.format(source).await) });
        files.push(GeneratedFile {
            package: unit.package().to_string(),
            type_name: unit.type_name().to_string(),
            contents: String::new(),
        });
    }
    while let Some(joined) = set.join_next().await {
        let (index, formatted) = joined?;
        files[index].contents = formatted?;
    }
    Ok(files)
}

/// Generate every table in `script` under `options.output`.
///
/// Only a failure to prepare the output root aborts the run.
pub async fn run<F: Formatter>(
    script: &str,
    options: &RunOptions,
    config: &Config,
    formatter: Arc<F>,
) -> Result<Summary, GenError> {
    let statements = split_statements(script);
    if statements.is_empty() {
        tracing::warn!("No CREATE TABLE statement found");
    }
    tracing::debug!("Found {} CREATE TABLE statements", statements.len());
    prepare_root(&options.output, options.clean).await?;

    let mut summary = Summary::default();
    for (index, ddl) in statements.iter().enumerate() {
        let table = match read_table(ddl, config) {
            Ok(table) => table,
            Err(e) => {
                if let Some(name) = declared_table_name(ddl).filter(|n| !options.selects(n)) {
                    tracing::debug!("Skipping table {} ({})", name, e);
                    continue;
                }
                tracing::error!("Statement #{}: {}", index + 1, e);
                summary.failed += 1;
                continue;
            }
        };
        if !options.selects(&table.name) {
            tracing::debug!("Skipping table {}", table.name);
            continue;
        }

        let files = match generate_table(&table, config, &formatter).await {
            Ok(files) => files,
            Err(e) if e.is_defect() => {
                tracing::error!("Table {}: {} (generator defect)", table.name, e);
                summary.failed += 1;
                continue;
            }
            Err(e) => {
                tracing::error!("Table {}: {}", table.name, e);
                summary.failed += 1;
                continue;
            }
        };

        let mut written = true;
        for file in &files {
            match file.write(&options.output).await {
                Ok(path) => {
                    tracing::info!("Generated {}", path.display());
                    summary.files.push(path);
                }
                Err(e) => {
                    tracing::error!("Table {}: failed to write {}: {}", table.name, file.type_name, e);
                    written = false;
                }
            }
        }
        if written {
            summary.generated += 1;
        } else {
            summary.failed += 1;
        }
    }

    tracing::info!(
        "{} tables generated, {} tables failed",
        summary.generated,
        summary.failed
    );
    Ok(summary)
}
