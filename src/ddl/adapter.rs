use sqlparser::ast::{ColumnDef, ColumnOption, CreateTable, DataType, Statement, TableConstraint};

use crate::config::Config;
use crate::error::GenError;
use crate::schema::{ColumnMeta, TableMeta};
use crate::typemap::SqlType;

/// Extract table metadata from a parsed `CREATE TABLE` statement.
///
/// Array columns and columns listed in `omit_columns` are skipped, and key
/// columns that were skipped are dropped from the primary key.
pub fn extract_table(
    statement: &Statement,
    partition_clause: bool,
    config: &Config,
) -> Result<TableMeta, GenError> {
    let Statement::CreateTable(CreateTable {
        name,
        columns,
        constraints,
        ..
    }) = statement
    else {
        return Err(GenError::TableMetadata(
            "statement is not a CREATE TABLE".to_string(),
        ));
    };

    let table_name = name
        .0
        .last()
        .map(|ident| ident.value.clone())
        .ok_or_else(|| GenError::TableMetadata("table has no name".to_string()))?;

    let mut declared_keys: Vec<String> = Vec::new();
    for constraint in constraints {
        if let TableConstraint::PrimaryKey { columns, .. } = constraint {
            for col in columns {
                push_unique(&mut declared_keys, &col.value);
            }
        }
    }
    for col in columns {
        if has_inline_primary_key(col) {
            push_unique(&mut declared_keys, &col.name.value);
        }
    }

    let retained: Vec<&ColumnDef> = columns
        .iter()
        .filter(|col| {
            if matches!(col.data_type, DataType::Array(_)) {
                tracing::debug!("Skipping array column {}.{}", table_name, col.name.value);
                return false;
            }
            !config.is_omitted(&col.name.value)
        })
        .collect();

    let primary_keys: Vec<String> = declared_keys
        .into_iter()
        .filter(|pk| retained.iter().any(|col| col.name.value == *pk))
        .collect();
    let partition_in_key = primary_keys.iter().any(|pk| *pk == config.partition_key);

    let columns = retained
        .into_iter()
        .map(|col| {
            let name = col.name.value.clone();
            let is_primary_key = primary_keys.contains(&name);
            let is_partition_key = partition_in_key && name == config.partition_key;
            column_meta(col, name, is_primary_key, is_partition_key)
        })
        .collect();

    Ok(TableMeta {
        name: table_name,
        primary_keys,
        columns,
        partition_clause,
    })
}

fn column_meta(
    col: &ColumnDef,
    name: String,
    is_primary_key: bool,
    is_partition_key: bool,
) -> ColumnMeta {
    let sql_type = SqlType::parse(&col.data_type.to_string());
    let nullable = col
        .options
        .iter()
        .any(|opt| matches!(opt.option, ColumnOption::Null));
    ColumnMeta {
        name,
        length: sql_type.length(),
        precision: sql_type.precision(),
        scale: sql_type.scale(),
        nullable,
        is_primary_key,
        is_partition_key,
        json: sql_type.is_json(),
        sql_type: sql_type.name,
    }
}

fn has_inline_primary_key(col: &ColumnDef) -> bool {
    col.options
        .iter()
        .any(|opt| matches!(opt.option, ColumnOption::Unique { is_primary: true, .. }))
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
