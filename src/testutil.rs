use crate::schema::{ColumnMeta, TableMeta};

/// Create a ColumnMeta with sensible defaults for testing.
/// Returns a non-nullable integer column that is not part of any key.
pub fn test_column(name: &str) -> ColumnMeta {
    ColumnMeta {
        name: name.to_string(),
        sql_type: "integer".to_string(),
        length: None,
        precision: None,
        scale: None,
        nullable: false,
        is_primary_key: false,
        is_partition_key: false,
        json: false,
    }
}

/// Create a table whose key columns come first (bigint ids, a varchar(20)
/// `dealer_partition_`), followed by a nullable varchar(40) `name_` column.
pub fn test_table(name: &str, primary_keys: &[&str], partition_clause: bool) -> TableMeta {
    let mut columns: Vec<ColumnMeta> = primary_keys
        .iter()
        .map(|pk| {
            let partition = *pk == "dealer_partition_";
            ColumnMeta {
                sql_type: if partition { "varchar" } else { "bigint" }.to_string(),
                length: partition.then_some(20),
                is_primary_key: true,
                is_partition_key: partition,
                ..test_column(pk)
            }
        })
        .collect();
    columns.push(ColumnMeta {
        sql_type: "varchar".to_string(),
        length: Some(40),
        nullable: true,
        ..test_column("name_")
    });
    TableMeta {
        name: name.to_string(),
        primary_keys: primary_keys.iter().map(|s| s.to_string()).collect(),
        columns,
        partition_clause,
    }
}
