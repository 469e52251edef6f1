/// Metadata for a single table extracted from a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    /// Unqualified table name.
    pub name: String,
    /// Primary-key column names in declaration order. Every entry names a
    /// retained column.
    pub primary_keys: Vec<String>,
    /// Retained columns in declaration order (array and omitted columns dropped).
    pub columns: Vec<ColumnMeta>,
    /// Whether the statement carried a `PARTITION BY` clause.
    pub partition_clause: bool,
}

impl TableMeta {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_keys.iter().any(|pk| pk == name)
    }
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Canonical lower-case SQL type name without arguments (e.g. "varchar", "numeric").
    pub sql_type: String,
    /// Only set for `character varying` / `varchar`.
    pub length: Option<u64>,
    /// Only set for `numeric`.
    pub precision: Option<u64>,
    pub scale: Option<u64>,
    /// True only when the column explicitly says `NULL`.
    pub nullable: bool,
    pub is_primary_key: bool,
    /// True when this column is the partition key and part of the primary key.
    pub is_partition_key: bool,
    /// `json` / `jsonb` columns.
    pub json: bool,
}
