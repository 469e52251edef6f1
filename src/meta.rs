use crate::config::{Config, SuperClassRef};
use crate::error::GenError;
use crate::naming::{column_to_field_name, table_to_class_name};
use crate::schema::{ColumnMeta, TableMeta};
use crate::typemap::map_column_type;

/// How a table is partitioned, which decides packages, base classes and
/// whether a composite key class is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
    None,
    /// `PARTITION BY` was present but the partition key is not a key column.
    Clause,
    /// The partition key is part of the primary key.
    CompositeKey,
}

impl Partitioning {
    pub fn is_partitioned(self) -> bool {
        !matches!(self, Partitioning::None)
    }
}

/// Target packages for each generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packages {
    pub entity: String,
    pub entity_key: String,
    pub repository: String,
    pub vo: String,
}

/// A column with everything needed to declare it as a Java field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFieldMeta {
    pub column: ColumnMeta,
    pub field_name: String,
    pub field_type: String,
    pub imports: Vec<String>,
    pub default_value: Option<String>,
    pub default_import: Option<String>,
}

impl EntityFieldMeta {
    /// Key column that identifies the row (partition key excluded).
    pub fn is_id(&self) -> bool {
        self.column.is_primary_key && !self.column.is_partition_key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMeta {
    pub table_name: String,
    pub class_name: String,
    /// Primary-key field names in declaration order.
    pub primary_keys: Vec<String>,
    pub partitioning: Partitioning,
    /// Field holding the configured partition key, when the table has one.
    pub partition_field: Option<String>,
    pub packages: Packages,
    pub entity_super: SuperClassRef,
    pub repository_super: SuperClassRef,
    pub vo_super: SuperClassRef,
    pub author: String,
    pub fields: Vec<EntityFieldMeta>,
}

impl EntityMeta {
    /// Derive entity metadata for `table` under `config`.
    pub fn from_table(table: &TableMeta, config: &Config) -> Self {
        let partitioning = if table.is_primary_key(&config.partition_key) {
            Partitioning::CompositeKey
        } else if table.partition_clause {
            Partitioning::Clause
        } else {
            Partitioning::None
        };

        let fields: Vec<EntityFieldMeta> = table
            .columns
            .iter()
            .map(|col| {
                let mapped = map_column_type(col, config);
                if mapped.fallback {
                    tracing::warn!(
                        "Column {}.{} has unmapped type '{}', using {}",
                        table.name,
                        col.name,
                        col.sql_type,
                        mapped.java_type
                    );
                }
                EntityFieldMeta {
                    column: col.clone(),
                    field_name: column_to_field_name(&col.name),
                    field_type: mapped.java_type,
                    imports: mapped.imports,
                    default_value: mapped.default_value,
                    default_import: mapped.default_import,
                }
            })
            .collect();

        let partition_field = fields
            .iter()
            .find(|f| f.column.name == config.partition_key)
            .map(|f| f.field_name.clone());

        let partitioned = partitioning.is_partitioned();
        let pick = |plain: &String, partition: &String| {
            if partitioned {
                partition.clone()
            } else {
                plain.clone()
            }
        };
        let packages = Packages {
            entity: pick(&config.entity_package, &config.partition_entity_package),
            entity_key: config.entity_key_package.clone(),
            repository: pick(
                &config.repository_package,
                &config.partition_repository_package,
            ),
            vo: pick(&config.vo_package, &config.partition_vo_package),
        };
        let (entity_super, vo_super) = if partitioned {
            (
                config.partition_entity_super_class.clone(),
                config.partition_vo_super_class.clone(),
            )
        } else {
            (config.entity_super_class.clone(), config.vo_super_class.clone())
        };

        Self {
            table_name: table.name.clone(),
            class_name: table_to_class_name(&table.name),
            primary_keys: table
                .primary_keys
                .iter()
                .map(|pk| column_to_field_name(pk))
                .collect(),
            partitioning,
            partition_field,
            packages,
            entity_super,
            repository_super: config.repository_super_class.clone(),
            vo_super,
            author: config.author.clone(),
            fields,
        }
    }

    /// Identifying key fields in primary-key order, partition key excluded.
    pub fn id_fields(&self) -> Vec<&EntityFieldMeta> {
        self.primary_keys
            .iter()
            .filter_map(|pk| self.field(pk))
            .filter(|f| f.is_id())
            .collect()
    }

    /// Fails with `NoPrimaryKey` when there is nothing to identify a row by.
    pub fn require_id(&self) -> Result<Vec<&EntityFieldMeta>, GenError> {
        let ids = self.id_fields();
        if ids.is_empty() {
            return Err(GenError::NoPrimaryKey {
                table: self.table_name.clone(),
            });
        }
        Ok(ids)
    }

    pub fn field(&self, name: &str) -> Option<&EntityFieldMeta> {
        self.fields.iter().find(|f| f.field_name == name)
    }

    pub fn partition_field(&self) -> Option<&EntityFieldMeta> {
        self.partition_field.as_deref().and_then(|name| self.field(name))
    }

    pub fn key_class_name(&self) -> String {
        format!("{}Key", self.class_name)
    }

    pub fn repository_name(&self) -> String {
        format!("{}Repository", self.class_name)
    }

    pub fn vo_name(&self) -> String {
        format!("{}VO", self.class_name)
    }

    pub fn has_composite_key(&self) -> bool {
        self.partitioning == Partitioning::CompositeKey
    }

    /// The `Persistable`/repository key type: the composite key class or
    /// the first id field's type.
    pub fn key_type(&self) -> Result<String, GenError> {
        if self.has_composite_key() {
            self.require_id()?;
            return Ok(self.key_class_name());
        }
        let ids = self.require_id()?;
        if ids.len() > 1 {
            tracing::warn!(
                "Table {} has {} key columns but no partition key; using {} as the id",
                self.table_name,
                ids.len(),
                ids[0].field_name
            );
        }
        Ok(ids[0].field_type.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_column, test_table};

    #[test]
    fn test_simple_table() {
        let table = test_table("color_info", &["color_id_"], false);
        let meta = EntityMeta::from_table(&table, &Config::default());
        assert_eq!(meta.class_name, "ColorInfo");
        assert_eq!(meta.partitioning, Partitioning::None);
        assert_eq!(meta.primary_keys, vec!["colorId"]);
        assert_eq!(meta.packages.entity, "com.a1stream.domain.entity");
        assert_eq!(meta.packages.vo, "com.a1stream.domain.vo");
        assert_eq!(meta.entity_super.name, "BaseEntity");
        assert_eq!(meta.key_type().unwrap(), "Long");
    }

    #[test]
    fn test_composite_key_partitioning() {
        let mut table = test_table("consumer_info", &["consumer_id_", "dealer_partition_"], false);
        table.columns[1].is_partition_key = true;
        let meta = EntityMeta::from_table(&table, &Config::default());
        assert_eq!(meta.partitioning, Partitioning::CompositeKey);
        assert_eq!(meta.packages.entity, "com.a1stream.domain.entity.partition");
        assert_eq!(meta.packages.repository, "com.a1stream.domain.repository.partition");
        assert_eq!(meta.vo_super.name, "BasePartitionVO");
        assert_eq!(meta.partition_field.as_deref(), Some("dealerPartition"));
        let ids: Vec<&str> = meta.id_fields().iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(ids, vec!["consumerId"]);
        assert_eq!(meta.key_type().unwrap(), "ConsumerInfoKey");
    }

    #[test]
    fn test_clause_partitioning() {
        let table = test_table("orders", &["order_id_"], true);
        let meta = EntityMeta::from_table(&table, &Config::default());
        assert_eq!(meta.partitioning, Partitioning::Clause);
        assert_eq!(meta.packages.vo, "com.a1stream.domain.vo.partition");
        assert_eq!(meta.key_type().unwrap(), "Long");
    }

    #[test]
    fn test_no_primary_key() {
        let table = TableMeta {
            name: "logs".to_string(),
            primary_keys: vec![],
            columns: vec![test_column("message")],
            partition_clause: false,
        };
        let meta = EntityMeta::from_table(&table, &Config::default());
        assert!(matches!(
            meta.key_type(),
            Err(GenError::NoPrimaryKey { ref table }) if table == "logs"
        ));
    }

    #[test]
    fn test_only_partition_key_is_no_primary_key() {
        let mut table = test_table("t", &["dealer_partition_"], false);
        table.columns[0].is_partition_key = true;
        let meta = EntityMeta::from_table(&table, &Config::default());
        assert!(meta.require_id().is_err());
    }
}
