//! Generator configuration.
//!
//! Compiled-in defaults can be overridden by a TOML file. Every top-level key
//! is optional; keys present in the file replace the default wholesale.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

const DEFAULT_FILE_NAME: &str = ".jpagenrc.toml";

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Options handed to the Java formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub tab_width: usize,
    pub print_width: usize,
    /// External formatter invocation (program followed by its arguments).
    /// The source is piped through stdin; the result is read from stdout.
    pub command: Option<Vec<String>>,
    pub timeout_secs: u64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            print_width: 120,
            command: None,
            timeout_secs: 30,
        }
    }
}

/// A base class together with the package it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperClassRef {
    pub name: String,
    /// Either the package or the fully-qualified class name.
    pub package: String,
}

impl SuperClassRef {
    fn new(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
        }
    }

    /// Fully-qualified name to import.
    pub fn import(&self) -> String {
        if self.package.ends_with(&format!(".{}", self.name)) || self.package == self.name {
            self.package.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// One import or several, keyed by SQL type in `data_import_map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportList {
    One(String),
    Many(Vec<String>),
}

impl ImportList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            ImportList::One(one) => std::slice::from_ref(one),
            ImportList::Many(many) => many,
        }
    }
}

/// Java call that yields the current partition value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionContextConfig {
    pub expression: String,
    pub import: Option<String>,
}

/// Java calls that yield fresh identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGeneratorConfig {
    pub next_id: String,
    pub next_id_as_string: String,
    pub import: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name written into the `@author` doc tag.
    pub author: String,
    pub partition_key: String,
    /// Java type used when a SQL type has no entry in `data_type_map`.
    pub fallback_type: String,

    pub entity_package: String,
    pub partition_entity_package: String,
    pub entity_key_package: String,
    pub repository_package: String,
    pub partition_repository_package: String,
    pub vo_package: String,
    pub partition_vo_package: String,

    pub omit_columns: Vec<String>,

    pub format: FormatOptions,

    pub entity_super_class: SuperClassRef,
    pub partition_entity_super_class: SuperClassRef,
    pub repository_super_class: SuperClassRef,
    pub vo_super_class: SuperClassRef,
    pub partition_vo_super_class: SuperClassRef,

    pub data_type_map: BTreeMap<String, String>,
    pub data_import_map: BTreeMap<String, ImportList>,
    pub default_value_map: BTreeMap<String, String>,
    pub default_import_map: BTreeMap<String, String>,

    pub partition_context: PartitionContextConfig,
    pub id_generator: IdGeneratorConfig,
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const COMMON_CONSTANTS: &str = "com.a1stream.common.constants.CommonConstants";
const JSON_IMPORTS: [&str; 2] = [
    "org.hibernate.annotations.Type",
    "com.ymsl.solid.jpa.usertype.StringJsonUserType",
];

impl Default for Config {
    fn default() -> Self {
        let data_type_map = string_map(&[
            ("bigint", "Long"),
            ("int8", "Long"),
            ("integer", "Integer"),
            ("int", "Integer"),
            ("int4", "Integer"),
            ("smallint", "Integer"),
            ("int2", "Integer"),
            ("date", "LocalDate"),
            ("timestamp", "Instant"),
            ("timestamptz", "Instant"),
            ("time", "LocalTime"),
            ("timetz", "LocalTime"),
            ("numeric", "BigDecimal"),
            ("decimal", "BigDecimal"),
            ("character varying", "String"),
            ("varchar", "String"),
            ("character", "String"),
            ("char", "String"),
            ("text", "String"),
            ("bpchar", "String"),
            ("boolean", "Boolean"),
            ("bool", "Boolean"),
            ("bytea", "byte[]"),
            ("jsonb", "String"),
            ("json", "String"),
        ]);

        let mut data_import_map: BTreeMap<String, ImportList> = [
            ("numeric", "java.math.BigDecimal"),
            ("decimal", "java.math.BigDecimal"),
            ("timestamptz", "java.time.Instant"),
            ("timestamp", "java.time.Instant"),
            ("time", "java.time.LocalTime"),
            ("timetz", "java.time.LocalTime"),
            ("date", "java.time.LocalDate"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), ImportList::One(v.to_string())))
        .collect();
        for json in ["json", "jsonb"] {
            let imports = JSON_IMPORTS.iter().map(|s| s.to_string()).collect();
            data_import_map.insert(json.to_string(), ImportList::Many(imports));
        }

        let default_value_map = string_map(&[
            ("integer", "CommonConstants.INTEGER_ZERO"),
            ("int", "CommonConstants.INTEGER_ZERO"),
            ("int4", "CommonConstants.INTEGER_ZERO"),
            ("smallint", "CommonConstants.INTEGER_ZERO"),
            ("int2", "CommonConstants.INTEGER_ZERO"),
            ("numeric", "BigDecimal.ZERO"),
            ("decimal", "BigDecimal.ZERO"),
        ]);
        let default_import_map = string_map(&[
            ("integer", COMMON_CONSTANTS),
            ("int", COMMON_CONSTANTS),
            ("int4", COMMON_CONSTANTS),
            ("smallint", COMMON_CONSTANTS),
            ("int2", COMMON_CONSTANTS),
            ("numeric", "java.math.BigDecimal"),
            ("decimal", "java.math.BigDecimal"),
        ]);

        Self {
            author: "Entity Generator G3".to_string(),
            partition_key: "dealer_partition_".to_string(),
            fallback_type: "Object".to_string(),
            entity_package: "com.a1stream.domain.entity".to_string(),
            partition_entity_package: "com.a1stream.domain.entity.partition".to_string(),
            entity_key_package: "com.a1stream.domain.entity.partition".to_string(),
            repository_package: "com.a1stream.domain.repository".to_string(),
            partition_repository_package: "com.a1stream.domain.repository.partition".to_string(),
            vo_package: "com.a1stream.domain.vo".to_string(),
            partition_vo_package: "com.a1stream.domain.vo.partition".to_string(),
            omit_columns: [
                "update_author_",
                "update_date_",
                "create_author_",
                "create_date_",
                "update_program_",
                "update_counter_",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            format: FormatOptions::default(),
            entity_super_class: SuperClassRef::new("BaseEntity", "com.a1stream.common.model"),
            partition_entity_super_class: SuperClassRef::new(
                "BasePartitionEntity",
                "com.a1stream.common.model",
            ),
            repository_super_class: SuperClassRef::new(
                "ExtensionRepository",
                "com.a1stream.common.jpa.repository",
            ),
            vo_super_class: SuperClassRef::new("BaseVO", "com.a1stream.common.model"),
            partition_vo_super_class: SuperClassRef::new(
                "BasePartitionVO",
                "com.a1stream.common.model",
            ),
            data_type_map,
            data_import_map,
            default_value_map,
            default_import_map,
            partition_context: PartitionContextConfig {
                expression: "UserDetailsUtil.getDealerPartition()".to_string(),
                import: Some("com.a1stream.common.utils.UserDetailsUtil".to_string()),
            },
            id_generator: IdGeneratorConfig {
                next_id: "IdUtils.getSnowflakeIdWorker().nextId()".to_string(),
                next_id_as_string: "IdUtils.getSnowflakeIdWorker().nextIdStr()".to_string(),
                import: Some("com.ymsl.solid.base.util.IdUtils".to_string()),
            },
        }
    }
}

impl Config {
    /// Parse a TOML override on top of the defaults.
    pub fn from_toml(text: &str) -> Result<Self, GenError> {
        toml::from_str(text).map_err(|e| GenError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, GenError> {
        toml::to_string_pretty(self).map_err(|e| GenError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)
            .map_err(|e| GenError::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the defaults to `path`. Refuses to overwrite an existing file.
    pub fn write_defaults(path: &Path) -> Result<(), GenError> {
        if path.exists() {
            return Err(GenError::Config(format!(
                "{} already exists, not overwriting",
                path.display()
            )));
        }
        std::fs::write(path, Self::default().to_toml()?)?;
        Ok(())
    }

    pub fn is_omitted(&self, column: &str) -> bool {
        self.omit_columns.iter().any(|c| c == column)
    }
}

/// Resolve the config file location: an explicit path (flag or
/// `$JPAGEN_CONFIG`, both handled by the CLI) or `~/.jpagenrc.toml`.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(DEFAULT_FILE_NAME))
}

/// Load the config once per process; later calls return the cached value.
pub fn load_global(path: Option<&Path>) -> Result<&'static Config, GenError> {
    if let Some(config) = GLOBAL.get() {
        return Ok(config);
    }
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(GLOBAL.get_or_init(|| config))
}
