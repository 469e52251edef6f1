use crate::config::Config;
use crate::schema::ColumnMeta;

/// A SQL type split into its canonical name and numeric arguments.
/// e.g. "NUMERIC(16,2)" -> ("numeric", [16, 2])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlType {
    pub name: String,
    pub args: Vec<u64>,
}

const LENGTH_TYPES: &[&str] = &["character varying", "varchar"];
const PRECISION_TYPES: &[&str] = &["numeric"];
const JSON_TYPES: &[&str] = &["json", "jsonb"];

impl SqlType {
    /// Parse a rendered SQL type such as `VARCHAR(40)` or
    /// `TIMESTAMP(3) WITH TIME ZONE`.
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let (name, args) = match (lower.find('('), lower.find(')')) {
            (Some(open), Some(close)) if open < close => {
                let args = lower[open + 1..close]
                    .split(',')
                    .filter_map(|a| {
                        a.split_whitespace()
                            .next()
                            .and_then(|n| n.parse::<u64>().ok())
                    })
                    .collect();
                (format!("{} {}", &lower[..open], &lower[close + 1..]), args)
            }
            _ => (lower, Vec::new()),
        };
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            name: canonical_name(&name).to_string(),
            args,
        }
    }

    /// Declared length, for variable-length character types only.
    pub fn length(&self) -> Option<u64> {
        if LENGTH_TYPES.contains(&self.name.as_str()) {
            self.args.first().copied()
        } else {
            None
        }
    }

    /// Declared precision, for `numeric` only.
    pub fn precision(&self) -> Option<u64> {
        self.numeric_arg(0)
    }

    /// Declared scale, for `numeric` only.
    pub fn scale(&self) -> Option<u64> {
        self.numeric_arg(1)
    }

    fn numeric_arg(&self, index: usize) -> Option<u64> {
        if PRECISION_TYPES.contains(&self.name.as_str()) {
            self.args.get(index).copied()
        } else {
            None
        }
    }

    pub fn is_json(&self) -> bool {
        JSON_TYPES.contains(&self.name.as_str())
    }
}

fn canonical_name(name: &str) -> &str {
    match name {
        "timestamp with time zone" => "timestamptz",
        "timestamp without time zone" => "timestamp",
        "time with time zone" => "timetz",
        "time without time zone" => "time",
        other => other,
    }
}

/// The result of mapping a SQL column type to its Java representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Java type name (e.g. "Long", "BigDecimal", "byte[]").
    pub java_type: String,
    /// Imports the type needs. JSON columns also need the `@Type` imports.
    pub imports: Vec<String>,
    /// Initializer used for non-key fields (e.g. "BigDecimal.ZERO").
    pub default_value: Option<String>,
    pub default_import: Option<String>,
    /// True when the SQL type had no mapping and the fallback type was used.
    pub fallback: bool,
}

/// Map a column to its Java type through the configured tables.
pub fn map_column_type(col: &ColumnMeta, config: &Config) -> MappedType {
    let key = col.sql_type.as_str();
    let (java_type, fallback) = match config.data_type_map.get(key) {
        Some(t) => (t.clone(), false),
        None => (config.fallback_type.clone(), true),
    };
    let imports = config
        .data_import_map
        .get(key)
        .map(|list| list.as_slice().to_vec())
        .unwrap_or_default();
    MappedType {
        java_type,
        imports,
        default_value: config.default_value_map.get(key).cloned(),
        default_import: config.default_import_map.get(key).cloned(),
        fallback,
    }
}
