use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Generate JPA entities, repositories and VOs from SQL CREATE TABLE statements.
#[derive(Parser, Debug)]
#[command(name = "jpagen", version, about)]
pub struct Cli {
    /// DDL file containing one or more CREATE TABLE statements
    #[arg(default_value = "create.sql")]
    pub input: PathBuf,

    /// Output root directory
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Config file (default: ~/.jpagenrc.toml)
    #[arg(long, env = "JPAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Remove the output directory before generating
    #[arg(long)]
    pub clean: bool,

    /// Tables to generate (comma-delimited)
    #[arg(long)]
    pub tables: Option<String>,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    pub write_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse the comma-delimited --tables flag into a Vec of table names.
    pub fn table_list(&self) -> Vec<String> {
        self.tables
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
