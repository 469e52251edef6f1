use thiserror::Error;

/// Structural errors raised while assembling Java syntax trees.
///
/// These always indicate a defect in the transformer, never bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{node} identifier cannot be empty")]
    EmptyIdentifier { node: &'static str },

    #[error("invalid {node} identifier: {name:?}")]
    InvalidIdentifier { node: &'static str, name: String },

    #[error("{node} modifiers must be a non-empty list")]
    EmptyModifiers { node: &'static str },

    #[error("{node} statement cannot be empty")]
    EmptyStatement { node: &'static str },

    #[error("class {class} already has a super class")]
    DuplicateSuperclass { class: String },

    #[error("package declaration is already set")]
    DuplicatePackage,

    #[error("doc comment is already set")]
    DuplicateDocComment,

    #[error("compilation unit has no package declaration")]
    MissingPackage,

    #[error("compilation unit has no class or interface declaration")]
    MissingTypeDeclaration,

    #[error("compilation unit declares both class {class} and interface {interface}")]
    ConflictingTypeDeclaration { class: String, interface: String },
}

/// Failures reported by a Java source formatter.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("invalid Java source at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("formatter command `{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("formatter command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("formatter IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a single table's generation can fail with.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("DDL is not a create table statement")]
    NotATableStatement,

    #[error("No statement found in DDL")]
    EmptyDdl,

    #[error("SQL syntax error: {0}")]
    Syntax(#[from] sqlparser::parser::ParserError),

    #[error("Table metadata error: {0}")]
    TableMetadata(String),

    #[error("Id field not found in table {table}")]
    NoPrimaryKey { table: String },

    #[error("AST build error: {0}")]
    Build(#[from] BuildError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Formatting task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// True when the error points at a bug in the generator rather than at the input.
    pub fn is_defect(&self) -> bool {
        matches!(self, GenError::Build(_))
    }
}
