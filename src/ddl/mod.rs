//! DDL input handling: statement detection, the `PARTITION BY` pre-pass and
//! the boundary to the SQL parser.

pub mod adapter;

use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::GenError;

/// A parsed `CREATE TABLE` statement.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub statement: Statement,
    /// Whether a `PARTITION BY` clause was cut off before parsing.
    pub partition_clause: bool,
}

/// Parse a single `CREATE TABLE` statement.
pub fn parse_table(ddl: &str) -> Result<ParsedTable, GenError> {
    let (sql, partition_clause) = strip_partition_clause(ddl);
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, &sql)?;
    let statement = statements.into_iter().next().ok_or(GenError::EmptyDdl)?;
    if !matches!(statement, Statement::CreateTable(_)) {
        return Err(GenError::NotATableStatement);
    }
    Ok(ParsedTable {
        statement,
        partition_clause,
    })
}

/// Find every `CREATE TABLE ... ;` span in a script.
///
/// Matching is case-insensitive and ignores keywords and semicolons inside
/// string literals, quoted identifiers and comments. A trailing statement
/// without `;` is not returned.
pub fn split_statements(script: &str) -> Vec<String> {
    let mask = code_mask(script);
    let lower = script.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut statements = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if mask[i] {
            if let Some(after) = match_keywords(&lower, &mask, i, &["create", "table"]) {
                if let Some(end) = (after..bytes.len()).find(|&j| mask[j] && bytes[j] == b';') {
                    statements.push(script[i..=end].to_string());
                    i = end + 1;
                    continue;
                }
                break;
            }
        }
        i += 1;
    }
    statements
}

/// The table name written after `CREATE TABLE [IF NOT EXISTS]`, read
/// without parsing the rest of the statement. Schema qualifiers and quotes
/// are dropped.
pub fn declared_table_name(ddl: &str) -> Option<String> {
    let mask = code_mask(ddl);
    let lower = ddl.to_ascii_lowercase();
    let start = (0..lower.len())
        .filter(|&i| mask[i])
        .find_map(|i| match_keywords(&lower, &mask, i, &["create", "table"]))?;
    let mut pos = skip_whitespace(&lower, start);
    if let Some(after) = match_keywords(&lower, &mask, pos, &["if", "not", "exists"]) {
        pos = skip_whitespace(&lower, after);
    }
    let qualified: String = ddl[pos..]
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '(' && *c != ';')
        .collect();
    let name = qualified.rsplit('.').next()?.trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text.len() - text[pos..].trim_start().len()
}

/// Cut the statement at the first `PARTITION BY`, reporting whether one was found.
pub fn strip_partition_clause(ddl: &str) -> (String, bool) {
    let mask = code_mask(ddl);
    let lower = ddl.to_ascii_lowercase();
    let found = (0..lower.len())
        .find(|&i| mask[i] && match_keywords(&lower, &mask, i, &["partition", "by"]).is_some());
    match found {
        Some(pos) => (ddl[..pos].trim_end().to_string(), true),
        None => (ddl.to_string(), false),
    }
}

/// Per byte: true when the byte is SQL code rather than part of a string
/// literal, a quoted identifier or a comment.
fn code_mask(text: &str) -> Vec<bool> {
    #[derive(PartialEq)]
    enum State {
        Code,
        Single,
        Double,
        Line,
        Block,
    }

    let bytes = text.as_bytes();
    let mut mask = vec![true; bytes.len()];
    let mut state = State::Code;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (b, next) {
                (b'\'', _) => state = State::Single,
                (b'"', _) => state = State::Double,
                (b'-', Some(b'-')) => state = State::Line,
                (b'/', Some(b'*')) => state = State::Block,
                _ => {}
            },
            State::Single if b == b'\'' => {
                if next == Some(b'\'') {
                    mask[i] = false;
                    mask[i + 1] = false;
                    i += 2;
                    continue;
                }
                state = State::Code;
            }
            State::Double if b == b'"' => state = State::Code,
            State::Line if b == b'\n' => state = State::Code,
            State::Block if b == b'*' && next == Some(b'/') => {
                mask[i] = false;
                mask[i + 1] = false;
                i += 2;
                state = State::Code;
                continue;
            }
            _ => {}
        }
        if state != State::Code || b == b'\'' || b == b'"' {
            mask[i] = false;
        }
        i += 1;
    }
    mask
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Match whitespace-separated keywords at `pos` on word boundaries, returning
/// the index just past the last keyword.
fn match_keywords(lower: &str, mask: &[bool], pos: usize, words: &[&str]) -> Option<usize> {
    let bytes = lower.as_bytes();
    if pos > 0 && is_word_byte(bytes[pos - 1]) {
        return None;
    }
    let mut i = pos;
    for (n, word) in words.iter().enumerate() {
        if n > 0 {
            let start = i;
            while i < bytes.len() && mask[i] && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i == start {
                return None;
            }
        }
        if !lower[i..].starts_with(word) || !mask[i..i + word.len()].iter().all(|m| *m) {
            return None;
        }
        i += word.len();
    }
    if i < bytes.len() && is_word_byte(bytes[i]) {
        return None;
    }
    Some(i)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn test_split_statements() {
        let script = indoc! {"
            -- create table ignored (a int);
            CREATE TABLE a (id bigint);
            insert into a values (1);
            create   table b (
                note varchar(10) default ';'
            );
            Create Table c (id int)
        "};
        let statements = split_statements(script);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "CREATE TABLE a (id bigint);");
        assert!(statements[1].starts_with("create   table b ("));
        assert!(statements[1].ends_with(");"));
    }

    #[test]
    fn test_split_ignores_keywords_in_identifiers() {
        let statements = split_statements("create tables_x; create table t (a int);");
        assert_eq!(statements, vec!["create table t (a int);"]);
    }

    #[test]
    fn test_strip_partition_clause() {
        let (sql, found) =
            strip_partition_clause("CREATE TABLE t (id bigint) PARTITION BY LIST (dealer_partition_);");
        assert!(found);
        assert_eq!(sql, "CREATE TABLE t (id bigint)");

        let (sql, found) = strip_partition_clause("create table t (note varchar(20) default 'partition by')");
        assert!(!found);
        assert!(sql.ends_with("'partition by')"));
    }

    #[test]
    fn test_declared_table_name() {
        assert_eq!(
            declared_table_name("CREATE TABLE users (id bigint);").as_deref(),
            Some("users")
        );
        assert_eq!(
            declared_table_name("create table if not exists public.\"Orders\"(id bigint,, );").as_deref(),
            Some("Orders")
        );
        assert_eq!(
            declared_table_name("-- create table nope\ncreate table broken (;").as_deref(),
            Some("broken")
        );
        assert_eq!(declared_table_name("create table (;"), None);
        assert_eq!(declared_table_name("select 1;"), None);
    }

    #[test]
    fn test_parse_table() {
        let parsed = parse_table("CREATE TABLE users (user_id_ varchar(40) PRIMARY KEY);").unwrap();
        assert!(!parsed.partition_clause);
        assert!(matches!(parsed.statement, Statement::CreateTable(_)));

        let parsed = parse_table("create table t (id bigint, primary key (id)) partition by hash (id);")
            .unwrap();
        assert!(parsed.partition_clause);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_table("SELECT 1;"),
            Err(GenError::NotATableStatement)
        ));
        assert!(matches!(parse_table("   "), Err(GenError::EmptyDdl)));
        assert!(matches!(
            parse_table("CREATE TABLE (;"),
            Err(GenError::Syntax(_))
        ));
    }
}
