//! Token-driven re-layout of Java source.
//!
//! Statements are rebuilt from their tokens, keeping a single space wherever
//! the input had whitespace. Blocks are re-indented by `tab_width`, members of
//! a type body are separated by blank lines (runs of plain fields stay
//! together), the import block is sorted, and statements wider than
//! `print_width` are broken before each chained call.

use crate::config::FormatOptions;
use crate::error::FormatError;

use super::lexer::{tokenize, Token, TokenKind};

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];
const CONTINUATIONS: &[&str] = &["else", "catch", "finally"];

pub fn format(source: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let tokens = tokenize(source)?;
    let mut layout = Layout::new(options);
    layout.run(&tokens)?;
    layout.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    File,
    Type,
    Enum,
    Code,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    opened_at: usize,
    /// Comments or annotations were emitted for a member not yet finished.
    in_element: bool,
    prev_plain_field: bool,
}

impl Scope {
    fn new(kind: ScopeKind, opened_at: usize) -> Self {
        Self {
            kind,
            opened_at,
            in_element: false,
            prev_plain_field: false,
        }
    }
}

struct Layout<'a> {
    options: &'a FormatOptions,
    out: Vec<String>,
    scopes: Vec<Scope>,
    imports: Vec<String>,
    pending: Vec<Token>,
    /// Expected closers of `(`, `[` and inline `{` inside the pending statement.
    nesting: Vec<(&'static str, usize)>,
    /// Pending statement has a top-level `=`.
    assigned: bool,
    /// Closing brace to prefix onto the next line (`} else {`).
    carry: Option<String>,
}

impl<'a> Layout<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            out: Vec::new(),
            scopes: vec![Scope::new(ScopeKind::File, 0)],
            imports: Vec::new(),
            pending: Vec::new(),
            nesting: Vec::new(),
            assigned: false,
            carry: None,
        }
    }

    fn run(&mut self, tokens: &[Token]) -> Result<(), FormatError> {
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            let at_statement_start = self.pending.is_empty() && self.carry.is_none();

            if tok.kind == TokenKind::LineComment {
                self.line_comment(tok, i.checked_sub(1).map(|p| &tokens[p]));
            } else if tok.kind == TokenKind::BlockComment && at_statement_start {
                self.decoration(comment_lines(&tok.text));
            } else if at_statement_start && is_annotation_start(tokens, i) {
                let end = annotation_end(tokens, i)?;
                self.decoration(vec![join(&tokens[i..end])]);
                i = end;
                continue;
            } else if tok.is_punct("{") && self.nesting.is_empty() && !self.assigned {
                if tokens.get(i + 1).is_some_and(|n| n.is_punct("}")) {
                    self.empty_block(tokens.get(i + 2));
                    i += 2;
                    continue;
                }
                self.open_block(tok.line);
            } else if tok.is_punct("}") && self.nesting.is_empty() {
                self.close_block(tok, tokens.get(i + 1))?;
            } else if tok.is_punct(";") && self.nesting.is_empty() {
                self.pending.push(tok.clone());
                self.statement();
            } else {
                self.push_token(tok)?;
            }
            i += 1;
        }
        Ok(())
    }

    fn push_token(&mut self, tok: &Token) -> Result<(), FormatError> {
        if tok.kind == TokenKind::Punct {
            match tok.text.as_str() {
                "(" => self.nesting.push((")", tok.line)),
                "[" => self.nesting.push(("]", tok.line)),
                "{" => self.nesting.push(("}", tok.line)),
                ")" | "]" | "}" => match self.nesting.pop() {
                    Some((closer, _)) if closer == tok.text => {}
                    _ => {
                        return Err(FormatError::Syntax {
                            line: tok.line,
                            message: format!("unbalanced '{}'", tok.text),
                        })
                    }
                },
                "=" if self.nesting.is_empty() => self.assigned = true,
                _ => {}
            }
        }
        self.pending.push(tok.clone());
        Ok(())
    }

    fn line_comment(&mut self, tok: &Token, prev: Option<&Token>) {
        let text = tok.text.trim_end();
        if !self.pending.is_empty() {
            self.pending.push(Token {
                kind: TokenKind::BlockComment,
                text: format!("/* {} */", text.trim_start_matches('/').trim()),
                ..tok.clone()
            });
            return;
        }
        if prev.is_some_and(|p| p.line == tok.line) {
            let last = if self.scope().kind == ScopeKind::File && !self.imports.is_empty() {
                self.imports.last_mut()
            } else {
                self.out.last_mut()
            };
            if let Some(last) = last {
                last.push(' ');
                last.push_str(text);
                return;
            }
        }
        self.decoration(vec![text.to_string()]);
    }

    fn statement(&mut self) {
        let kind = self.scope().kind;
        if kind == ScopeKind::File && self.pending.first().is_some_and(|t| t.is_word("import")) {
            let text = self.take_text();
            self.imports.push(text);
            return;
        }
        let plain = matches!(kind, ScopeKind::Type | ScopeKind::Enum) && is_field(&self.pending);
        let lines = self.take_lines();
        self.emit_member(lines, plain);
    }

    fn open_block(&mut self, line: usize) {
        let kind = block_kind(&self.pending);
        let header = self.take_text();
        let text = if header.is_empty() {
            "{".to_string()
        } else {
            format!("{header} {{")
        };
        self.emit_member(vec![text], false);
        self.scopes.push(Scope::new(kind, line));
    }

    fn empty_block(&mut self, next: Option<&Token>) {
        let header = self.take_text();
        let text = if header.is_empty() {
            "{}".to_string()
        } else {
            format!("{header} {{}}")
        };
        if is_continuation(next) {
            self.carry = Some(text);
        } else {
            self.emit_member(vec![text], false);
        }
    }

    fn close_block(&mut self, tok: &Token, next: Option<&Token>) -> Result<(), FormatError> {
        if self.scopes.len() == 1 {
            return Err(FormatError::Syntax {
                line: tok.line,
                message: "unbalanced '}'".to_string(),
            });
        }
        if !self.pending.is_empty() {
            if self.scope().kind != ScopeKind::Enum {
                return Err(dangling(&self.pending));
            }
            let lines = self.take_lines();
            self.emit_member(lines, true);
        }
        self.scopes.pop();
        self.scope_mut().prev_plain_field = false;
        if is_continuation(next) {
            self.carry = Some("}".to_string());
        } else {
            self.push_line("}".to_string());
        }
        Ok(())
    }

    fn decoration(&mut self, lines: Vec<String>) {
        if !self.scope().in_element {
            self.begin_element(false);
        }
        for line in lines {
            self.push_line(line);
        }
        self.scope_mut().in_element = true;
    }

    fn emit_member(&mut self, lines: Vec<String>, plain_field: bool) {
        let decorated = self.scope().in_element;
        if !decorated {
            self.begin_element(plain_field);
        }
        for line in lines {
            self.push_line(line);
        }
        let scope = self.scope_mut();
        scope.in_element = false;
        scope.prev_plain_field = plain_field && !decorated;
    }

    fn begin_element(&mut self, plain_field: bool) {
        match self.scope().kind {
            ScopeKind::File => {
                self.flush_imports();
                if !self.out.is_empty() {
                    self.out.push(String::new());
                }
            }
            ScopeKind::Type | ScopeKind::Enum => {
                if !(plain_field && self.scope().prev_plain_field) {
                    self.out.push(String::new());
                }
            }
            ScopeKind::Code => {}
        }
    }

    fn flush_imports(&mut self) {
        if self.imports.is_empty() {
            return;
        }
        let mut imports = std::mem::take(&mut self.imports);
        imports.sort_by(|a, b| import_key(a).cmp(&import_key(b)));
        imports.dedup();
        if !self.out.is_empty() {
            self.out.push(String::new());
        }
        self.out.extend(imports);
    }

    fn push_line(&mut self, text: String) {
        let indent = " ".repeat(self.indent_width());
        self.out.push(format!("{indent}{text}"));
    }

    fn indent_width(&self) -> usize {
        (self.scopes.len() - 1) * self.options.tab_width
    }

    fn take_text(&mut self) -> String {
        let tokens = std::mem::take(&mut self.pending);
        self.assigned = false;
        with_carry(self.carry.take(), join(&tokens))
    }

    /// Render the pending statement, breaking it before chained calls when too wide.
    fn take_lines(&mut self) -> Vec<String> {
        let tokens = std::mem::take(&mut self.pending);
        self.assigned = false;
        let carry = self.carry.take();
        let line = with_carry(carry.clone(), join(&tokens));
        if self.indent_width() + line.chars().count() <= self.options.print_width {
            return vec![line];
        }
        let breaks = chain_breaks(&tokens);
        let Some(&first) = breaks.first() else {
            return vec![line];
        };
        let continuation = " ".repeat(self.options.tab_width);
        let mut lines = vec![with_carry(carry, join(&tokens[..first]))];
        for (n, &start) in breaks.iter().enumerate() {
            let end = breaks.get(n + 1).copied().unwrap_or(tokens.len());
            lines.push(format!("{continuation}{}", join(&tokens[start..end])));
        }
        lines
    }

    fn scope(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn finish(mut self) -> Result<String, FormatError> {
        if !self.pending.is_empty() {
            return Err(dangling(&self.pending));
        }
        if let Some((closer, line)) = self.nesting.last() {
            return Err(FormatError::Syntax {
                line: *line,
                message: format!("missing '{closer}'"),
            });
        }
        if self.scopes.len() > 1 {
            return Err(FormatError::Syntax {
                line: self.scope().opened_at,
                message: "missing '}'".to_string(),
            });
        }
        if let Some(carry) = self.carry.take() {
            self.push_line(carry);
        }
        self.flush_imports();
        if self.out.is_empty() {
            return Ok(String::new());
        }
        let mut text = self.out.join("\n");
        text.push('\n');
        Ok(text)
    }
}

fn join(tokens: &[Token]) -> String {
    let mut text = String::new();
    for (n, tok) in tokens.iter().enumerate() {
        if n > 0 && tok.spaced {
            text.push(' ');
        }
        text.push_str(&tok.text);
    }
    text
}

fn with_carry(carry: Option<String>, text: String) -> String {
    match carry {
        Some(prefix) if text.is_empty() => prefix,
        Some(prefix) => format!("{prefix} {text}"),
        None => text,
    }
}

fn dangling(pending: &[Token]) -> FormatError {
    FormatError::Syntax {
        line: pending[0].line,
        message: format!("dangling statement `{}`", join(pending)),
    }
}

fn is_continuation(next: Option<&Token>) -> bool {
    next.is_some_and(|n| CONTINUATIONS.iter().any(|k| n.is_word(k)))
}

fn is_annotation_start(tokens: &[Token], i: usize) -> bool {
    tokens[i].is_punct("@")
        && tokens
            .get(i + 1)
            .is_some_and(|n| n.kind == TokenKind::Word && n.text != "interface")
}

/// Index one past the annotation starting at `i`.
fn annotation_end(tokens: &[Token], i: usize) -> Result<usize, FormatError> {
    let mut j = i + 2;
    while tokens.get(j).is_some_and(|t| t.is_punct("."))
        && tokens.get(j + 1).is_some_and(|t| t.kind == TokenKind::Word)
    {
        j += 2;
    }
    if !tokens.get(j).is_some_and(|t| t.is_punct("(")) {
        return Ok(j);
    }
    let mut depth = 0usize;
    while let Some(tok) = tokens.get(j) {
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
            if depth == 0 {
                return Ok(j + 1);
            }
        }
        j += 1;
    }
    Err(FormatError::Syntax {
        line: tokens[i].line,
        message: "missing ')' in annotation".to_string(),
    })
}

fn block_kind(header: &[Token]) -> ScopeKind {
    let keyword = header
        .iter()
        .find(|t| TYPE_KEYWORDS.iter().any(|k| t.is_word(k)));
    match keyword {
        Some(t) if t.text == "enum" => ScopeKind::Enum,
        Some(_) => ScopeKind::Type,
        None => ScopeKind::Code,
    }
}

/// A declaration is a field unless a parameter list comes before any initializer.
fn is_field(tokens: &[Token]) -> bool {
    let paren = tokens.iter().position(|t| t.is_punct("("));
    let assign = tokens.iter().position(|t| t.is_punct("="));
    match (paren, assign) {
        (None, _) => true,
        (Some(p), Some(a)) => a < p,
        (Some(_), None) => false,
    }
}

/// Top-level `.` tokens that directly follow a call.
fn chain_breaks(tokens: &[Token]) -> Vec<usize> {
    let mut depth = 0usize;
    let mut breaks = Vec::new();
    for (n, tok) in tokens.iter().enumerate() {
        if tok.kind != TokenKind::Punct {
            continue;
        }
        match tok.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            "." if depth == 0 && n > 0 && tokens[n - 1].is_punct(")") => breaks.push(n),
            _ => {}
        }
    }
    breaks
}

/// Static imports sort ahead of the rest.
fn import_key(line: &str) -> (bool, &str) {
    let is_static = line.starts_with("import static ");
    (!is_static, line)
}

fn comment_lines(text: &str) -> Vec<String> {
    text.lines()
        .enumerate()
        .map(|(n, line)| {
            let line = line.trim();
            if n > 0 && line.starts_with('*') {
                format!(" {line}")
            } else {
                line.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn fmt(source: &str) -> String {
        format(source, &FormatOptions::default()).unwrap()
    }

    #[test]
    fn test_hello_world() {
        let source = r#"public class HelloWorld { public static void main(String[] args) { System.out.println("Hello, World!"); } }"#;
        let expected = indoc! {r#"
            public class HelloWorld {

                public static void main(String[] args) {
                    System.out.println("Hello, World!");
                }
            }
        "#};
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_unit_layout() {
        let source = indoc! {"
            package com.example.repository;
            import org.springframework.stereotype.Repository;
            import com.example.base.ExtensionRepository;
            import com.example.base.ExtensionRepository;
            /**
             * @author Someone
             */
            @Repository
            public interface UserRepository extends ExtensionRepository<User, Long> {
            }
        "};
        let formatted = fmt(source);
        insta::assert_snapshot!(formatted.trim_end(), @r"
        package com.example.repository;

        import com.example.base.ExtensionRepository;
        import org.springframework.stereotype.Repository;

        /**
         * @author Someone
         */
        @Repository
        public interface UserRepository extends ExtensionRepository<User, Long> {}
        ");
    }

    #[test]
    fn test_member_spacing() {
        let source = indoc! {r#"
            public class A {
            private static final long serialVersionUID = 1L;
            private Long id;
            private String name;
            @Transient
            private boolean isNew = true;
            private int count;
            @Override
            public Long getId() {
            return id;
            }
            }
        "#};
        let expected = indoc! {"
            public class A {

                private static final long serialVersionUID = 1L;
                private Long id;
                private String name;

                @Transient
                private boolean isNew = true;

                private int count;

                @Override
                public Long getId() {
                    return id;
                }
            }
        "};
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_long_chain_breaks() {
        let source = "class A { static B b() { return A.builder().consumerId(IdUtils.getSnowflakeIdWorker().nextId()).dealerPartition(UserDetailsUtil.getDealerPartition()); } }";
        let expected = indoc! {"
            class A {

                static B b() {
                    return A.builder()
                        .consumerId(IdUtils.getSnowflakeIdWorker().nextId())
                        .dealerPartition(UserDetailsUtil.getDealerPartition());
                }
            }
        "};
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_short_chain_stays() {
        let formatted = fmt("class A { B b() { return A.builder().id(1L); } }");
        assert!(formatted.contains("        return A.builder().id(1L);\n"));
    }

    #[test]
    fn test_tab_width_and_control_flow() {
        let options = FormatOptions {
            tab_width: 2,
            ..FormatOptions::default()
        };
        let source = "class A { void f(int x) { if (x > 0) { g(); } else { h(); } for (int i = 0; i < x; i++) {} } }";
        let expected = indoc! {"
            class A {

              void f(int x) {
                if (x > 0) {
                  g();
                } else {
                  h();
                }
                for (int i = 0; i < x; i++) {}
              }
            }
        "};
        assert_eq!(format(source, &options).unwrap(), expected);
    }

    #[test]
    fn test_inline_braces_and_comments() {
        let source = indoc! {"
            class A {
            // counts
            int[] values = {1, 2}; // trailing
            @SuppressWarnings({\"a\", \"b\"})
            void f() {}
            }
        "};
        let expected = indoc! {"
            class A {

                // counts
                int[] values = {1, 2}; // trailing

                @SuppressWarnings({\"a\", \"b\"})
                void f() {}
            }
        "};
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_enum_constants() {
        let formatted = fmt("enum Color { RED, GREEN }");
        assert_eq!(formatted, "enum Color {\n\n    RED, GREEN\n}\n");
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = format("class A { void f() {", &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Syntax { .. }));
        let err = format("class A { } }", &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = format("class A { void f() { g(1]; } }", &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Syntax { .. }));
    }

    #[test]
    fn test_dangling_statement() {
        let err = format("class A { int x }", &FormatOptions::default()).unwrap_err();
        match err {
            FormatError::Syntax { message, .. } => assert!(message.contains("int x")),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(format("package a", &FormatOptions::default()).is_err());
    }

    #[test]
    fn test_idempotent() {
        let source = "package a; import b.C; /** doc */ @X public class D { private int e; void f() { g(); } }";
        let once = fmt(source);
        assert_eq!(fmt(&once), once);
    }
}
