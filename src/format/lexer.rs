use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Literal,
    Punct,
    LineComment,
    BlockComment,
}

/// A lexical token together with the whitespace that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Whitespace separated this token from the previous one.
    pub spaced: bool,
    pub line: usize,
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Word && self.text == text
    }
}

const TWO_CHAR_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "->", "::", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
];

/// Split Java source into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, FormatError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut spaced = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            spaced = true;
            i += 1;
            continue;
        }

        let start = i;
        let start_line = line;
        let kind = if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            TokenKind::LineComment
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            loop {
                match chars.get(i) {
                    None => {
                        return Err(FormatError::Syntax {
                            line: start_line,
                            message: "unterminated block comment".to_string(),
                        })
                    }
                    Some('*') if chars.get(i + 1) == Some(&'/') => {
                        i += 2;
                        break;
                    }
                    Some(ch) => {
                        if *ch == '\n' {
                            line += 1;
                        }
                        i += 1;
                    }
                }
            }
            TokenKind::BlockComment
        } else if c == '"' || c == '\'' {
            i += 1;
            loop {
                match chars.get(i) {
                    None | Some('\n') => {
                        let what = if c == '"' { "string" } else { "character" };
                        return Err(FormatError::Syntax {
                            line: start_line,
                            message: format!("unterminated {what} literal"),
                        });
                    }
                    Some('\\') => i += 2,
                    Some(ch) if *ch == c => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            TokenKind::Literal
        } else if is_word_char(c) {
            let numeric = c.is_ascii_digit();
            while i < chars.len()
                && (is_word_char(chars[i])
                    || (numeric
                        && chars[i] == '.'
                        && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())))
            {
                i += 1;
            }
            TokenKind::Word
        } else {
            let pair: String = chars[i..chars.len().min(i + 2)].iter().collect();
            i += if TWO_CHAR_OPS.contains(&pair.as_str()) { 2 } else { 1 };
            TokenKind::Punct
        };

        tokens.push(Token {
            kind,
            text: chars[start..i].iter().collect(),
            spaced,
            line: start_line,
        });
        spaced = false;
    }

    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_field() {
        let tokens = tokenize("private BigDecimal price = BigDecimal.ZERO;").unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["private", "BigDecimal", "price", "=", "BigDecimal", ".", "ZERO", ";"]
        );
        assert!(tokens[1].spaced);
        assert!(!tokens[5].spaced);
        assert!(!tokens[7].spaced);
    }

    #[test]
    fn test_tokenize_literals_and_numbers() {
        let tokens = tokenize(r#"f("a \" b", 'x', 1.5f, 1L)"#).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["f", "(", r#""a \" b""#, ",", "'x'", ",", "1.5f", ",", "1L", ")"]
        );
        assert_eq!(tokens[2].kind, TokenKind::Literal);
    }

    #[test]
    fn test_tokenize_comments_track_lines() {
        let tokens = tokenize("// one\n/**\n * two\n */\nclass A {}").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[1].kind, TokenKind::BlockComment);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 5);
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = tokenize("a -> b == c").unwrap();
        assert_eq!(texts(&tokens), vec!["a", "->", "b", "==", "c"]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("class A {\n String s = \"oops;\n}").unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("/* never closed").unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 1, .. }));
    }
}
