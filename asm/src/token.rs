use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Opcode,
    Operand,
    Delimiter,      // '[' ']' ','
    LabelSymbolic,  // name:
    LabelNumeric,   // 0: .. 9:
    LabelDelimiter, // ':'
    Unknown,
}

impl TokenKind {
    pub fn is_label(self) -> bool {
        matches!(self, TokenKind::LabelSymbolic | TokenKind::LabelNumeric)
    }
}

/// Where a token was written: 1-based line number, 0-based column, raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub line: usize,
    pub col: usize,
    pub raw: Rc<str>,
}

impl Site {
    pub fn new(line: usize, col: usize, raw: Rc<str>) -> Self {
        Site { line, col, raw }
    }

    /// Site of tokens the assembler inserts itself.
    pub fn synthetic() -> Self {
        Site {
            line: 0,
            col: 0,
            raw: Rc::from(""),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub site: Site,
    /// Body token this one was cloned from during macro expansion.
    pub origin: Option<Site>,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, site: Site) -> Self {
        Token {
            text: text.into(),
            kind,
            site,
            origin: None,
        }
    }

    pub fn is_delimiter(&self) -> bool {
        self.kind == TokenKind::Delimiter
    }

    /// Case-insensitive match against a directive such as `#macro`.
    pub fn is_directive(&self, name: &str) -> bool {
        self.text.eq_ignore_ascii_case(name)
    }
}

/// One non-blank source line. Never empty.
pub type Line = Vec<Token>;

/// Number of leading `label :` pairs on a line.
pub fn label_prefix(line: &[Token]) -> usize {
    line.chunks(2)
        .take_while(|pair| {
            matches!(pair, [label, colon] if label.kind.is_label() && colon.kind == TokenKind::LabelDelimiter)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, kind: TokenKind) -> Token {
        Token::new(text, kind, Site::synthetic())
    }

    #[test]
    fn counts_stacked_labels() {
        use TokenKind::*;
        let line = vec![
            tok("a", LabelSymbolic),
            tok(":", LabelDelimiter),
            tok("1", LabelNumeric),
            tok(":", LabelDelimiter),
            tok("NOP", Opcode),
        ];
        assert_eq!(label_prefix(&line), 2);
        assert_eq!(label_prefix(&line[4..]), 0);
        assert_eq!(label_prefix(&line[..2]), 1);
    }

    #[test]
    fn directives_ignore_case() {
        assert!(tok("#MACRO", TokenKind::Opcode).is_directive("#macro"));
        assert!(!tok("#macros", TokenKind::Opcode).is_directive("#macro"));
    }
}
