use crate::{
    error::{Error, ErrorKind},
    token::{Line, Site, Token, TokenKind},
};
use std::rc::Rc;

const DELIMITERS: [char; 3] = ['[', ']', ','];

/// Split source text into lines of classified tokens.
/// Comments start at `;`. Blank lines are dropped.
pub fn tokenize(code: &str) -> Result<Vec<Line>, Error> {
    let mut lines = vec![];
    for (idx, raw) in code.lines().enumerate() {
        let line = LineLexer::new(idx + 1, raw).lex()?;
        if !line.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

struct LineLexer {
    line: usize,
    raw: Rc<str>,
    tokens: Line,
    opcode_seen: bool,
}

impl LineLexer {
    fn new(line: usize, raw: &str) -> Self {
        LineLexer {
            line,
            raw: Rc::from(raw),
            tokens: vec![],
            opcode_seen: false,
        }
    }

    fn site(&self, col: usize) -> Site {
        Site::new(self.line, col, self.raw.clone())
    }

    fn lex(mut self) -> Result<Line, Error> {
        let raw = self.raw.clone();
        let code = raw.split(';').next().unwrap_or_default();

        // (column, byte offset) of the word being read
        let mut word: Option<(usize, usize)> = None;
        for (col, (byte, ch)) in code.char_indices().enumerate() {
            let breaks = ch.is_whitespace() || ch == ':' || DELIMITERS.contains(&ch);
            if !breaks {
                word.get_or_insert((col, byte));
                continue;
            }
            if let Some((start, from)) = word.take() {
                self.word(&code[from..byte], start);
            }
            if ch == ':' {
                self.colon(col)?;
            } else if DELIMITERS.contains(&ch) {
                let tok = Token::new(ch, TokenKind::Delimiter, self.site(col));
                self.tokens.push(tok);
            }
        }
        if let Some((start, from)) = word {
            self.word(&code[from..], start);
        }
        Ok(self.tokens)
    }

    fn word(&mut self, text: &str, col: usize) {
        let kind = if !text.chars().all(|c| c.is_ascii_graphic()) {
            TokenKind::Unknown
        } else if self.opcode_seen {
            TokenKind::Operand
        } else {
            self.opcode_seen = true;
            TokenKind::Opcode
        };
        let tok = Token::new(text, kind, self.site(col));
        self.tokens.push(tok);
    }

    /// Reclassify the preceding word as a label.
    fn colon(&mut self, col: usize) -> Result<(), Error> {
        let site = self.site(col);
        let Some(prev) = self.tokens.last_mut() else {
            return Err(Error::at(
                ErrorKind::MissingLabel,
                &Token::new(':', TokenKind::LabelDelimiter, site),
            ));
        };
        if prev.kind != TokenKind::Opcode && !prev.kind.is_label() {
            return Err(Error::at(ErrorKind::InvalidLabel(prev.text.clone()), prev));
        }
        prev.kind = if is_numeric_label(&prev.text) {
            TokenKind::LabelNumeric
        } else {
            TokenKind::LabelSymbolic
        };
        self.opcode_seen = false;
        self.tokens
            .push(Token::new(':', TokenKind::LabelDelimiter, site));
        Ok(())
    }
}

fn is_numeric_label(text: &str) -> bool {
    text.len() == 1 && text.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(line: &Line) -> Vec<(&str, TokenKind)> {
        line.iter().map(|t| (t.text.as_str(), t.kind)).collect()
    }

    #[test]
    fn classifies_opcode_operands_and_delimiters() {
        let lines = tokenize("  STORE R0, [R3, 5] ; keep").unwrap();
        assert_eq!(
            kinds(&lines[0]),
            vec![
                ("STORE", Opcode),
                ("R0", Operand),
                (",", Delimiter),
                ("[", Delimiter),
                ("R3", Operand),
                (",", Delimiter),
                ("5", Operand),
                ("]", Delimiter),
            ]
        );
        assert_eq!(lines[0][0].site.col, 2);
        assert_eq!(lines[0][4].site.col, 13);
    }

    #[test]
    fn labels_reset_opcode_position() {
        let lines = tokenize("loop: 1: ADD R1, R1, 1").unwrap();
        assert_eq!(
            kinds(&lines[0])[..6],
            [
                ("loop", LabelSymbolic),
                (":", LabelDelimiter),
                ("1", LabelNumeric),
                (":", LabelDelimiter),
                ("ADD", Opcode),
                ("R1", Operand),
            ]
        );
    }

    #[test]
    fn label_without_whitespace() {
        let lines = tokenize("end:HLT").unwrap();
        assert_eq!(kinds(&lines[0]), vec![("end", LabelSymbolic), (":", LabelDelimiter), ("HLT", Opcode)]);
    }

    #[test]
    fn multi_digit_label_is_symbolic() {
        let lines = tokenize("12: NOP").unwrap();
        assert_eq!(lines[0][0].kind, LabelSymbolic);
    }

    #[test]
    fn blank_and_comment_lines_are_dropped() {
        let lines = tokenize("\n   \n; only a comment\nNOP\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0].site.line, 4);
    }

    #[test]
    fn colon_needs_a_label() {
        let err = tokenize("NOP\n: HLT").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingLabel);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn colon_after_operand_is_invalid() {
        let err = tokenize("MOV R0: 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidLabel("R0".into()));
        assert_eq!(err.site.unwrap().col, 4);
    }

    #[test]
    fn non_ascii_word_is_unknown() {
        let lines = tokenize("MOV R0, héllo").unwrap();
        assert_eq!(lines[0][3].kind, Unknown);
    }
}
