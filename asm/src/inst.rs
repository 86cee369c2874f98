use crate::token::{Site, Token, TokenKind};
use std::fmt;

/// One machine instruction. Its address is its index in the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Token,
    pub operands: Vec<Token>,
}

impl Instruction {
    pub fn new(opcode: Token, operands: Vec<Token>) -> Self {
        Instruction { opcode, operands }
    }

    /// Green halt appended at the end of a program.
    pub fn halt() -> Self {
        Instruction::new(Token::new("HLTG", TokenKind::Opcode, Site::synthetic()), vec![])
    }

    pub fn site(&self) -> &Site {
        &self.opcode.site
    }
}

/// Preprocessed listing form, e.g. `STORE R0, [R3, 5]`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5}", self.opcode.text)?;
        let mut prev: Option<&str> = None;
        for tok in &self.operands {
            let tight = matches!(tok.text.as_str(), "," | "]") || prev == Some("[");
            if !tight {
                write!(f, " ")?;
            }
            write!(f, "{}", tok.text)?;
            prev = Some(tok.text.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn inst(src: &str) -> Instruction {
        let mut line = tokenize(src).unwrap().remove(0);
        let operands = line.split_off(1);
        Instruction::new(line.remove(0), operands)
    }

    #[test]
    fn listing_layout() {
        assert_eq!(inst("store r0,[R3,5]").to_string(), "store r0, [R3, 5]");
        assert_eq!(inst("MOV R1, 7").to_string(), "MOV   R1, 7");
        assert_eq!(Instruction::halt().to_string(), "HLTG ");
    }
}
