use crate::signal::Template;
use strum::Display;

/// One entry of an opcode's operand grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Template),
    Immediate(Template),
    /// Plain operand or resolved branch target.
    RegisterOrImmediate { reg: Template, imm: Template },
    /// Bracketed `[reg]`, `[imm]` or `[reg, imm]`.
    RegisterOrImmediateOrBoth { reg: Template, imm: Template },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperandKind {
    #[strum(to_string = "R")]
    Register,
    #[strum(to_string = "I")]
    Immediate,
    #[strum(to_string = "R/I")]
    RegisterOrImmediate,
    #[strum(to_string = "[R/I/R,I]")]
    RegisterOrImmediateOrBoth,
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Register(_) => OperandKind::Register,
            Operand::Immediate(_) => OperandKind::Immediate,
            Operand::RegisterOrImmediate { .. } => OperandKind::RegisterOrImmediate,
            Operand::RegisterOrImmediateOrBoth { .. } => OperandKind::RegisterOrImmediateOrBoth,
        }
    }

    /// All signal names this operand may write.
    pub fn keys(&self) -> Vec<&'static str> {
        match self {
            Operand::Register(t) | Operand::Immediate(t) => t.keys().collect(),
            Operand::RegisterOrImmediate { reg, imm }
            | Operand::RegisterOrImmediateOrBoth { reg, imm } => {
                reg.keys().chain(imm.keys()).collect()
            }
        }
    }
}
