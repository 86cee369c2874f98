use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
#[strum(ascii_case_insensitive)]
pub enum Op {
    // Halt
    HLT,
    HLTG,
    HLTB,
    NOP,

    // Memory
    STORE,
    LOAD,
    PUSH,
    POP,

    // Branch
    B,
    BZ,
    BN,

    // Clear
    CMEM,
    CREG,
    CRAM,

    // Arithmetic
    ALU,
    MOV,
    ADD,
    SUB,
    INC,
    DEC,
    CMP,
    TST,
    MUL,
    DIV,
    POW,
    MOD,
    ASR,
    LSL,
    LSR,
    ROL,
    ROR,
    NOT,
    AND,
    OR,
    XOR,
}

impl Op {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

#[test]
fn test() {
    assert_eq!(Op::parse("mov"), Some(Op::MOV));
    assert_eq!(Op::parse("Hltg"), Some(Op::HLTG));
    assert_eq!(Op::parse("hoge"), None);
    assert_eq!(Op::XOR.to_string(), "XOR");
}
