use crate::{
    error::{Error, ErrorKind},
    inst::Instruction,
    literal::{parse_with_prefix, LiteralError},
    token::Token,
};
use arch::{Operand, OpTable, Reg, Signals, Template};

/// One operand as written: a bare token or a `[...]` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<'a> {
    Single(&'a Token),
    Group { open: &'a Token, items: Vec<&'a Token> },
}

/// Group operand tokens, dropping commas.
pub fn extract(operands: &[Token]) -> Result<Vec<Arg<'_>>, Error> {
    let mut args = vec![];
    let mut group: Option<(&Token, Vec<&Token>)> = None;

    for tok in operands {
        if !tok.is_delimiter() {
            match group.as_mut() {
                Some((_, items)) => items.push(tok),
                None => args.push(Arg::Single(tok)),
            }
            continue;
        }
        match tok.text.as_str() {
            "[" => {
                if group.is_some() {
                    return Err(Error::at(ErrorKind::NestedBracket, tok));
                }
                group = Some((tok, vec![]));
            }
            "]" => match group.take() {
                None => return Err(Error::at(ErrorKind::UnopenedBracket, tok)),
                Some((_, items)) if items.is_empty() => {
                    return Err(Error::at(ErrorKind::EmptyBracket, tok))
                }
                Some((open, items)) => args.push(Arg::Group { open, items }),
            },
            _ => {}
        }
    }
    match group {
        Some((open, _)) => Err(Error::at(ErrorKind::UnclosedBracket, open)),
        None => Ok(args),
    }
}

pub struct Encoder<'t> {
    table: &'t OpTable,
}

impl<'t> Encoder<'t> {
    pub fn new(table: &'t OpTable) -> Self {
        Encoder { table }
    }

    pub fn encode(&self, inst: &Instruction) -> Result<Signals, Error> {
        let (op, enc) = self
            .table
            .get(&inst.opcode.text)
            .ok_or_else(|| Error::at(ErrorKind::UnknownOpcode(inst.opcode.text.clone()), &inst.opcode))?;
        let args = extract(&inst.operands)?;
        if args.len() != enc.operands.len() {
            return Err(Error::at(
                ErrorKind::OperandCount {
                    op: op.to_string(),
                    expected: enc.operands.len(),
                    found: args.len(),
                },
                &inst.opcode,
            ));
        }

        let mut signals = enc.control.clone();
        for (arg, grammar) in args.iter().zip(&enc.operands) {
            signals.merge(operand(arg, grammar)?);
        }
        Ok(signals)
    }

    pub fn encode_all(&self, insts: &[Instruction]) -> Result<Vec<Signals>, Error> {
        insts.iter().map(|inst| self.encode(inst)).collect()
    }
}

fn operand(arg: &Arg, grammar: &Operand) -> Result<Signals, Error> {
    match (grammar, arg) {
        (Operand::RegisterOrImmediateOrBoth { reg, imm }, Arg::Group { open, items }) => {
            match items.as_slice() {
                [one] => reg_or_imm(one, reg, imm),
                [r, i] => {
                    let mut signals = reg.fill(register(r)?);
                    signals.merge(imm.fill(immediate(i)?));
                    Ok(signals)
                }
                [_, _, extra, ..] => Err(Error::at(ErrorKind::BracketItems, extra)),
                [] => Err(Error::at(ErrorKind::EmptyBracket, open)),
            }
        }
        (Operand::RegisterOrImmediateOrBoth { .. }, Arg::Single(tok)) => {
            Err(Error::at(ErrorKind::ExpectedBracket, tok))
        }
        (_, Arg::Group { open, .. }) => Err(Error::at(ErrorKind::UnexpectedBracket, open)),
        (Operand::Register(t), Arg::Single(tok)) => Ok(t.fill(register(tok)?)),
        (Operand::Immediate(t), Arg::Single(tok)) => Ok(t.fill(immediate(tok)?)),
        (Operand::RegisterOrImmediate { reg, imm }, Arg::Single(tok)) => reg_or_imm(tok, reg, imm),
    }
}

fn reg_or_imm(tok: &Token, reg: &Template, imm: &Template) -> Result<Signals, Error> {
    if let Some(r) = Reg::parse(&tok.text) {
        return Ok(reg.fill(r.index()));
    }
    match parse_with_prefix(&tok.text) {
        Ok(v) => Ok(imm.fill(v)),
        Err(LiteralError::OutOfRange) => Err(Error::at(ErrorKind::ImmediateRange(tok.text.clone()), tok)),
        Err(LiteralError::Malformed) => Err(Error::at(ErrorKind::InvalidOperand(tok.text.clone()), tok)),
    }
}

fn register(tok: &Token) -> Result<i32, Error> {
    Reg::parse(&tok.text)
        .map(Reg::index)
        .ok_or_else(|| Error::at(ErrorKind::UnknownRegister(tok.text.clone()), tok))
}

fn immediate(tok: &Token) -> Result<i32, Error> {
    parse_with_prefix(&tok.text).map_err(|e| {
        let kind = match e {
            LiteralError::OutOfRange => ErrorKind::ImmediateRange(tok.text.clone()),
            LiteralError::Malformed => ErrorKind::InvalidImmediate(tok.text.clone()),
        };
        Error::at(kind, tok)
    })
}
