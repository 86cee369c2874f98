//! Label binding and resolution.
//!
//! Symbolic labels (`loop:`) are global. Numeric labels (`0:`..`9:`) may be
//! declared many times and are referenced relative to the use site as `Nb`
//! (nearest at or before) or `Nf` (nearest strictly after).

use crate::{
    error::{Error, ErrorKind, Warning},
    inst::Instruction,
    token::{label_prefix, Line, Site, Token, TokenKind},
};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Back,
    Forward,
}

#[derive(Debug, Clone)]
struct Symbol {
    address: usize,
    site: Site,
    used: bool,
}

#[derive(Debug, Clone)]
struct Local {
    digit: char,
    address: usize,
    site: Site,
    used: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Labels {
    symbols: IndexMap<String, Symbol>,
    locals: Vec<Local>,
}

impl Labels {
    pub fn new() -> Self {
        Labels::default()
    }

    pub fn define(&mut self, label: &Token, address: usize) -> Result<(), Error> {
        let site = label.site.clone();
        match label.kind {
            TokenKind::LabelNumeric => {
                let digit = label.text.chars().next().unwrap_or('0');
                self.locals.push(Local {
                    digit,
                    address,
                    site,
                    used: false,
                });
            }
            _ => {
                if let Some(prev) = self.symbols.get(&label.text) {
                    return Err(Error::at(ErrorKind::DuplicateLabel(label.text.clone()), label)
                        .note("first defined here", prev.site.clone()));
                }
                self.symbols.insert(
                    label.text.clone(),
                    Symbol {
                        address,
                        site,
                        used: false,
                    },
                );
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).map(|s| s.address)
    }

    pub fn len(&self) -> usize {
        self.symbols.len() + self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn use_symbol(&mut self, name: &str) -> Option<usize> {
        let sym = self.symbols.get_mut(name)?;
        sym.used = true;
        Some(sym.address)
    }

    /// Address of the numeric label `digit` seen from `from`.
    pub fn resolve_local(&mut self, digit: char, dir: Dir, from: usize) -> Result<usize, ErrorKind> {
        let mut back = None;
        let mut forward = None;
        let mut prev: Option<usize> = None;
        for (idx, local) in self.locals.iter().enumerate() {
            if local.digit != digit {
                continue;
            }
            if let Some(p) = prev.filter(|&p| p > local.address) {
                return Err(ErrorKind::LabelOrder {
                    digit,
                    prev: p,
                    next: local.address,
                });
            }
            prev = Some(local.address);
            if local.address <= from {
                back = Some(idx);
            } else if forward.is_none() {
                forward = Some(idx);
            }
        }
        let found = match dir {
            Dir::Back => back.ok_or(ErrorKind::NoBackwardLabel(digit))?,
            Dir::Forward => forward.ok_or(ErrorKind::NoForwardLabel(digit))?,
        };
        self.locals[found].used = true;
        Ok(self.locals[found].address)
    }

    /// Every label no operand referred to, or `None`.
    pub fn unused(&self) -> Option<Warning> {
        let warning = Warning {
            symbolic: self
                .symbols
                .iter()
                .filter(|(_, s)| !s.used)
                .map(|(name, s)| (name.clone(), s.site.clone()))
                .collect(),
            numeric: self
                .locals
                .iter()
                .filter(|l| !l.used)
                .map(|l| (l.digit, l.site.clone()))
                .collect(),
        };
        (!warning.is_empty()).then_some(warning)
    }
}

/// `3b` / `7f` style reference.
pub fn local_ref(text: &str) -> Option<(char, Dir)> {
    let mut chars = text.chars();
    let (digit, suffix) = (chars.next()?, chars.next()?);
    if chars.next().is_some() || !digit.is_ascii_digit() {
        return None;
    }
    match suffix {
        'b' => Some((digit, Dir::Back)),
        'f' => Some((digit, Dir::Forward)),
        _ => None,
    }
}

/// Pass 1: strip leading labels, binding each to the next instruction address.
pub fn build(lines: Vec<Line>) -> Result<(Vec<Instruction>, Labels), Error> {
    let mut labels = Labels::new();
    let mut insts = vec![];

    for mut line in lines {
        if let Some(tok) = line.iter().find(|t| t.kind == TokenKind::Unknown) {
            return Err(Error::at(ErrorKind::UnknownToken(tok.text.clone()), tok));
        }
        let n = label_prefix(&line);
        for label in line.drain(..n * 2).step_by(2) {
            labels.define(&label, insts.len())?;
        }
        if line.is_empty() {
            continue;
        }
        let operands = line.split_off(1);
        let opcode = line.remove(0);
        insts.push(Instruction::new(opcode, operands));
    }
    Ok((insts, labels))
}

/// Pass 2: rewrite label references in operands to decimal addresses.
pub fn resolve(lines: Vec<Line>) -> Result<(Vec<Instruction>, Labels), Error> {
    let (mut insts, mut labels) = build(lines)?;
    for (address, inst) in insts.iter_mut().enumerate() {
        for tok in inst.operands.iter_mut().filter(|t| t.kind == TokenKind::Operand) {
            if let Some(target) = labels.use_symbol(&tok.text) {
                tok.text = target.to_string();
            } else if let Some((digit, dir)) = local_ref(&tok.text) {
                let target = labels
                    .resolve_local(digit, dir, address)
                    .map_err(|kind| Error::at(kind, &*tok))?;
                tok.text = target.to_string();
            }
        }
    }
    Ok((insts, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Category, lexer::tokenize};

    fn run(src: &str) -> Result<(Vec<Instruction>, Labels), Error> {
        resolve(tokenize(src).unwrap())
    }

    fn listing(insts: &[Instruction]) -> Vec<String> {
        insts.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn parses_local_refs() {
        assert_eq!(local_ref("3b"), Some(('3', Dir::Back)));
        assert_eq!(local_ref("0f"), Some(('0', Dir::Forward)));
        assert_eq!(local_ref("3B"), None);
        assert_eq!(local_ref("12b"), None);
        assert_eq!(local_ref("xb"), None);
    }

    #[test]
    fn symbolic_labels_bind_to_next_instruction() {
        let (insts, labels) = run("start: NOP\nloop:\n  ADD R1, R1, 1\n  B loop\nend: HLT").unwrap();
        assert_eq!(labels.get("start"), Some(0));
        assert_eq!(labels.get("loop"), Some(1));
        assert_eq!(labels.get("end"), Some(3));
        assert_eq!(insts.len(), 4);
        assert_eq!(listing(&insts)[2], "B     1");
    }

    #[test]
    fn stacked_labels_share_an_address() {
        let (_, labels) = run("a: b: NOP\nB a\nB b").unwrap();
        assert_eq!(labels.get("a"), Some(0));
        assert_eq!(labels.get("b"), Some(0));
        assert!(labels.unused().is_none());
    }

    #[test]
    fn trailing_label_points_past_the_end() {
        let (insts, labels) = run("B end\nend:").unwrap();
        assert_eq!(insts.len(), 1);
        assert_eq!(labels.get("end"), Some(1));
    }

    #[test]
    fn duplicate_symbolic_label() {
        let err = run("x: NOP\nx: HLT").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateLabel("x".into()));
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.notes[0].1.line, 1);
    }

    #[test]
    fn numeric_labels_resolve_by_direction() {
        let (insts, _) = run("1: NOP\nB 1b\nB 1f\n1: NOP\nB 1b").unwrap();
        let targets: Vec<&str> = [1, 2, 4]
            .iter()
            .map(|&i| insts[i].operands[0].text.as_str())
            .collect();
        assert_eq!(targets, vec!["0", "3", "3"]);
    }

    #[test]
    fn numeric_labels_must_be_in_address_order() {
        let label = Token::new("4", TokenKind::LabelNumeric, Site::synthetic());
        let mut labels = Labels::new();
        labels.define(&label, 5).unwrap();
        labels.define(&label, 2).unwrap();
        let err = labels.resolve_local('4', Dir::Back, 9).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::LabelOrder {
                digit: '4',
                prev: 5,
                next: 2
            }
        );
        assert_eq!(err.category(), Category::Structural);
    }

    #[test]
    fn backward_includes_own_address() {
        let (insts, _) = run("1: B 1b").unwrap();
        assert_eq!(insts[0].operands[0].text, "0");
    }

    #[test]
    fn forward_is_strictly_after() {
        let err = run("1: B 1f").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoForwardLabel('1'));
    }

    #[test]
    fn missing_backward_label() {
        let err = run("B 2b\n2: NOP").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoBackwardLabel('2'));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let err = run("MOV R0, ünd").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownToken("ünd".into()));
    }

    #[test]
    fn unused_labels_are_reported() {
        let (_, labels) = run("a: NOP\nb: NOP\n1: NOP\nB a").unwrap();
        let warning = labels.unused().unwrap();
        assert_eq!(warning.symbolic.len(), 1);
        assert_eq!(warning.symbolic[0].0, "b");
        assert_eq!(warning.numeric[0].0, '1');
    }
}
