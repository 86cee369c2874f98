use crate::{
    op::Op,
    operand::Operand,
    reg::Reg,
    signal::{Signals, Slot, Template},
    signals, tmpl,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

const V: Slot = Slot::Fill;

/// Control signals plus operand grammar of one mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub control: Signals,
    pub operands: Vec<Operand>,
}

impl Encoding {
    fn new(control: Signals, operands: Vec<Operand>) -> Self {
        Encoding { control, operands }
    }
}

pub struct OpTable(IndexMap<Op, Encoding>);

static STANDARD: Lazy<OpTable> = Lazy::new(OpTable::build);

impl OpTable {
    /// The table of the PROM computer, built on first use.
    pub fn standard() -> &'static OpTable {
        &STANDARD
    }

    fn build() -> Self {
        OpTable(Op::iter().map(|op| (op, encoding(op))).collect())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, mnemonic: &str) -> Option<(Op, &Encoding)> {
        let op = Op::parse(mnemonic)?;
        self.0.get(&op).map(|enc| (op, enc))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Op, &Encoding)> {
        self.0.iter()
    }

    /// One line per mnemonic, e.g. `MOV R, R/I`.
    pub fn listing(&self) -> String {
        self.0
            .iter()
            .map(|(op, enc)| {
                let args: Vec<String> = enc.operands.iter().map(|o| o.kind().to_string()).collect();
                if args.is_empty() {
                    op.to_string()
                } else {
                    format!("{} {}", op, args.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ----------------------------------------------------------------------------
// Operand templates

fn dst() -> Operand {
    Operand::Register(tmpl! {"signal-U" => V})
}

fn src_a() -> Operand {
    Operand::RegisterOrImmediate {
        reg: tmpl! {"signal-K" => 1, "signal-0" => V},
        imm: tmpl! {"signal-A" => V},
    }
}

fn src_b() -> Operand {
    Operand::RegisterOrImmediate {
        reg: tmpl! {"signal-L" => 1, "signal-1" => V},
        imm: tmpl! {"signal-B" => V},
    }
}

fn addr() -> Operand {
    Operand::RegisterOrImmediateOrBoth {
        reg: tmpl! {"signal-K" => 1, "signal-0" => V},
        imm: tmpl! {"signal-A" => V},
    }
}

fn imm(name: &'static str) -> Operand {
    Operand::Immediate(Template::new(vec![(name, V)]))
}

fn alu(func: i32) -> Signals {
    signals! {
        "copper-plate" => 9,
        "signal-red" => 1,
        "signal-F" => func,
        "signal-2" => 1,
        "signal-3" => 1,
    }
}

fn encoding(op: Op) -> Encoding {
    let sp = Reg::SP.index();
    match op {
        Op::HLT => Encoding::new(Signals::new(), vec![]),
        Op::HLTG => Encoding::new(
            signals! {"copper-plate" => 6, "signal-cyan" => 1, "signal-A" => 1},
            vec![],
        ),
        Op::HLTB => Encoding::new(
            signals! {"copper-plate" => 6, "signal-cyan" => 1, "signal-A" => 2},
            vec![],
        ),
        Op::NOP => Encoding::new(signals! {"copper-plate" => 1}, vec![]),

        Op::STORE => Encoding::new(signals! {"copper-plate" => 2}, vec![src_b(), addr()]),
        Op::LOAD => Encoding::new(signals! {"copper-plate" => 4}, vec![dst(), addr()]),
        Op::PUSH => Encoding::new(
            signals! {
                "copper-plate" => 13,
                "signal-K" => 1,
                "signal-0" => sp,
                "signal-A" => 0,
                "signal-O" => -1,
                "signal-2" => 1,
                "signal-red" => 1,
                "signal-U" => sp,
            },
            vec![src_b()],
        ),
        Op::POP => Encoding::new(
            signals! {
                "copper-plate" => 16,
                "signal-K" => 1,
                "signal-0" => sp,
                "signal-A" => 1,
                "signal-2" => 1,
                "signal-red" => 1,
                "signal-V" => sp,
            },
            vec![dst()],
        ),

        Op::B => Encoding::new(signals! {"copper-plate" => 7}, vec![src_a()]),
        Op::BZ => Encoding::new(signals! {"copper-plate" => 7, "signal-C" => 1}, vec![src_a()]),
        Op::BN => Encoding::new(signals! {"copper-plate" => 7, "signal-C" => 2}, vec![src_a()]),

        Op::CMEM => Encoding::new(
            signals! {"copper-plate" => 12, "signal-grey" => 1, "signal-black" => 1},
            vec![],
        ),
        Op::CREG => Encoding::new(signals! {"copper-plate" => 12, "signal-grey" => 1}, vec![]),
        Op::CRAM => Encoding::new(signals! {"copper-plate" => 12, "signal-black" => 1}, vec![]),

        Op::ALU => Encoding::new(
            signals! {"copper-plate" => 9},
            vec![
                dst(),
                src_a(),
                src_b(),
                imm("signal-O"),
                imm("signal-2"),
                imm("signal-3"),
                imm("signal-F"),
                imm("signal-red"),
            ],
        ),
        Op::MOV => Encoding::new(
            signals! {"copper-plate" => 9, "signal-red" => 1, "signal-2" => 1, "signal-3" => 1},
            vec![dst(), src_a()],
        ),
        Op::ADD => Encoding::new(
            signals! {"copper-plate" => 9, "signal-red" => 1, "signal-2" => 1, "signal-3" => 1},
            vec![dst(), src_a(), src_b()],
        ),
        Op::SUB => Encoding::new(
            signals! {"copper-plate" => 9, "signal-red" => 1, "signal-2" => 1, "signal-3" => -1},
            vec![dst(), src_a(), src_b()],
        ),
        Op::INC | Op::DEC => Encoding::new(
            signals! {
                "copper-plate" => 9,
                "signal-red" => 1,
                "signal-2" => 1,
                "signal-3" => 1,
                "signal-B" => if op == Op::INC { 1 } else { -1 },
            },
            vec![Operand::Register(
                tmpl! {"signal-U" => V, "signal-K" => 1, "signal-0" => V},
            )],
        ),
        Op::CMP => Encoding::new(
            signals! {"copper-plate" => 9, "signal-2" => 1, "signal-3" => -1},
            vec![src_a(), src_b()],
        ),
        Op::TST => Encoding::new(signals! {"copper-plate" => 9, "signal-2" => 1}, vec![src_a()]),

        Op::MUL => Encoding::new(alu(1), vec![dst(), src_a(), src_b()]),
        Op::DIV => Encoding::new(alu(2), vec![dst(), src_a(), src_b()]),
        Op::POW => Encoding::new(alu(3), vec![dst(), src_a(), src_b()]),
        Op::MOD => Encoding::new(alu(4), vec![dst(), src_a(), src_b()]),
        Op::ASR => Encoding::new(alu(5), vec![dst(), src_a(), src_b()]),
        Op::LSL => Encoding::new(alu(6), vec![dst(), src_a(), src_b()]),
        Op::LSR => Encoding::new(alu(7), vec![dst(), src_a()]),
        Op::ROL => Encoding::new(alu(8), vec![dst(), src_a()]),
        Op::ROR => Encoding::new(alu(9), vec![dst(), src_a()]),
        Op::NOT => Encoding::new(alu(10), vec![dst(), src_a()]),
        Op::AND => Encoding::new(alu(11), vec![dst(), src_a(), src_b()]),
        Op::OR => Encoding::new(alu(12), vec![dst(), src_a(), src_b()]),
        Op::XOR => Encoding::new(alu(13), vec![dst(), src_a(), src_b()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_mnemonic_is_present() {
        let table = OpTable::standard();
        assert_eq!(table.len(), Op::iter().count());
        assert!(table.get("add").is_some());
        assert!(table.get("Store").is_some());
        assert!(table.get("JMP").is_none());
    }

    #[test]
    fn control_and_operand_keys_never_overlap() {
        for (op, enc) in OpTable::standard().iter() {
            let control: HashSet<&str> = enc.control.iter().map(|(k, _)| k).collect();
            let mut seen = HashSet::new();
            for operand in &enc.operands {
                let keys: HashSet<&str> = operand.keys().into_iter().collect();
                assert!(control.is_disjoint(&keys), "{op}: control overlaps operand");
                assert!(seen.is_disjoint(&keys), "{op}: operands overlap");
                seen.extend(keys);
            }
        }
    }

    #[test]
    fn listing_shows_operand_grammar() {
        let listing = OpTable::standard().listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert!(lines.contains(&"MOV R, R/I"));
        assert!(lines.contains(&"STORE R/I, [R/I/R,I]"));
        assert!(lines.contains(&"HLT"));
    }

    #[test]
    fn push_uses_stack_pointer() {
        let (_, enc) = OpTable::standard().get("push").unwrap();
        assert_eq!(enc.control.get("signal-0"), Some(Reg::SP.index()));
        assert_eq!(enc.control.get("signal-O"), Some(-1));
    }
}
