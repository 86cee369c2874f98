//! Assembler for the PROM computer.
//!
//! Source text flows through [`lexer`], [`macros`], [`define`], [`label`]
//! and [`encode`], producing one signal set per instruction. The `prom`
//! crate turns those into a blueprint.

pub mod define;
pub mod deps;
pub mod encode;
pub mod error;
pub mod inst;
pub mod label;
pub mod lexer;
pub mod literal;
pub mod macros;
pub mod msg;
pub mod token;
pub mod util;

pub use encode::Encoder;
pub use error::{Category, Error, ErrorKind, Warning};
pub use inst::Instruction;
pub use token::{Line, Site, Token, TokenKind};

use arch::{OpTable, Signals};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Append `HLTG` after the last instruction.
    pub append_halt: bool,
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub instructions: Vec<Instruction>,
    pub signals: Vec<Signals>,
    pub warning: Option<Warning>,
}

/// Reported after each preprocessing stage finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Tokenized { lines: usize },
    Expanded { lines: usize },
    Substituted { lines: usize },
    Resolved { labels: usize, instructions: usize },
}

/// Everything up to and including label resolution.
pub fn preprocess(code: &str, opts: &Options) -> Result<(Vec<Instruction>, Option<Warning>), Error> {
    preprocess_with(code, opts, |_| {})
}

pub fn preprocess_with(
    code: &str,
    opts: &Options,
    mut report: impl FnMut(Progress),
) -> Result<(Vec<Instruction>, Option<Warning>), Error> {
    let lines = lexer::tokenize(code)?;
    report(Progress::Tokenized { lines: lines.len() });
    let lines = macros::expand(lines)?;
    report(Progress::Expanded { lines: lines.len() });
    let lines = define::substitute(lines)?;
    report(Progress::Substituted { lines: lines.len() });
    let (mut instructions, labels) = label::resolve(lines)?;
    if opts.append_halt {
        instructions.push(Instruction::halt());
    }
    report(Progress::Resolved {
        labels: labels.len(),
        instructions: instructions.len(),
    });
    Ok((instructions, labels.unused()))
}

pub fn assemble(code: &str, table: &OpTable, opts: &Options) -> Result<Assembly, Error> {
    let (instructions, warning) = preprocess(code, opts)?;
    let signals = Encoder::new(table).encode_all(&instructions)?;
    Ok(Assembly {
        instructions,
        signals,
        warning,
    })
}
