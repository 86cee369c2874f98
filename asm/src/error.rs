use crate::{
    msg::Msg,
    token::{Site, Token},
};
use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Malformed source text.
    Syntax,
    /// Well-formed lines whose macros or labels cannot be laid out.
    Structural,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Tokenizer
    #[error("Missing label before `:`")]
    MissingLabel,

    #[error("Invalid label `{0}`")]
    InvalidLabel(String),

    #[error("Unrecognized token `{0}`")]
    UnknownToken(String),

    // Macros
    #[error("Can't define a macro within another macro")]
    NestedMacro,

    #[error("Macro declaration needs a name and a parameter count, e.g. `#macro name 2`")]
    MacroHeader,

    #[error("Macro `{0}` is already defined")]
    DuplicateMacro(String),

    #[error("Parameter count must be a non-negative integer, found `{0}`")]
    MacroParamCount(String),

    #[error("`#endm` without a matching `#macro`")]
    UnmatchedEndm,

    #[error("Missing `#endm` for macro `{0}`")]
    MissingEndm(String),

    #[error("Only numeric labels are allowed inside a macro, found `{0}`")]
    LabelInMacro(String),

    #[error("Macro `{0}` references itself")]
    SelfReference(String),

    #[error("Cyclic macro dependency: {0}")]
    MacroCycle(String),

    #[error("Macro `{name}` takes {expected} argument(s), found {found}")]
    MacroArgCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid macro parameter `{0}`, expected `$N`")]
    BadParam(String),

    #[error("Macro parameter `{param}` out of range, `{name}` takes {params} argument(s)")]
    ParamOutOfRange {
        param: String,
        name: String,
        params: usize,
    },

    #[error("Macro expansion did not settle after {0} rounds")]
    ExpansionLimit(usize),

    // Definitions
    #[error("Definition needs a key and a value, e.g. `#def key value`")]
    Definition,

    // Labels
    #[error("Label `{0}` was previously defined")]
    DuplicateLabel(String),

    #[error("No backward label `{0}` found")]
    NoBackwardLabel(char),

    #[error("No forward label `{0}` found")]
    NoForwardLabel(char),

    #[error("Numeric labels `{digit}` out of address order: {prev} before {next}")]
    LabelOrder { digit: char, prev: usize, next: usize },

    // Encoder
    #[error("Unknown opcode `{0}`")]
    UnknownOpcode(String),

    #[error("Incorrect number of operands for `{op}`: expected {expected}, found {found}")]
    OperandCount {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown register `{0}`")]
    UnknownRegister(String),

    #[error("Invalid number `{0}`, must be on format [-][0x|0b]nnnn")]
    InvalidImmediate(String),

    #[error("Immediate `{0}` does not fit in 32 bits")]
    ImmediateRange(String),

    #[error("Expected register or immediate, found `{0}`")]
    InvalidOperand(String),

    #[error("Can't open a bracket within another bracket")]
    NestedBracket,

    #[error("Closing bracket without opening bracket")]
    UnopenedBracket,

    #[error("Empty bracket")]
    EmptyBracket,

    #[error("Did not close bracket")]
    UnclosedBracket,

    #[error("Bracket holds at most a register and an immediate")]
    BracketItems,

    #[error("Expected a bracketed operand, e.g. `[R1, 2]`")]
    ExpectedBracket,

    #[error("Bracketed operand not allowed here")]
    UnexpectedBracket,
}

impl ErrorKind {
    pub fn category(&self) -> Category {
        use ErrorKind::*;
        match self {
            SelfReference(_) | MacroCycle(_) | LabelOrder { .. } | MissingEndm(_)
            | ExpansionLimit(_) => Category::Structural,
            _ => Category::Syntax,
        }
    }
}

/// A fatal diagnostic. Every stage stops at the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub site: Option<Site>,
    pub notes: Vec<(String, Site)>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            site: None,
            notes: vec![],
        }
    }

    /// Error pointing at `token`, with a note on the macro body line it came from.
    pub fn at(kind: ErrorKind, token: &Token) -> Self {
        let err = Error {
            kind,
            site: Some(token.site.clone()),
            notes: vec![],
        };
        match &token.origin {
            Some(origin) => err.note("expanded from macro body", origin.clone()),
            None => err,
        }
    }

    pub fn note(mut self, msg: impl Into<String>, site: Site) -> Self {
        self.notes.push((msg.into(), site));
        self
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn line(&self) -> Option<usize> {
        self.site.as_ref().map(|s| s.line)
    }

    pub fn render(&self, file: &str) -> String {
        let mut out =
            Msg::Error(Some(self.category()), self.kind.to_string()).render(file, self.site.as_ref());
        for (msg, site) in &self.notes {
            out += &Msg::Note(msg.clone()).render(file, Some(site));
        }
        out
    }

    pub fn diag(&self, file: &str) {
        print!("{}", self.render(file));
    }
}

/// Labels that were declared but never referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warning {
    pub symbolic: Vec<(String, Site)>,
    pub numeric: Vec<(char, Site)>,
}

impl Warning {
    pub fn is_empty(&self) -> bool {
        self.symbolic.is_empty() && self.numeric.is_empty()
    }

    pub fn message(&self) -> String {
        let names: Vec<String> = self
            .symbolic
            .iter()
            .map(|(name, site)| format!("`{}` (line {})", name, site.line))
            .chain(
                self.numeric
                    .iter()
                    .map(|(digit, site)| format!("`{}` (line {})", digit, site.line)),
            )
            .collect();
        format!("Unused label(s): {}", names.join(", "))
    }

    pub fn diag(&self, file: &str) {
        Msg::Warn(self.message()).print(file, None);
    }
}
