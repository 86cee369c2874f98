//! `#macro name N` .. `#endm` blocks and their expansion.
//!
//! Inside a body, `$0`..`$N-1` stand for the call's arguments. Bodies may
//! invoke other macros; cycles are rejected up front by [`crate::deps`].

use crate::{
    deps,
    error::{Error, ErrorKind},
    token::{label_prefix, Line, Token, TokenKind},
};
use indexmap::IndexMap;

pub const MAX_ROUNDS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub params: usize,
    /// The `#macro` token.
    pub head: Token,
    /// Line indices of `#macro` and `#endm`.
    pub start: usize,
    pub end: usize,
    pub body: Vec<Line>,
}

#[derive(Debug, Clone, Default)]
pub struct Macros(IndexMap<String, Macro>);

impl Macros {
    /// Find every macro declaration without changing `lines`.
    pub fn collect(lines: &[Line]) -> Result<Self, Error> {
        let mut macros = IndexMap::new();
        let mut open: Option<Macro> = None;

        for (idx, line) in lines.iter().enumerate() {
            let head = &line[0];
            if head.is_directive("#macro") {
                if open.is_some() {
                    return Err(Error::at(ErrorKind::NestedMacro, head));
                }
                let [_, name, params] = line.as_slice() else {
                    return Err(Error::at(ErrorKind::MacroHeader, head));
                };
                if macros.contains_key(&name.text) {
                    return Err(Error::at(ErrorKind::DuplicateMacro(name.text.clone()), name));
                }
                let count = params
                    .text
                    .parse::<usize>()
                    .map_err(|_| Error::at(ErrorKind::MacroParamCount(params.text.clone()), params))?;
                open = Some(Macro {
                    name: name.text.clone(),
                    params: count,
                    head: head.clone(),
                    start: idx,
                    end: idx,
                    body: vec![],
                });
            } else if head.is_directive("#endm") {
                let mut m = open
                    .take()
                    .ok_or_else(|| Error::at(ErrorKind::UnmatchedEndm, head))?;
                m.end = idx;
                macros.insert(m.name.clone(), m);
            } else if let Some(m) = open.as_mut() {
                if let Some(label) = line.iter().find(|t| t.kind == TokenKind::LabelSymbolic) {
                    return Err(Error::at(ErrorKind::LabelInMacro(label.text.clone()), label));
                }
                m.body.push(line.clone());
            }
        }

        match open {
            Some(m) => Err(Error::at(ErrorKind::MissingEndm(m.name.clone()), &m.head)),
            None => Ok(Macros(macros)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.0.get(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.get_index_of(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.0.values()
    }

    /// Delete every declaration block, bottom-most first so indices stay valid.
    pub fn strip(&self, lines: &mut Vec<Line>) {
        let mut blocks: Vec<_> = self.iter().map(|m| (m.start, m.end)).collect();
        blocks.sort_by(|a, b| b.0.cmp(&a.0));
        for (start, end) in blocks {
            lines.drain(start..=end);
        }
    }

    /// The macro called on `line` and the position of its name,
    /// skipping any leading labels.
    fn invoked_by<'a>(&'a self, line: &[Token]) -> Option<(&'a Macro, usize)> {
        let at = label_prefix(line) * 2;
        let tok = line.get(at)?;
        if tok.is_delimiter() {
            return None;
        }
        self.get(&tok.text).map(|m| (m, at))
    }

    /// Replace one invocation line with the macro body.
    fn expand_line(&self, m: &Macro, mut line: Line, at: usize) -> Result<Vec<Line>, Error> {
        let tail = line.split_off(at);
        let name = &tail[0];
        let args: Vec<&Token> = tail[1..].iter().filter(|t| !t.is_delimiter()).collect();
        if args.len() != m.params {
            return Err(Error::at(
                ErrorKind::MacroArgCount {
                    name: m.name.clone(),
                    expected: m.params,
                    found: args.len(),
                },
                name,
            ));
        }

        let mut out = Vec::with_capacity(m.body.len() + 1);
        // Labels in front of the call keep their own line.
        if !line.is_empty() {
            out.push(line);
        }
        for body_line in &m.body {
            let expanded = body_line
                .iter()
                .map(|tok| instantiate(m, tok, name, &args))
                .collect::<Result<Line, Error>>()?;
            out.push(expanded);
        }
        Ok(out)
    }
}

/// Clone a body token into the call site, substituting `$N` placeholders.
fn instantiate(m: &Macro, tok: &Token, call: &Token, args: &[&Token]) -> Result<Token, Error> {
    let (text, site) = match tok.text.strip_prefix('$') {
        Some(idx) => {
            let idx: usize = idx.parse().map_err(|_| {
                Error::at(ErrorKind::BadParam(tok.text.clone()), tok)
                    .note("invoked here", call.site.clone())
            })?;
            let arg = args.get(idx).ok_or_else(|| {
                Error::at(
                    ErrorKind::ParamOutOfRange {
                        param: tok.text.clone(),
                        name: m.name.clone(),
                        params: m.params,
                    },
                    tok,
                )
                .note("invoked here", call.site.clone())
            })?;
            (arg.text.clone(), arg.site.clone())
        }
        None => (tok.text.clone(), call.site.clone()),
    };
    Ok(Token {
        text,
        kind: tok.kind,
        site,
        origin: Some(tok.site.clone()),
    })
}

/// Collect, check, strip and expand all macros.
pub fn expand(lines: Vec<Line>) -> Result<Vec<Line>, Error> {
    let macros = Macros::collect(&lines)?;
    deps::check(&macros)?;
    let mut lines = lines;
    macros.strip(&mut lines);
    expand_with(&macros, lines, MAX_ROUNDS)
}

/// Rewrite invocations last to first until a round changes nothing.
pub fn expand_with(macros: &Macros, mut lines: Vec<Line>, max_rounds: usize) -> Result<Vec<Line>, Error> {
    if macros.is_empty() {
        return Ok(lines);
    }
    for _ in 0..max_rounds {
        let mut changed = false;
        let mut idx = lines.len();
        while idx > 0 {
            idx -= 1;
            if let Some((m, at)) = macros.invoked_by(&lines[idx]) {
                let line = std::mem::take(&mut lines[idx]);
                let expanded = macros.expand_line(m, line, at)?;
                lines.splice(idx..=idx, expanded);
                changed = true;
            }
        }
        if !changed {
            return Ok(lines);
        }
    }
    let pending = lines
        .iter()
        .find_map(|line| macros.invoked_by(line).map(|(_, at)| &line[at]));
    match pending {
        Some(call) => Err(Error::at(ErrorKind::ExpansionLimit(max_rounds), call)),
        None => Ok(lines),
    }
}
