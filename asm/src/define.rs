use crate::{
    error::{Error, ErrorKind},
    token::Line,
};
use indexmap::IndexMap;

/// Apply `#def key value` textual substitutions.
///
/// A definition only affects lines after it. Its own line is rewritten with
/// the definitions seen so far before being read, then dropped.
pub fn substitute(lines: Vec<Line>) -> Result<Vec<Line>, Error> {
    let mut defs: IndexMap<String, String> = IndexMap::new();
    let mut out = Vec::with_capacity(lines.len());

    for mut line in lines {
        for tok in line.iter_mut() {
            if let Some(value) = defs.get(&tok.text) {
                tok.text = value.clone();
            }
        }
        if !line[0].is_directive("#def") {
            out.push(line);
            continue;
        }
        match line.as_slice() {
            [_, key, value] if !key.is_delimiter() && !value.is_delimiter() => {
                defs.insert(key.text.clone(), value.text.clone());
            }
            [head, ..] => {
                let at = line[1..].iter().find(|t| t.is_delimiter()).unwrap_or(head);
                return Err(Error::at(ErrorKind::Definition, at));
            }
            [] => {}
        }
    }
    Ok(out)
}
