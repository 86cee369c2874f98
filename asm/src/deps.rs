// Macro dependency graph and cycle detection.

use crate::{
    error::{Error, ErrorKind},
    macros::{Macro, Macros},
};
use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// For each macro (by declaration index), the macros its body names.
pub fn graph(macros: &Macros) -> Result<Vec<IndexSet<usize>>, Error> {
    macros
        .iter()
        .map(|m| {
            let mut deps = IndexSet::new();
            for tok in m.body.iter().flatten() {
                if tok.text == m.name {
                    return Err(Error::at(ErrorKind::SelfReference(m.name.clone()), tok));
                }
                if let Some(idx) = macros.index_of(&tok.text) {
                    deps.insert(idx);
                }
            }
            Ok(deps)
        })
        .collect()
}

/// Depth-first search with an explicit stack. Reports the first cycle as
/// `A => B => A`.
pub fn check(macros: &Macros) -> Result<(), Error> {
    let deps = graph(macros)?;
    let mut mark = vec![Mark::Unvisited; deps.len()];
    let mut parent: Vec<Option<usize>> = vec![None; deps.len()];

    for root in 0..deps.len() {
        if mark[root] != Mark::Unvisited {
            continue;
        }
        mark[root] = Mark::OnPath;
        let mut stack = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&next) = deps[node].get_index(frame.1) else {
                mark[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;
            match mark[next] {
                Mark::Unvisited => {
                    mark[next] = Mark::OnPath;
                    parent[next] = Some(node);
                    stack.push((next, 0));
                }
                Mark::OnPath => return Err(cycle(macros, &parent, node, next)),
                Mark::Done => {}
            }
        }
    }
    Ok(())
}

fn cycle(macros: &Macros, parent: &[Option<usize>], from: usize, to: usize) -> Error {
    // indices come from `graph`, one per macro
    let all: Vec<&Macro> = macros.iter().collect();
    let mut path = vec![all[to].name.as_str()];
    let mut cur = Some(from);
    while let Some(idx) = cur {
        path.push(&all[idx].name);
        if idx == to {
            break;
        }
        cur = parent[idx];
    }
    path.reverse();
    Error::at(ErrorKind::MacroCycle(path.join(" => ")), &all[to].head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn check_src(src: &str) -> Result<(), Error> {
        check(&Macros::collect(&tokenize(src).unwrap()).unwrap())
    }

    #[test]
    fn acyclic_graph_passes() {
        let src = "#macro a 0\nb\nc\n#endm\n#macro b 0\nc\n#endm\n#macro c 0\nNOP\n#endm";
        assert!(check_src(src).is_ok());
    }

    #[test]
    fn graph_lists_dependencies_once() {
        let src = "#macro a 0\nb\nb\n#endm\n#macro b 0\nNOP\n#endm";
        let macros = Macros::collect(&tokenize(src).unwrap()).unwrap();
        let deps = graph(&macros).unwrap();
        assert_eq!(deps[0].len(), 1);
        assert!(deps[1].is_empty());
    }

    #[test]
    fn self_reference() {
        let err = check_src("#macro a 0\nNOP\na\n#endm").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SelfReference("a".into()));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn two_cycle_path() {
        let err = check_src("#macro A 0\nB\n#endm\n#macro B 0\nA\n#endm").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MacroCycle("A => B => A".into()));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn longer_cycle_path() {
        let src = "#macro x 0\nNOP\n#endm\n#macro a 0\nb\n#endm\n#macro b 0\nc\nx\n#endm\n#macro c 0\na\n#endm";
        let err = check_src(src).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MacroCycle("a => b => c => a".into()));
    }
}
