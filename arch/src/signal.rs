use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Signal name to value, one per instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals(IndexMap<String, i32>);

impl Signals {
    pub fn new() -> Self {
        Signals(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i32) -> Option<i32> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Merge `other` into `self`, later values win.
    pub fn merge(&mut self, other: Signals) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for Signals {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        Signals(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ----------------------------------------------------------------------------
// Template

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Lit(i32),
    /// Filled with the resolved operand value.
    Fill,
}

impl From<i32> for Slot {
    fn from(v: i32) -> Self {
        Slot::Lit(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Vec<(&'static str, Slot)>);

impl Template {
    pub fn new(entries: Vec<(&'static str, Slot)>) -> Self {
        Template(entries)
    }

    pub fn fill(&self, value: i32) -> Signals {
        self.0
            .iter()
            .map(|(name, slot)| match slot {
                Slot::Lit(v) => (*name, *v),
                Slot::Fill => (*name, value),
            })
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }
}

/// `tmpl!{"signal-K" => 1, "signal-0" => V}` where `V` marks the filled slot.
#[macro_export]
macro_rules! tmpl {
    ($($name:literal => $val:expr),* $(,)?) => {
        $crate::signal::Template::new(vec![$(($name, $crate::signal::Slot::from($val))),*])
    };
}

/// Literal signal dictionary.
#[macro_export]
macro_rules! signals {
    ($($name:literal => $val:expr),* $(,)?) => {
        $crate::signal::Signals::from_iter([$(($name, $val as i32)),*])
    };
}
