use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
}

/// Circuit connection point. Combinators have an input (1) and output (2) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Side {
    pub fn circuit_id(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub entity_id: u32,
    pub circuit_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Item,
    Virtual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalId {
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub signal: SignalId,
    pub count: i32,
    pub index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_number: u32,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_behavior: Option<ControlBehavior>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connections: BTreeMap<Side, BTreeMap<Color, Vec<Wire>>>,
}

impl Entity {
    pub fn new(entity_number: u32, name: &str, x: f64, y: f64) -> Self {
        Entity {
            entity_number,
            name: name.to_string(),
            position: Position { x, y },
            direction: None,
            control_behavior: None,
            connections: BTreeMap::new(),
        }
    }

    /// Wires attached to `side` in `color`.
    pub fn wires(&self, side: Side, color: Color) -> &[Wire] {
        self.connections
            .get(&side)
            .and_then(|colors| colors.get(&color))
            .map(|w| w.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn attach(&mut self, side: Side, color: Color, wire: Wire) {
        self.connections
            .entry(side)
            .or_default()
            .entry(color)
            .or_default()
            .push(wire);
    }

    pub fn filters(&self) -> &[Filter] {
        self.control_behavior
            .as_ref()
            .and_then(|cb| cb.filters.as_deref())
            .unwrap_or(&[])
    }

    pub(crate) fn set_filters(&mut self, filters: Vec<Filter>) {
        self.control_behavior
            .get_or_insert_with(ControlBehavior::default)
            .filters = Some(filters);
    }
}
