// Program ROM blueprint: one wired row of combinators per instruction.

use crate::{
    entity::{Color, Entity, Filter, SignalId, SignalType, Side, Wire},
    error::Error,
    template::RowTemplate,
};
use arch::Signals;
use serde::Serialize;

pub const DEFAULT_LABEL: &str = "Program - PROM";

const MAP_VERSION: u64 = 64427130880;
const ITEM_SIGNALS: [&str; 4] = ["copper-ore", "copper-plate", "iron-ore", "iron-plate"];
const WALLS: [(f64, f64); 6] = [(-4., -1.), (-4., 0.), (-3., -1.), (2., -1.), (3., 0.), (3., -1.)];

#[derive(Debug, Clone, Serialize)]
struct Icon {
    signal: SignalId,
    index: u32,
}

#[derive(Debug, Clone, Serialize)]
struct Document {
    label: String,
    item: String,
    version: u64,
    icons: Vec<Icon>,
    entities: Vec<Entity>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    blueprint: &'a Document,
}

/// Indices into the entity list of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub counter: usize,
    pub lamp: usize,
    pub storage: usize,
    pub decider: usize,
}

#[derive(Debug, Clone)]
pub struct Blueprint {
    doc: Document,
    rows: Vec<Row>,
    next_number: u32,
    pc_input: usize,
    rom_output: usize,
}

impl Blueprint {
    pub fn new(label: &str) -> Self {
        let icons = "PROM"
            .chars()
            .zip(1..)
            .map(|(ch, index)| Icon {
                signal: SignalId {
                    kind: SignalType::Virtual,
                    name: format!("signal-{}", ch),
                },
                index,
            })
            .collect();
        let mut bp = Blueprint {
            doc: Document {
                label: label.to_string(),
                item: "blueprint".to_string(),
                version: MAP_VERSION,
                icons,
                entities: vec![],
            },
            rows: vec![],
            next_number: 1,
            pc_input: 0,
            rom_output: 0,
        };
        for (x, y) in WALLS {
            bp.place(Entity::new(0, "stone-wall", x, y));
        }
        bp.pc_input = bp.place(Entity::new(0, "small-lamp", -1., -2.));
        bp.rom_output = bp.place(Entity::new(0, "small-lamp", 2., -2.));
        bp
    }

    /// Build a complete ROM holding `signals`, one row each.
    pub fn rom(label: &str, signals: &[Signals]) -> Result<Self, Error> {
        let template = RowTemplate::standard()?;
        let mut bp = Blueprint::new(label);
        bp.generate_rows(&template, signals.len());
        bp.insert_signals(signals)?;
        Ok(bp)
    }

    pub fn label(&self) -> &str {
        &self.doc.label
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn entities(&self) -> &[Entity] {
        &self.doc.entities
    }

    pub fn entity(&self, idx: usize) -> &Entity {
        &self.doc.entities[idx]
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&Envelope {
            blueprint: &self.doc,
        })?)
    }

    fn place(&mut self, mut entity: Entity) -> usize {
        entity.entity_number = self.next_number;
        self.next_number += 1;
        self.doc.entities.push(entity);
        self.doc.entities.len() - 1
    }

    fn connect(&mut self, a: usize, side_a: Side, b: usize, side_b: Side, color: Color) {
        let id_a = self.doc.entities[a].entity_number;
        let id_b = self.doc.entities[b].entity_number;
        self.doc.entities[a].attach(
            side_a,
            color,
            Wire {
                entity_id: id_b,
                circuit_id: side_b.circuit_id(),
            },
        );
        self.doc.entities[b].attach(
            side_b,
            color,
            Wire {
                entity_id: id_a,
                circuit_id: side_a.circuit_id(),
            },
        );
    }

    /// Append `count` rows below the existing ones and wire them in.
    pub fn generate_rows(&mut self, template: &RowTemplate, count: usize) {
        for _ in 0..count {
            let y = self.rows.len() as f64;
            let instance = |proto: &Entity| {
                let mut e = proto.clone();
                e.position.y = y;
                e
            };
            let (counter, lamp, storage, decider) = (
                instance(&template.counter),
                instance(&template.lamp),
                instance(&template.storage),
                instance(&template.decider),
            );
            let row = Row {
                counter: self.place(counter),
                lamp: self.place(lamp),
                storage: self.place(storage),
                decider: self.place(decider),
            };
            let prev = self.rows.last().copied();

            // Address compare chain
            if let Some(prev) = prev {
                self.connect(row.counter, Side::One, prev.counter, Side::Two, Color::Red);
            }

            self.connect(row.counter, Side::One, row.lamp, Side::One, Color::Red);
            self.connect(row.lamp, Side::One, row.decider, Side::One, Color::Red);
            self.connect(row.storage, Side::One, row.decider, Side::One, Color::Red);

            // Program counter broadcast
            let prev_lamp = prev.map(|p| p.lamp).unwrap_or(self.pc_input);
            self.connect(row.lamp, Side::One, prev_lamp, Side::One, Color::Green);
            self.connect(row.lamp, Side::One, row.decider, Side::One, Color::Green);

            // ROM output chain
            let (prev_out, prev_side) = match prev {
                Some(p) => (p.decider, Side::Two),
                None => (self.rom_output, Side::One),
            };
            self.connect(row.decider, Side::Two, prev_out, prev_side, Color::Green);

            self.rows.push(row);
        }
    }

    /// Fill every storage entity with its instruction's signals.
    pub fn insert_signals(&mut self, signals: &[Signals]) -> Result<(), Error> {
        if signals.len() != self.rows.len() {
            return Err(Error::RowCount(self.rows.len(), signals.len()));
        }
        for (row, sigs) in self.rows.iter().zip(signals) {
            let filters = sigs
                .iter()
                .zip(1..)
                .map(|((name, count), index)| Filter {
                    signal: SignalId {
                        kind: if ITEM_SIGNALS.contains(&name) {
                            SignalType::Item
                        } else {
                            SignalType::Virtual
                        },
                        name: name.to_string(),
                    },
                    count,
                    index,
                })
                .collect();
            self.doc.entities[row.storage].set_filters(filters);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::signals;

    fn wire(bp: &Blueprint, idx: usize, circuit_id: u8) -> Wire {
        Wire {
            entity_id: bp.entity(idx).entity_number,
            circuit_id,
        }
    }

    #[test]
    fn prelude_only_for_empty_program() {
        let bp = Blueprint::rom(DEFAULT_LABEL, &[]).unwrap();
        assert!(bp.rows().is_empty());
        assert_eq!(bp.entities().len(), 8);
        assert_eq!(bp.entities()[0].entity_number, 1);
        assert_eq!(bp.entities()[7].entity_number, 8);
    }

    #[test]
    fn rows_are_numbered_and_placed() {
        let sigs = vec![Signals::new(), Signals::new(), Signals::new()];
        let bp = Blueprint::rom(DEFAULT_LABEL, &sigs).unwrap();
        assert_eq!(bp.rows().len(), 3);
        assert_eq!(bp.entities().len(), 8 + 12);
        for (i, row) in bp.rows().iter().enumerate() {
            for idx in [row.counter, row.lamp, row.storage, row.decider] {
                assert_eq!(bp.entity(idx).position.y, i as f64);
            }
        }
        assert_eq!(bp.entity(bp.rows()[0].counter).entity_number, 9);
    }

    #[test]
    fn chains_link_consecutive_rows() {
        let sigs = vec![Signals::new(), Signals::new()];
        let bp = Blueprint::rom(DEFAULT_LABEL, &sigs).unwrap();
        let (r0, r1) = (bp.rows()[0], bp.rows()[1]);

        // counter chain is absent on the first row
        assert!(bp.entity(r0.counter).wires(Side::One, Color::Red).len() == 1);
        assert!(bp
            .entity(r1.counter)
            .wires(Side::One, Color::Red)
            .contains(&wire(&bp, r0.counter, 2)));
        assert_eq!(
            bp.entity(r0.counter).wires(Side::Two, Color::Red),
            &[wire(&bp, r1.counter, 1)]
        );

        // lamps form the program counter bus
        assert!(bp
            .entity(r0.lamp)
            .wires(Side::One, Color::Green)
            .contains(&wire(&bp, 6, 1)));
        assert!(bp
            .entity(r1.lamp)
            .wires(Side::One, Color::Green)
            .contains(&wire(&bp, r0.lamp, 1)));

        // first row lands on the output lamp's side 1, later rows on side 2
        assert_eq!(
            bp.entity(r0.decider).wires(Side::Two, Color::Green)[0],
            wire(&bp, 7, 1)
        );
        assert_eq!(
            bp.entity(r1.decider).wires(Side::Two, Color::Green)[0],
            wire(&bp, r0.decider, 2)
        );
    }

    #[test]
    fn filters_follow_signal_order() {
        let sigs = vec![signals! {"copper-plate" => 9, "signal-U" => 1, "signal-A" => -5}];
        let bp = Blueprint::rom(DEFAULT_LABEL, &sigs).unwrap();
        let filters = bp.entity(bp.rows()[0].storage).filters();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].signal.kind, SignalType::Item);
        assert_eq!(filters[0].index, 1);
        assert_eq!(filters[1].signal.kind, SignalType::Virtual);
        assert_eq!(filters[2].count, -5);
        assert_eq!(filters[2].index, 3);
    }

    #[test]
    fn row_count_must_match() {
        let template = RowTemplate::standard().unwrap();
        let mut bp = Blueprint::new(DEFAULT_LABEL);
        bp.generate_rows(&template, 2);
        assert!(matches!(
            bp.insert_signals(&[Signals::new()]),
            Err(Error::RowCount(2, 1))
        ));
    }

    #[test]
    fn json_has_blueprint_envelope() {
        let bp = Blueprint::rom("test", &[signals! {"signal-A" => 1}]).unwrap();
        assert_eq!(bp.label(), "test");
        let value: serde_json::Value = serde_json::from_str(&bp.to_json().unwrap()).unwrap();
        assert_eq!(value["blueprint"]["label"], "test");
        assert_eq!(value["blueprint"]["item"], "blueprint");
        assert_eq!(value["blueprint"]["icons"][0]["signal"]["name"], "signal-P");
        let entities = value["blueprint"]["entities"].as_array().unwrap();
        assert_eq!(entities.len(), 12);
        assert_eq!(
            entities[10]["control_behavior"]["filters"][0]["signal"]["type"],
            "virtual"
        );
        assert_eq!(entities[8]["connections"]["1"]["red"][0]["circuit_id"], 1);
    }
}
