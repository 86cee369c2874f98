use crate::{entity::Entity, error::Error};
use serde::Deserialize;

const ROW_JSON: &str = include_str!("../assets/row.json");

const COUNTER: &str = "arithmetic-combinator";
const LAMP: &str = "small-lamp";
const STORAGE: &str = "constant-combinator";
const DECIDER: &str = "decider-combinator";

#[derive(Deserialize)]
struct Raw {
    entities: Vec<Entity>,
}

/// The four entities of one ROM row.
#[derive(Debug, Clone)]
pub struct RowTemplate {
    pub counter: Entity,
    pub lamp: Entity,
    pub storage: Entity,
    pub decider: Entity,
}

impl RowTemplate {
    pub fn standard() -> Result<Self, Error> {
        Self::from_json(ROW_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: Raw = serde_json::from_str(json)?;
        if raw.entities.len() != 4 {
            return Err(Error::Template(format!(
                "expected 4 entities, found {}",
                raw.entities.len()
            )));
        }

        let take = |name: &str| {
            raw.entities
                .iter()
                .find(|e| e.name == name)
                .cloned()
                .ok_or_else(|| Error::Template(format!("missing `{}`", name)))
        };
        let template = RowTemplate {
            counter: take(COUNTER)?,
            lamp: take(LAMP)?,
            storage: take(STORAGE)?,
            decider: take(DECIDER)?,
        };

        if !template.storage.filters().is_empty() {
            return Err(Error::Template(format!("`{}` must not carry filters", STORAGE)));
        }
        Ok(template)
    }
}
