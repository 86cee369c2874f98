mod blueprint;
pub mod codec;
mod entity;
mod error;
mod template;

pub use blueprint::{Blueprint, Row, DEFAULT_LABEL};
pub use entity::{Color, Entity, Filter, SignalId, SignalType, Side, Wire};
pub use error::Error;
pub use template::RowTemplate;
