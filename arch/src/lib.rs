pub mod op;
pub mod operand;
pub mod reg;
pub mod signal;
pub mod table;

pub use op::Op;
pub use operand::{Operand, OperandKind};
pub use reg::Reg;
pub use signal::{Signals, Slot, Template};
pub use table::{Encoding, OpTable};
