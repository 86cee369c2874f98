use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

// Index 0 is never transmitted on a circuit network, so R0 starts at 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Reg {
    R0 = 1,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    #[strum(to_string = "R15", serialize = "SP")]
    R15,
}

impl Reg {
    /// Stack pointer used by `PUSH` / `POP`.
    pub const SP: Reg = Reg::R15;

    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    /// Value placed on the wire for this register.
    pub fn index(self) -> i32 {
        u8::from(self) as i32
    }
}
