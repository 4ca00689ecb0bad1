//! Display drivers

pub mod memlcd;

pub use memlcd::{MemLcdError, MemoryLcd};
