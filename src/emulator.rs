//! The virtual machine and everything it is built from.

pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod output;
pub mod pacer;
pub mod registers;
pub mod timers;

pub use self::emulator::Emulator;
pub use self::error::{Fault, LoadError};
pub use self::pacer::{Pacer, PacerConfig, RunSummary};
