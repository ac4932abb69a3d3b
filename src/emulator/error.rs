use thiserror::Error;

/// A condition that stops the machine. Continuing after any of these
/// would mean executing data that was never meant to be code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06x} at {address:#05x}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("stack overflow: call at {address:#05x} exceeds 16 nested subroutines")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return at {address:#05x} with an empty call stack")]
    StackUnderflow { address: u16 },
}

/// Errors that can happen while copying a program image into memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("program image is {size} bytes, but at most {max} bytes fit after 0x200")]
    ImageTooLarge { size: usize, max: usize },
}

impl Fault {
    /// The address of the instruction that faulted.
    pub fn address(&self) -> u16 {
        match *self {
            Fault::UnknownOpcode { address, .. }
            | Fault::StackOverflow { address }
            | Fault::StackUnderflow { address } => address,
        }
    }

    pub(crate) fn at(self, address: u16) -> Fault {
        match self {
            Fault::UnknownOpcode { opcode, .. } => Fault::UnknownOpcode { opcode, address },
            Fault::StackOverflow { .. } => Fault::StackOverflow { address },
            Fault::StackUnderflow { .. } => Fault::StackUnderflow { address },
        }
    }
}
