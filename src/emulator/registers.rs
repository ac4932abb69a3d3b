use crate::emulator::error::Fault;
use crate::emulator::memory::PROGRAM_START;

pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;

/// Index of the register doubling as carry, borrow and collision flag.
pub const VF: u8 = 0xF;

/// Frames a register or stack slot stays highlighted after a write.
pub const HIGHLIGHT_FRAMES: u8 = 60;

/// General purpose registers, the address register `I`, the program counter
/// and the call stack.
///
/// Every write to a register or stack slot marks it with a highlight that
/// decays once per frame. The highlights are only there for debug overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
    register_highlight: [u8; NUM_REGISTERS],
    stack_highlight: [u8; STACK_SIZE],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_SIZE],
            register_highlight: [0; NUM_REGISTERS],
            stack_highlight: [0; STACK_SIZE],
        }
    }

    pub fn get(&self, index: u8) -> u8 {
        self.v[(index & 0xF) as usize]
    }

    pub fn set(&mut self, index: u8, value: u8) {
        let index = (index & 0xF) as usize;
        self.v[index] = value;
        self.register_highlight[index] = HIGHLIGHT_FRAMES;
    }

    pub fn flag(&self) -> u8 {
        self.get(VF)
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set(VF, on as u8);
    }

    /// Push a return address. The call stack holds at most 16 frames.
    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp == STACK_SIZE {
            return Err(Fault::StackOverflow { address: self.pc });
        }
        self.stack[self.sp] = addr;
        self.stack_highlight[self.sp] = HIGHLIGHT_FRAMES;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow { address: self.pc });
        }
        self.sp -= 1;
        self.stack_highlight[self.sp] = 0;
        Ok(self.stack[self.sp])
    }

    pub fn stack_pointer(&self) -> usize {
        self.sp
    }

    /// The occupied part of the stack, oldest frame first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.v
    }

    pub fn register_highlight(&self) -> &[u8; NUM_REGISTERS] {
        &self.register_highlight
    }

    pub fn stack_highlight(&self) -> &[u8; STACK_SIZE] {
        &self.stack_highlight
    }

    /// Called once per frame.
    pub fn decay_highlights(&mut self) {
        for counter in self
            .register_highlight
            .iter_mut()
            .chain(self.stack_highlight.iter_mut())
        {
            *counter = counter.saturating_sub(1);
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
