//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use crate::emulator::error::{Fault, LoadError};
use crate::emulator::framebuffer::Framebuffer;
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::emulator::memory::{Memory, MEM_SIZE};
use crate::emulator::opcode::Opcode;
use crate::emulator::registers::RegisterFile;
use crate::emulator::timers::Timers;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PC_MASK: u16 = (MEM_SIZE - 1) as u16;

pub struct Emulator {
    memory: Memory,
    registers: RegisterFile,
    screen: Framebuffer,
    timers: Timers,
    keypad: Keypad,
    rng: StdRng,
    halted: Option<Fault>,
}

impl Emulator {
    /// Create a new emulator with the font loaded and no program.
    pub fn new() -> Emulator {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create an emulator whose random instruction is reproducible.
    pub fn with_seed(seed: u64) -> Emulator {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Emulator {
        Emulator {
            memory: Memory::new(),
            registers: RegisterFile::new(),
            screen: Framebuffer::new(),
            timers: Timers::default(),
            keypad: Keypad::new(),
            rng,
            halted: None,
        }
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load_image(program)?;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Put everything back the way `new` left it, keeping the random source.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers = RegisterFile::new();
        self.screen.clear();
        self.timers = Timers::default();
        self.keypad.release_all();
        self.halted = None;
    }

    /// Fetch, decode and execute the instruction at the program counter.
    ///
    /// Once a step has faulted the machine stays halted, and every later
    /// step returns the same fault without executing anything.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Some(fault) = self.halted {
            return Err(fault);
        }

        let address = self.registers.pc;
        let result = self.fetch().and_then(|instruction| {
            log::trace!("{:#05x}: {}", address, instruction);
            self.registers.pc = address.wrapping_add(2) & PC_MASK;
            self.execute_single(instruction)
        });

        result.map_err(|fault| {
            let fault = fault.at(address);
            self.registers.pc = address;
            self.halted = Some(fault);
            fault
        })
    }

    /// Run up to `count` steps, stopping at the first fault.
    pub fn run(&mut self, count: usize) -> Result<(), Fault> {
        for _ in 0..count {
            self.step()?;
        }
        Ok(())
    }

    fn fetch(&self) -> Result<Instruction, Fault> {
        let address = self.registers.pc;
        let opcode = Opcode(self.memory.read16(address));
        Instruction::decode(opcode).ok_or(Fault::UnknownOpcode {
            opcode: opcode.0,
            address,
        })
    }

    /// Execute many instructions in order, stopping at the first fault.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), Fault> {
        for instruction in instructions {
            self.execute_single(*instruction)?;
        }
        Ok(())
    }

    /// Execute a single instruction.
    /// The program counter is expected to already point past it.
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<(), Fault> {
        match instruction {
            Instruction::ClearDisplay => self.screen.clear(),

            // Return to the previous call site via the stack.
            Instruction::Return => {
                self.registers.pc = self.registers.pop()?;
            }

            Instruction::Jump(Addr(addr)) => self.jump(addr),

            // Store the return address on the stack, then jump.
            Instruction::Call(Addr(addr)) => {
                self.registers.push(self.registers.pc)?;
                self.jump(addr);
            }

            Instruction::SkipEqImm(x, Const(n)) => self.skip_if(self.reg(x) == n),
            Instruction::SkipNeImm(x, Const(n)) => self.skip_if(self.reg(x) != n),
            Instruction::SkipEqReg(x, y) => self.skip_if(self.reg(x) == self.reg(y)),
            Instruction::SkipNeReg(x, y) => self.skip_if(self.reg(x) != self.reg(y)),

            Instruction::LoadImm(Reg(x), Const(n)) => self.registers.set(x, n),

            // Wraps without touching the flag.
            Instruction::AddImm(Reg(x), Const(n)) => {
                let sum = self.registers.get(x).wrapping_add(n);
                self.registers.set(x, sum);
            }

            Instruction::LoadReg(Reg(x), y) => self.registers.set(x, self.reg(y)),
            Instruction::Or(Reg(x), y) => self.registers.set(x, self.registers.get(x) | self.reg(y)),
            Instruction::And(Reg(x), y) => self.registers.set(x, self.registers.get(x) & self.reg(y)),
            Instruction::Xor(Reg(x), y) => self.registers.set(x, self.registers.get(x) ^ self.reg(y)),

            Instruction::AddReg(Reg(x), y) => {
                let (sum, carry) = self.registers.get(x).overflowing_add(self.reg(y));
                self.registers.set(x, sum);
                self.registers.set_flag(carry);
            }

            // The flag means "no borrow".
            Instruction::Sub(Reg(x), y) => {
                let (minuend, subtrahend) = (self.registers.get(x), self.reg(y));
                self.registers.set(x, minuend.wrapping_sub(subtrahend));
                self.registers.set_flag(minuend >= subtrahend);
            }

            Instruction::SubReverse(Reg(x), y) => {
                let (minuend, subtrahend) = (self.reg(y), self.registers.get(x));
                self.registers.set(x, minuend.wrapping_sub(subtrahend));
                self.registers.set_flag(minuend >= subtrahend);
            }

            Instruction::ShiftRight(Reg(x), _) => {
                let value = self.registers.get(x);
                self.registers.set(x, value >> 1);
                self.registers.set_flag(value & 0x01 != 0);
            }

            Instruction::ShiftLeft(Reg(x), _) => {
                let value = self.registers.get(x);
                self.registers.set(x, value << 1);
                self.registers.set_flag(value & 0x80 != 0);
            }

            Instruction::LoadAddress(Addr(addr)) => self.registers.i = addr,

            Instruction::JumpOffset(Addr(addr)) => {
                let base = self.registers.get(0) as u16;
                self.jump(addr.wrapping_add(base));
            }

            Instruction::Random(Reg(x), Const(mask)) => {
                let byte: u8 = self.rng.gen();
                self.registers.set(x, byte & mask);
            }

            Instruction::Draw(x, y, Const(rows)) => {
                let (col, row) = (self.reg(x) as usize, self.reg(y) as usize);
                let sprite = self.memory.sprite(self.registers.i, rows);
                let collided = self.screen.draw_sprite(col, row, sprite);
                self.registers.set_flag(collided);
            }

            Instruction::SkipKeyDown(x) => self.skip_if(self.keypad.is_down(self.reg(x))),
            Instruction::SkipKeyUp(x) => self.skip_if(!self.keypad.is_down(self.reg(x))),

            Instruction::LoadDelay(Reg(x)) => self.registers.set(x, self.timers.delay.get()),

            // Without a key the instruction runs again on the next step.
            Instruction::WaitKey(Reg(x)) => match self.keypad.take_any() {
                Some(key) => self.registers.set(x, key),
                None => self.registers.pc = self.registers.pc.wrapping_sub(2) & PC_MASK,
            },

            Instruction::StoreDelay(x) => self.timers.delay.set(self.reg(x)),
            Instruction::StoreSound(x) => self.timers.sound.set(self.reg(x)),

            Instruction::AddAddress(x) => {
                self.registers.i = self.registers.i.wrapping_add(self.reg(x) as u16);
            }

            // Each font glyph is 5 bytes.
            Instruction::LoadFont(x) => self.registers.i = Memory::font_address(self.reg(x)),

            Instruction::StoreBcd(x) => {
                let value = self.reg(x);
                let i = self.registers.i;
                self.memory.write(i, value / 100);
                self.memory.write(i.wrapping_add(1), value / 10 % 10);
                self.memory.write(i.wrapping_add(2), value % 10);
            }

            // Dump register values up to Vx
            Instruction::StoreRegs(Reg(x)) => {
                let i = self.registers.i;
                for reg_no in 0..=x {
                    self.memory.write(i.wrapping_add(reg_no as u16), self.registers.get(reg_no));
                }
            }

            // Load register values up to Vx
            Instruction::LoadRegs(Reg(x)) => {
                let i = self.registers.i;
                for reg_no in 0..=x {
                    let value = self.memory.read(i.wrapping_add(reg_no as u16));
                    self.registers.set(reg_no, value);
                }
            }
        };

        Ok(())
    }

    fn reg(&self, Reg(r): Reg) -> u8 {
        self.registers.get(r)
    }

    fn jump(&mut self, addr: u16) {
        self.registers.pc = addr & PC_MASK;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.registers.pc = self.registers.pc.wrapping_add(2) & PC_MASK;
        }
    }

    /// Tick the delay and sound timers. Called once per frame.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    pub fn screen(&self) -> &Framebuffer {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Framebuffer {
        &mut self.screen
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// The fault that stopped the machine, if any.
    pub fn halted(&self) -> Option<Fault> {
        self.halted
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
