use crate::emulator::opcode::Opcode;
use std::fmt;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single decoded instruction.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearDisplay,            // 00E0
    Return,                  // 00EE
    Jump(Addr),              // 1NNN
    Call(Addr),              // 2NNN
    SkipEqImm(Reg, Const),   // 3XNN
    SkipNeImm(Reg, Const),   // 4XNN
    SkipEqReg(Reg, Reg),     // 5XY0
    LoadImm(Reg, Const),     // 6XNN
    AddImm(Reg, Const),      // 7XNN
    LoadReg(Reg, Reg),       // 8XY0
    Or(Reg, Reg),            // 8XY1
    And(Reg, Reg),           // 8XY2
    Xor(Reg, Reg),           // 8XY3
    AddReg(Reg, Reg),        // 8XY4
    Sub(Reg, Reg),           // 8XY5
    ShiftRight(Reg, Reg),    // 8XY6
    SubReverse(Reg, Reg),    // 8XY7
    ShiftLeft(Reg, Reg),     // 8XYE
    SkipNeReg(Reg, Reg),     // 9XY0
    LoadAddress(Addr),       // ANNN
    JumpOffset(Addr),        // BNNN
    Random(Reg, Const),      // CXNN
    Draw(Reg, Reg, Const),   // DXYN
    SkipKeyDown(Reg),        // EX9E
    SkipKeyUp(Reg),          // EXA1
    LoadDelay(Reg),          // FX07
    WaitKey(Reg),            // FX0A
    StoreDelay(Reg),         // FX15
    StoreSound(Reg),         // FX18
    AddAddress(Reg),         // FX1E
    LoadFont(Reg),           // FX29
    StoreBcd(Reg),           // FX33
    StoreRegs(Reg),          // FX55
    LoadRegs(Reg),           // FX65
}

impl Instruction {
    /// Decode an opcode, or `None` if it matches no known pattern.
    pub fn decode(opcode: Opcode) -> Option<Instruction> {
        let addr = Addr(opcode.nnn());
        let nn = Const(opcode.nn());
        let instruction = match opcode.nibbles() {
            (0, 0, 0xE, 0) => Instruction::ClearDisplay,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Jump(addr),
            (2, _, _, _) => Instruction::Call(addr),
            (3, x, _, _) => Instruction::SkipEqImm(Reg(x), nn),
            (4, x, _, _) => Instruction::SkipNeImm(Reg(x), nn),
            (5, x, y, 0) => Instruction::SkipEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::LoadImm(Reg(x), nn),
            (7, x, _, _) => Instruction::AddImm(Reg(x), nn),
            (8, x, y, 0) => Instruction::LoadReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::Or(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::And(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::Xor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::AddReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::Sub(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::ShiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SubReverse(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::ShiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::SkipNeReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::LoadAddress(addr),
            (0xB, _, _, _) => Instruction::JumpOffset(addr),
            (0xC, x, _, _) => Instruction::Random(Reg(x), nn),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::SkipKeyDown(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::SkipKeyUp(Reg(x)),
            (0xF, x, 0, 7) => Instruction::LoadDelay(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::WaitKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::StoreDelay(Reg(x)),
            (0xF, x, 1, 8) => Instruction::StoreSound(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddAddress(Reg(x)),
            (0xF, x, 2, 9) => Instruction::LoadFont(Reg(x)),
            (0xF, x, 3, 3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 5, 5) => Instruction::StoreRegs(Reg(x)),
            (0xF, x, 6, 5) => Instruction::LoadRegs(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }

    /// Encode the instruction back into its opcode.
    pub fn opcode(self) -> Opcode {
        fn xy(family: u16, Reg(x): Reg, Reg(y): Reg, n: u16) -> u16 {
            family << 12 | (x as u16) << 8 | (y as u16) << 4 | n
        }
        fn xnn(family: u16, Reg(x): Reg, Const(nn): Const) -> u16 {
            family << 12 | (x as u16) << 8 | nn as u16
        }
        fn fx(Reg(x): Reg, low: u16) -> u16 {
            0xF000 | (x as u16) << 8 | low
        }

        let word = match self {
            Instruction::ClearDisplay => 0x00E0,
            Instruction::Return => 0x00EE,
            Instruction::Jump(Addr(a)) => 0x1000 | a,
            Instruction::Call(Addr(a)) => 0x2000 | a,
            Instruction::SkipEqImm(x, nn) => xnn(3, x, nn),
            Instruction::SkipNeImm(x, nn) => xnn(4, x, nn),
            Instruction::SkipEqReg(x, y) => xy(5, x, y, 0),
            Instruction::LoadImm(x, nn) => xnn(6, x, nn),
            Instruction::AddImm(x, nn) => xnn(7, x, nn),
            Instruction::LoadReg(x, y) => xy(8, x, y, 0),
            Instruction::Or(x, y) => xy(8, x, y, 1),
            Instruction::And(x, y) => xy(8, x, y, 2),
            Instruction::Xor(x, y) => xy(8, x, y, 3),
            Instruction::AddReg(x, y) => xy(8, x, y, 4),
            Instruction::Sub(x, y) => xy(8, x, y, 5),
            Instruction::ShiftRight(x, y) => xy(8, x, y, 6),
            Instruction::SubReverse(x, y) => xy(8, x, y, 7),
            Instruction::ShiftLeft(x, y) => xy(8, x, y, 0xE),
            Instruction::SkipNeReg(x, y) => xy(9, x, y, 0),
            Instruction::LoadAddress(Addr(a)) => 0xA000 | a,
            Instruction::JumpOffset(Addr(a)) => 0xB000 | a,
            Instruction::Random(x, nn) => xnn(0xC, x, nn),
            Instruction::Draw(x, y, Const(n)) => xy(0xD, x, y, n as u16),
            Instruction::SkipKeyDown(Reg(x)) => 0xE09E | (x as u16) << 8,
            Instruction::SkipKeyUp(Reg(x)) => 0xE0A1 | (x as u16) << 8,
            Instruction::LoadDelay(x) => fx(x, 0x07),
            Instruction::WaitKey(x) => fx(x, 0x0A),
            Instruction::StoreDelay(x) => fx(x, 0x15),
            Instruction::StoreSound(x) => fx(x, 0x18),
            Instruction::AddAddress(x) => fx(x, 0x1E),
            Instruction::LoadFont(x) => fx(x, 0x29),
            Instruction::StoreBcd(x) => fx(x, 0x33),
            Instruction::StoreRegs(x) => fx(x, 0x55),
            Instruction::LoadRegs(x) => fx(x, 0x65),
        };
        Opcode(word)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Assembly-style mnemonics, used when tracing execution.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::ClearDisplay => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(a) => write!(f, "JP {}", a),
            Instruction::Call(a) => write!(f, "CALL {}", a),
            Instruction::SkipEqImm(x, nn) => write!(f, "SE {}, {}", x, nn),
            Instruction::SkipNeImm(x, nn) => write!(f, "SNE {}, {}", x, nn),
            Instruction::SkipEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            Instruction::LoadImm(x, nn) => write!(f, "LD {}, {}", x, nn),
            Instruction::AddImm(x, nn) => write!(f, "ADD {}, {}", x, nn),
            Instruction::LoadReg(x, y) => write!(f, "LD {}, {}", x, y),
            Instruction::Or(x, y) => write!(f, "OR {}, {}", x, y),
            Instruction::And(x, y) => write!(f, "AND {}, {}", x, y),
            Instruction::Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            Instruction::AddReg(x, y) => write!(f, "ADD {}, {}", x, y),
            Instruction::Sub(x, y) => write!(f, "SUB {}, {}", x, y),
            Instruction::ShiftRight(x, _) => write!(f, "SHR {}", x),
            Instruction::SubReverse(x, y) => write!(f, "SUBN {}, {}", x, y),
            Instruction::ShiftLeft(x, _) => write!(f, "SHL {}", x),
            Instruction::SkipNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            Instruction::LoadAddress(a) => write!(f, "LD I, {}", a),
            Instruction::JumpOffset(a) => write!(f, "JP V0, {}", a),
            Instruction::Random(x, nn) => write!(f, "RND {}, {}", x, nn),
            Instruction::Draw(x, y, Const(n)) => write!(f, "DRW {}, {}, {}", x, y, n),
            Instruction::SkipKeyDown(x) => write!(f, "SKP {}", x),
            Instruction::SkipKeyUp(x) => write!(f, "SKNP {}", x),
            Instruction::LoadDelay(x) => write!(f, "LD {}, DT", x),
            Instruction::WaitKey(x) => write!(f, "LD {}, K", x),
            Instruction::StoreDelay(x) => write!(f, "LD DT, {}", x),
            Instruction::StoreSound(x) => write!(f, "LD ST, {}", x),
            Instruction::AddAddress(x) => write!(f, "ADD I, {}", x),
            Instruction::LoadFont(x) => write!(f, "LD F, {}", x),
            Instruction::StoreBcd(x) => write!(f, "LD B, {}", x),
            Instruction::StoreRegs(x) => write!(f, "LD [I], {}", x),
            Instruction::LoadRegs(x) => write!(f, "LD {}, [I]", x),
        }
    }
}
