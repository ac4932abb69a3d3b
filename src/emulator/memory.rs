//! The 4KB address space. Every address is masked into range,
//! so reads and writes past the end wrap back to the start.

use crate::emulator::error::LoadError;
use crate::emulator::opcode::Opcode;

use std::fmt;

pub const MEM_SIZE: usize = 4096;
const ADDR_MASK: u16 = (MEM_SIZE - 1) as u16;

/// Where programs are loaded, and where execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// Bytes per glyph in the built-in font.
pub const GLYPH_SIZE: u16 = 5;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Zeroed memory with the font copied to the start.
    pub fn new() -> Memory {
        let mut bytes = [0; MEM_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = value;
    }

    /// Read a big-endian word, high byte at `addr`.
    pub fn read16(&self, addr: u16) -> u16 {
        Opcode::from_bytes(self.read(addr), self.read(addr.wrapping_add(1))).0
    }

    pub fn write16(&mut self, addr: u16, value: u16) {
        let (high, low) = Opcode(value).to_bytes();
        self.write(addr, high);
        self.write(addr.wrapping_add(1), low);
    }

    /// Copy a program to `PROGRAM_START`.
    /// Images that would run past the end of memory are rejected
    /// and leave memory untouched.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        let start = PROGRAM_START as usize;
        let max = MEM_SIZE - start;
        if image.len() > max {
            return Err(LoadError::ImageTooLarge {
                size: image.len(),
                max,
            });
        }
        self.bytes[start..start + image.len()].copy_from_slice(image);
        Ok(())
    }

    /// The `rows` bytes of a sprite starting at `addr`, wrapping at the end of memory.
    pub fn sprite(&self, addr: u16, rows: u8) -> impl Iterator<Item = u8> + '_ {
        (0..rows as u16).map(move |row| self.read(addr.wrapping_add(row)))
    }

    /// Address of the font glyph for the hexadecimal digit `digit & 0xF`.
    pub fn font_address(digit: u8) -> u16 {
        (digit & 0xF) as u16 * GLYPH_SIZE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Printable view of the whole address space, 16 bytes per line.
    pub fn hex_dump(&self) -> HexDump<'_> {
        HexDump(&self.bytes)
    }
}

const DUMP_WIDTH: usize = 16;

/// Formats bytes as `0x000: F0 90 ...`, one line per 16 bytes.
pub struct HexDump<'a>(&'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.0.chunks(DUMP_WIDTH).enumerate() {
            write!(f, "{:#05x}:", line * DUMP_WIDTH)?;
            for byte in chunk {
                write!(f, " {:02X}", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
