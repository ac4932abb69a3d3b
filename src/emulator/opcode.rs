/// A raw 16-bit instruction word, with accessors for the
/// fields the instruction set packs into it.
///
/// ```text
/// 0xDXYN
///   | | |
///   | | +-- n:   lowest nibble
///   | +---- y:   third nibble
///   +------ x:   second nibble
///   nn  = lowest byte, nnn = lowest 12 bits
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Combine the two bytes of an instruction, high byte first.
    pub fn from_bytes(high: u8, low: u8) -> Opcode {
        Opcode((high as u16) << 8 | low as u16)
    }

    /// Return the two bytes as a tuple, high byte first.
    pub fn to_bytes(self) -> (u8, u8) {
        ((self.0 >> 8) as u8, (self.0 & 0x00FF) as u8)
    }

    /// All four nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            (self.0 >> 12) as u8 & 0xF,
            (self.0 >> 8) as u8 & 0xF,
            (self.0 >> 4) as u8 & 0xF,
            self.0 as u8 & 0xF,
        )
    }

    pub fn x(self) -> u8 {
        self.nibbles().1
    }

    pub fn y(self) -> u8 {
        self.nibbles().2
    }

    pub fn n(self) -> u8 {
        self.nibbles().3
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}
