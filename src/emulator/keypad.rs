pub const NUM_KEYS: usize = 16;

/// Which of the 16 hexadecimal keys are held down.
///
/// Written by an input collector between batches and only read by the
/// interpreter, except for the wait-for-key instruction which consumes
/// the key it reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn set(&mut self, key: u8, down: bool) {
        self.keys[(key & 0xF) as usize] = down;
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn release_all(&mut self) {
        self.keys = [false; NUM_KEYS];
    }

    /// Release and return the lowest key currently held down.
    pub fn take_any(&mut self) -> Option<u8> {
        let key = self.keys.iter().position(|down| *down)?;
        self.keys[key] = false;
        Some(key as u8)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn keys_are_masked() {
        let mut keypad = Keypad::new();
        keypad.press(0x1A);
        assert!(keypad.is_down(0xA));
        keypad.release(0xA);
        assert!(!keypad.is_down(0xA));
    }

    #[test]
    fn take_any_consumes_the_lowest_key() {
        let mut keypad = Keypad::new();
        assert_eq!(None, keypad.take_any());
        keypad.press(0xC);
        keypad.press(0x3);
        assert_eq!(Some(0x3), keypad.take_any());
        assert_eq!(Some(0xC), keypad.take_any());
        assert_eq!(None, keypad.take_any());
    }
}
