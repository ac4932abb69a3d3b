use crate::emulator::keypad::Keypad;

/// Represents an input device that reports which of the keys 0..0xF are held.
/// Polled once per frame, between instruction batches.
pub trait EmulatorInput {
    fn poll(&mut self, keypad: &mut Keypad);
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn poll(&mut self, _: &mut Keypad) {}
}

/// Replays a fixed key state every frame. Handy for scripted runs.
pub struct HeldKeys(pub Keypad);

impl EmulatorInput for HeldKeys {
    fn poll(&mut self, keypad: &mut Keypad) {
        *keypad = self.0;
    }
}
