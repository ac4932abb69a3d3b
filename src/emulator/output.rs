use crate::emulator::framebuffer::Framebuffer;
use crate::emulator::registers::RegisterFile;

/// Represents something that shows the machine to a user.
/// It only ever gets shared borrows, once per frame.
pub trait EmulatorOutput {
    fn present(&mut self, screen: &Framebuffer, registers: &RegisterFile);

    /// Called when the sound timer becomes non-zero (`true`) or reaches zero (`false`).
    fn sound(&mut self, _playing: bool) {}
}

/// A simple output device that keeps the last frame it was shown
/// and counts what it was told, so it can run forever in constant space.
pub struct DummyOutput {
    pub frames: u64,
    pub playing: bool,
    pub sound_changes: u64,
    pub last_frame: Framebuffer,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput {
            frames: 0,
            playing: false,
            sound_changes: 0,
            last_frame: Framebuffer::new(),
        }
    }
}

impl Default for DummyOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, screen: &Framebuffer, _: &RegisterFile) {
        self.frames += 1;
        self.last_frame = screen.clone();
    }

    fn sound(&mut self, playing: bool) {
        self.playing = playing;
        self.sound_changes += 1;
    }
}
