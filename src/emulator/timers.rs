/// An 8-bit counter that counts down to zero and stays there.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer(u8);

impl Timer {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    pub fn tick(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

/// The delay and sound timers, ticked together once per frame
/// no matter how many instructions ran in between.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }

    /// Whether a tone should be playing.
    pub fn sound_active(&self) -> bool {
        self.sound.get() > 0
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn tick_counts_down_and_stops_at_zero() {
        let mut timer = Timer::default();
        timer.set(2);
        timer.tick();
        assert_eq!(1, timer.get());
        timer.tick();
        timer.tick();
        assert_eq!(0, timer.get());
    }

    #[test]
    fn both_timers_tick_together() {
        let mut timers = Timers::default();
        timers.delay.set(5);
        timers.sound.set(1);
        assert!(timers.sound_active());
        timers.tick();
        assert_eq!(4, timers.delay.get());
        assert_eq!(0, timers.sound.get());
        assert!(!timers.sound_active());
    }
}
