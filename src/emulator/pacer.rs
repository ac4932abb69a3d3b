//! Keeps emulation running at a steady speed on hosts of any speed.
//!
//! Instructions run in batches. After each batch the pacer compares how long
//! it took with a fixed budget: a batch that finished early makes the next
//! one bigger, up to a ceiling, and the rest of the budget is slept away.
//! Timers, input and presentation run on their own fixed frame clock,
//! independent of how many instructions each batch holds.

use crate::emulator::emulator::Emulator;
use crate::emulator::error::Fault;
use crate::emulator::input::EmulatorInput;
use crate::emulator::output::EmulatorOutput;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Frames the clock may fall behind before the backlog is dropped.
const MAX_FRAME_LAG: u32 = 8;

/// Tuning knobs for a `Pacer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerConfig {
    /// Instructions in the first batch.
    pub initial_batch: usize,
    pub min_batch: usize,
    pub max_batch: usize,
    /// How many instructions a batch grows or shrinks by at a time.
    pub growth: usize,
    /// Wall-clock time each batch is allowed to take.
    pub batch_budget: Duration,
    /// Make batches smaller again when they overrun the budget.
    pub shrink_on_overrun: bool,
    /// Time between timer ticks, input polls and presented frames.
    pub frame_interval: Duration,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for PacerConfig {
    fn default() -> Self {
        PacerConfig {
            initial_batch: 10,
            min_batch: 1,
            max_batch: 1000,
            growth: 1,
            batch_budget: Duration::from_millis(1),
            shrink_on_overrun: false,
            frame_interval: Duration::from_micros(1_000_000 / 60),
            max_frames: None,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub instructions: u64,
    pub batch_size: usize,
}

pub struct Pacer {
    config: PacerConfig,
    batch_size: usize,
}

impl Pacer {
    pub fn new(config: PacerConfig) -> Pacer {
        let max_batch = config.max_batch.max(config.min_batch);
        let batch_size = config.initial_batch.max(config.min_batch).min(max_batch);
        Pacer { config, batch_size }
    }

    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resize the next batch from how long the last one took.
    pub fn adjust(&mut self, elapsed: Duration) -> usize {
        let config = &self.config;
        let ceiling = config.max_batch.max(config.min_batch);
        let previous = self.batch_size;
        if elapsed < config.batch_budget {
            self.batch_size = previous.saturating_add(config.growth).min(ceiling);
        } else if elapsed > config.batch_budget && config.shrink_on_overrun {
            self.batch_size = previous.saturating_sub(config.growth).max(config.min_batch);
        }

        if self.batch_size != previous {
            log::debug!(
                "Batch took {} us, resizing from {} to {} instructions",
                elapsed.as_micros(),
                previous,
                self.batch_size
            );
        }
        self.batch_size
    }

    /// Run one batch, and resize the next one. Returns how long the batch took.
    pub fn run_batch(&mut self, emulator: &mut Emulator) -> Result<Duration, Fault> {
        let start = Instant::now();
        emulator.run(self.batch_size)?;
        let elapsed = start.elapsed();
        self.adjust(elapsed);
        Ok(elapsed)
    }

    /// Run until `shutdown` is set, the frame limit is reached, or the machine faults.
    pub fn run<I, O>(
        &mut self,
        emulator: &mut Emulator,
        input: &mut I,
        output: &mut O,
        shutdown: &AtomicBool,
    ) -> Result<RunSummary, Fault>
    where
        I: EmulatorInput,
        O: EmulatorOutput,
    {
        let mut summary = RunSummary {
            frames: 0,
            instructions: 0,
            batch_size: self.batch_size,
        };
        let mut sound = emulator.timers().sound_active();
        let mut next_frame = Instant::now() + self.config.frame_interval;

        while !self.should_stop(shutdown, summary.frames) {
            let batch_start = Instant::now();
            let batch = self.batch_size;
            let elapsed = self.run_batch(emulator)?;
            summary.instructions += batch as u64;
            summary.batch_size = self.batch_size;

            if elapsed > self.config.batch_budget {
                log::trace!(
                    "Batch overran its budget by {} us",
                    (elapsed - self.config.batch_budget).as_micros()
                );
            }

            // Frames keep falling due while the rest of the budget is slept away.
            let batch_end = batch_start + self.config.batch_budget;
            loop {
                while !self.frame_limit_reached(summary.frames) && Instant::now() >= next_frame {
                    self.frame(emulator, input, output, &mut sound);
                    summary.frames += 1;
                    next_frame += self.config.frame_interval;

                    let lag = Instant::now().saturating_duration_since(next_frame);
                    if lag >= self.config.frame_interval * MAX_FRAME_LAG {
                        log::warn!("Fell {} us behind the frame clock, resynchronizing", lag.as_micros());
                        next_frame = Instant::now() + self.config.frame_interval;
                    }
                }

                let now = Instant::now();
                if now >= batch_end || self.should_stop(shutdown, summary.frames) {
                    break;
                }
                spin_sleep::sleep(batch_end.min(next_frame).saturating_duration_since(now));
            }
        }

        log::info!(
            "Ran {} instructions over {} frames, batch size {}",
            summary.instructions,
            summary.frames,
            summary.batch_size
        );
        Ok(summary)
    }

    fn should_stop(&self, shutdown: &AtomicBool, frames: u64) -> bool {
        shutdown.load(Ordering::Relaxed) || self.frame_limit_reached(frames)
    }

    fn frame_limit_reached(&self, frames: u64) -> bool {
        self.config.max_frames.map_or(false, |max| frames >= max)
    }

    fn frame<I, O>(&self, emulator: &mut Emulator, input: &mut I, output: &mut O, sound: &mut bool)
    where
        I: EmulatorInput,
        O: EmulatorOutput,
    {
        emulator.tick_timers();
        input.poll(emulator.keypad_mut());

        let playing = emulator.timers().sound_active();
        if playing != *sound {
            log::debug!("Sound {}", if playing { "on" } else { "off" });
            output.sound(playing);
            *sound = playing;
        }

        output.present(emulator.screen(), emulator.registers());
        emulator.registers_mut().decay_highlights();
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::emulator::input::{DummyInput, HeldKeys};
    use crate::emulator::keypad::Keypad;
    use crate::emulator::output::DummyOutput;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn config() -> PacerConfig {
        PacerConfig {
            initial_batch: 10,
            max_batch: 12,
            batch_budget: Duration::from_millis(5),
            frame_interval: Duration::from_millis(1),
            ..PacerConfig::default()
        }
    }

    fn looping_emulator(program: &[u8]) -> Emulator {
        let mut emulator = Emulator::with_seed(1);
        emulator.load(program).unwrap();
        emulator
    }

    #[test]
    fn fast_batches_grow_up_to_the_ceiling() {
        let mut pacer = Pacer::new(config());
        assert_eq!(11, pacer.adjust(Duration::from_micros(10)));
        assert_eq!(12, pacer.adjust(Duration::from_micros(10)));
        assert_eq!(12, pacer.adjust(Duration::from_micros(10)));
    }

    #[test]
    fn slow_batches_never_shrink_by_default() {
        let mut pacer = Pacer::new(config());
        assert_eq!(10, pacer.adjust(Duration::from_secs(1)));
        assert_eq!(10, pacer.adjust(Duration::from_millis(5)));
    }

    #[test]
    fn slow_batches_shrink_when_asked_to() {
        let mut pacer = Pacer::new(PacerConfig {
            initial_batch: 2,
            shrink_on_overrun: true,
            ..config()
        });
        assert_eq!(1, pacer.adjust(Duration::from_secs(1)));
        assert_eq!(1, pacer.adjust(Duration::from_secs(1)));
        assert_eq!(2, pacer.adjust(Duration::ZERO));
    }

    #[test]
    fn initial_batch_is_clamped() {
        let pacer = Pacer::new(PacerConfig {
            initial_batch: 5000,
            ..config()
        });
        assert_eq!(12, pacer.batch_size());
        let pacer = Pacer::new(PacerConfig {
            initial_batch: 0,
            ..config()
        });
        assert_eq!(1, pacer.batch_size());
    }

    #[test]
    fn consecutive_fast_batches_grow_strictly() {
        let mut pacer = Pacer::new(PacerConfig {
            batch_budget: Duration::from_secs(1),
            max_batch: 1000,
            ..config()
        });
        let mut emulator = looping_emulator(&[0x12, 0x00]);
        let first = pacer.batch_size();
        pacer.run_batch(&mut emulator).unwrap();
        let second = pacer.batch_size();
        pacer.run_batch(&mut emulator).unwrap();
        let third = pacer.batch_size();
        assert!(first < second && second < third);
    }

    #[test]
    fn run_stops_after_max_frames() {
        let mut pacer = Pacer::new(PacerConfig {
            max_frames: Some(3),
            ..config()
        });
        let mut emulator = looping_emulator(&[0x12, 0x00]);
        let mut output = DummyOutput::new();
        let shutdown = AtomicBool::new(false);
        let summary = pacer
            .run(&mut emulator, &mut DummyInput, &mut output, &shutdown)
            .unwrap();
        assert_eq!(3, summary.frames);
        assert_eq!(3, output.frames);
        assert!(summary.instructions >= 10);
    }

    #[test]
    fn frames_follow_the_wall_clock_when_batches_are_long() {
        let mut pacer = Pacer::new(PacerConfig {
            batch_budget: Duration::from_millis(10),
            frame_interval: Duration::from_millis(1),
            max_frames: Some(20),
            ..config()
        });
        let mut emulator = looping_emulator(&[0x12, 0x00]);
        let mut output = DummyOutput::new();
        let shutdown = AtomicBool::new(false);
        let start = Instant::now();
        let summary = pacer
            .run(&mut emulator, &mut DummyInput, &mut output, &shutdown)
            .unwrap();
        let wall = start.elapsed();
        assert_eq!(20, summary.frames);
        assert!(wall >= Duration::from_millis(20), "took {:?}", wall);
        assert!(wall < Duration::from_millis(150), "took {:?}", wall);
    }

    #[test]
    fn delay_timer_ticks_once_per_frame() {
        let mut pacer = Pacer::new(PacerConfig {
            batch_budget: Duration::from_millis(10),
            frame_interval: Duration::from_millis(1),
            max_frames: Some(30),
            ..config()
        });
        // LD V0, 200; LD DT, V0; JP 0x204
        let mut emulator = looping_emulator(&[0x60, 0xC8, 0xF0, 0x15, 0x12, 0x04]);
        let shutdown = AtomicBool::new(false);
        pacer
            .run(&mut emulator, &mut DummyInput, &mut DummyOutput::new(), &shutdown)
            .unwrap();
        assert_eq!(200 - 30, emulator.timers().delay.get());
    }

    #[test]
    fn run_returns_immediately_on_shutdown() {
        let mut pacer = Pacer::new(config());
        let mut emulator = looping_emulator(&[0x12, 0x00]);
        let shutdown = AtomicBool::new(true);
        let summary = pacer
            .run(&mut emulator, &mut DummyInput, &mut DummyOutput::new(), &shutdown)
            .unwrap();
        assert_eq!(0, summary.frames);
        assert_eq!(0, summary.instructions);
    }

    #[test]
    fn shutdown_from_another_thread_stops_the_run() {
        let mut pacer = Pacer::new(config());
        let mut emulator = looping_emulator(&[0x12, 0x00]);
        let shutdown = Arc::new(AtomicBool::new(false));
        let stopper = {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                shutdown.store(true, Ordering::Relaxed);
            })
        };
        let summary = pacer
            .run(&mut emulator, &mut DummyInput, &mut DummyOutput::new(), &shutdown)
            .unwrap();
        stopper.join().unwrap();
        assert!(summary.frames > 0);
        assert!(summary.instructions > 0);
    }

    #[test]
    fn run_surfaces_faults() {
        let mut pacer = Pacer::new(config());
        let mut emulator = Emulator::with_seed(1);
        let shutdown = AtomicBool::new(false);
        let result = pacer.run(&mut emulator, &mut DummyInput, &mut DummyOutput::new(), &shutdown);
        assert_eq!(
            Err(Fault::UnknownOpcode { opcode: 0, address: 0x200 }),
            result
        );
    }

    #[test]
    fn sound_transitions_are_reported() {
        let mut pacer = Pacer::new(PacerConfig {
            max_frames: Some(10),
            ..config()
        });
        // LD V0, 5; LD ST, V0; JP 0x204
        let mut emulator = looping_emulator(&[0x60, 0x05, 0xF0, 0x18, 0x12, 0x04]);
        let mut output = DummyOutput::new();
        let shutdown = AtomicBool::new(false);
        pacer
            .run(&mut emulator, &mut DummyInput, &mut output, &shutdown)
            .unwrap();
        assert_eq!(2, output.sound_changes);
        assert!(!output.playing);
        assert_eq!(0, emulator.timers().sound.get());
    }

    #[test]
    fn input_is_polled_every_frame() {
        let mut pacer = Pacer::new(PacerConfig {
            max_frames: Some(2),
            ..config()
        });
        // LD V1, K; JP 0x202
        let mut emulator = looping_emulator(&[0xF1, 0x0A, 0x12, 0x02]);
        let mut keys = Keypad::new();
        keys.press(0x9);
        let shutdown = AtomicBool::new(false);
        pacer
            .run(&mut emulator, &mut HeldKeys(keys), &mut DummyOutput::new(), &shutdown)
            .unwrap();
        assert_eq!(0x9, emulator.registers().get(1));
        assert_eq!(0x202, emulator.registers().pc);
    }
}
