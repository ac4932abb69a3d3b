use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use chip_8_core::emulator::{input::DummyInput, output::DummyOutput};
use chip_8_core::emulator::{Emulator, Pacer, PacerConfig};

/// Run a CHIP-8 program without a window, and optionally print the final screen.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip-8-core")]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions in the first batch
    #[structopt(long, default_value = "10")]
    batch: usize,

    /// Largest batch the pacer may grow to
    #[structopt(long, default_value = "1000")]
    max_batch: usize,

    /// Wall-clock budget per batch, in microseconds
    #[structopt(long, default_value = "1000")]
    budget_us: u64,

    /// Instructions added to, or removed from, a batch at a time
    #[structopt(long, default_value = "1")]
    growth: usize,

    /// Shrink batches that overrun their budget
    #[structopt(long)]
    shrink: bool,

    /// Timer and display frames per second
    #[structopt(long, default_value = "60")]
    frame_hz: u32,

    /// Stop after this many frames
    #[structopt(long)]
    frames: Option<u64>,

    /// Stop after this many seconds of wall-clock time
    #[structopt(long)]
    seconds: Option<f64>,

    /// Seed for the random instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Print the screen when the run ends
    #[structopt(long)]
    dump: bool,

    /// Print a hex dump of memory once the program is loaded
    #[structopt(long)]
    dump_memory: bool,
}

impl Opt {
    fn pacer_config(&self) -> PacerConfig {
        PacerConfig {
            initial_batch: self.batch,
            max_batch: self.max_batch,
            growth: self.growth,
            batch_budget: Duration::from_micros(self.budget_us),
            shrink_on_overrun: self.shrink,
            frame_interval: Duration::from_secs(1) / self.frame_hz.max(1),
            max_frames: self.frames,
            ..PacerConfig::default()
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Opt::from_args()) {
        log::error!("{}", error);
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Executing {:?}", &opt.input);

    let mut emulator = match opt.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };

    // A missing program is not fatal, the machine just runs empty memory.
    match std::fs::read(&opt.input) {
        Ok(program) => emulator.load(&program)?,
        Err(error) => log::warn!("Could not read {:?}: {}, running without a program", &opt.input, error),
    }

    if opt.dump_memory {
        print!("{}", emulator.memory().hex_dump());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = opt.seconds {
        let shutdown = Arc::clone(&shutdown);
        let limit = Duration::from_secs_f64(seconds.max(0.0).min(u32::MAX as f64));
        thread::spawn(move || {
            thread::sleep(limit);
            log::info!("Time limit of {:?} reached", limit);
            shutdown.store(true, Ordering::Relaxed);
        });
    }

    let mut pacer = Pacer::new(opt.pacer_config());
    let mut output = DummyOutput::new();
    let result = pacer.run(&mut emulator, &mut DummyInput, &mut output, &shutdown);
    log::debug!("Presented {} frames, {} sound changes", output.frames, output.sound_changes);

    if opt.dump {
        print!("{}", emulator.screen());
    }

    result?;
    Ok(())
}
