/*!

The core of a CHIP-8 interpreter as specified at https://en.wikipedia.org/wiki/CHIP-8.

It covers memory, registers, the call stack, the 64x32 display, timers and key state,
the instruction decoder and executor, and a pacer that keeps execution at a steady speed.
Drawing pixels, reading a keyboard and playing sound are left to whoever embeds it.

# Headless runner

`cargo run --release -- <program> --frames 600 --dump` runs a program for ten seconds
of emulated time and prints the final screen. `--dump-memory` prints the address
space once the program is loaded, and `--seconds 5` stops after five seconds of wall
time. Set `RUST_LOG=trace` to see every executed instruction.

# Library

The main way of running a program is to load it as bytes and step through it.

```rust
use chip_8_core::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load(&clear_display).unwrap();
emulator.step().unwrap(); // Will now clear the display
assert!(emulator.screen().is_clear());
```

Alternatively, you can experiment by executing instructions directly.

```rust
use chip_8_core::emulator::Emulator;
use chip_8_core::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute_single(Instruction::ClearDisplay).unwrap();

// Or many sequentially
emulator.execute_many(&[
    Instruction::Jump(Addr(0x250)),
    Instruction::LoadImm(Reg(0xA), Const(35)),
    Instruction::LoadReg(Reg(0xB), Reg(0xA))
]).unwrap();
assert_eq!(35, emulator.registers().get(0xB));
```

Bad programs never panic. Unknown opcodes and misuse of the call stack stop the
machine with a `Fault`, and the caller decides what to do about it.

```rust
use chip_8_core::emulator::{Emulator, Fault};

let mut emulator = Emulator::new();
emulator.load(&[0x00, 0xEE]).unwrap(); // return, with nothing to return to
assert_eq!(Err(Fault::StackUnderflow { address: 0x200 }), emulator.step());
```

## Custom input and output

To run in real time, hand the emulator to a `Pacer` together with an `EmulatorInput`
and an `EmulatorOutput`. These tell the pacer where key presses come from and where
frames and sound changes go. Take a look at `src/emulator/input.rs` and
`src/emulator/output.rs` to see how to implement them.

```rust
use chip_8_core::emulator::{Emulator, Pacer, PacerConfig};
use chip_8_core::emulator::{input::DummyInput, output::DummyOutput};
use std::sync::atomic::AtomicBool;

let mut emulator = Emulator::new();
emulator.load(&[0x12, 0x00]).unwrap(); // jump to itself forever

let mut pacer = Pacer::new(PacerConfig { max_frames: Some(2), ..PacerConfig::default() });
let mut output = DummyOutput::new();
let summary = pacer
    .run(&mut emulator, &mut DummyInput, &mut output, &AtomicBool::new(false))
    .unwrap();
assert_eq!(2, output.frames);
assert_eq!(2, summary.frames);
```
*/

pub mod emulator;
