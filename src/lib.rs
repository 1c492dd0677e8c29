//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the machine knows nothing about screens, keyboards or speakers; it
//!   exposes a frame buffer, a key latch and a tone flag
//! * one owned `Machine` value, driven through three entry points: `step`,
//!   `tick_60hz` and `set_key`
//! * instructions decode into an enum first, then execute, so each entry in
//!   the instruction set can be tested on its own
//! * address and stack faults are reported as errors, never as out of bounds
//!   accesses; unknown instructions are logged and skipped
//! * instruction rate and timer rate are configured separately
//!
//! Model
//!
//! ```text
//! main
//!  |-- config (cli)
//!  |-- display, input, sound
//!  `-- interpreter(display, input, sound, config)
//!       |-- machine
//!       |    |-- memory (font, program)
//!       |    |-- registers, stack
//!       |    |-- timers
//!       |    |-- frame buffer
//!       |    `-- keypad
//!       `-- main loop
//!            |-- input.poll()           -> machine.set_key()
//!            |-- machine.step() x N
//!            |-- machine.tick_60hz()    -> sound.apply()
//!            |-- display.draw(machine.display())
//!            `-- sleep until the next tick
//! ```
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod sound;
pub mod timer;

pub use config::Config;
pub use error::{Chip8Error, Result};
pub use framebuffer::{FrameBuffer, SpriteEdge};
pub use instruction::Instruction;
pub use machine::{Machine, Step};
pub use timer::Tone;
