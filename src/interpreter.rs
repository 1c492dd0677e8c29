//! # interpreter
//!
//! The host side: owns a `Machine` and wires it up to a display, an input
//! device and a sound device. Each frame it
//!
//!  1. polls input and latches key changes into the machine
//!  2. runs `instructions_per_tick` instructions (fewer if the program is
//!     waiting for a key)
//!  3. ticks the timers once and passes any tone change to the sound device
//!  4. draws the frame buffer
//!  5. sleeps until the next frame is due
//!
//! so instruction speed and timer speed are set independently, and the
//! timers run at the tick rate however fast the program goes.
use crate::config::Config;
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::input::{Input, InputEvent};
use crate::machine::{Machine, Step};
use crate::sound::Sound;
use log::{debug, info};
use std::io;
use std::time::Instant;

/// why the main loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    Quit { frames: u64 },
    FrameLimit { frames: u64 },
}

pub struct Chip8Interpreter<'a> {
    machine: Machine,
    config: Config,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        config: Config,
        display: &'a mut impl Display,
        input: &'a mut impl Input,
        sound: &'a mut impl Sound,
    ) -> Result<Chip8Interpreter<'a>> {
        config.validate()?;
        Ok(Chip8Interpreter {
            machine: Machine::new().with_sprite_edge(config.sprite_edge),
            config,
            display,
            input,
            sound,
        })
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.machine.load_program(reader)
    }

    /// load the program named in the config
    pub fn load_rom(&mut self) -> Result<usize> {
        let rom = self.config.rom.clone();
        self.machine.load_program_from_file(rom)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// run one frame; false if the user asked to quit
    pub fn frame(&mut self) -> Result<bool> {
        for event in self.input.poll().map_err(Chip8Error::Input)? {
            match event {
                InputEvent::Key { key, pressed } => self.machine.set_key(key, pressed)?,
                InputEvent::Quit => {
                    info!("quit requested");
                    return Ok(false);
                }
            }
        }

        for _ in 0..self.config.instructions_per_tick {
            if self.machine.step()? == Step::WaitingForKey {
                // nothing changes until the next poll
                break;
            }
        }

        if let Some(tone) = self.machine.tick_60hz() {
            debug!("tone {:?}", tone);
            self.sound
                .apply(tone)
                .map_err(|e| Chip8Error::Sound(e.to_string()))?;
        }

        self.display
            .draw(self.machine.display())
            .map_err(Chip8Error::Display)?;
        Ok(true)
    }

    /// run frames at the tick rate until quit or the frame limit
    pub fn main_loop(&mut self) -> Result<Stopped> {
        let interval = self.config.tick_interval();
        let mut frames = 0;
        loop {
            if let Some(max) = self.config.max_frames {
                if frames >= max {
                    return Ok(Stopped::FrameLimit { frames });
                }
            }
            let deadline = Instant::now() + interval;
            if !self.frame()? {
                return Ok(Stopped::Quit { frames });
            }
            frames += 1;
            let now = Instant::now();
            if now < deadline {
                spin_sleep::sleep(deadline - now);
            }
        }
    }
}
