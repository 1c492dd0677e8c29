use crate::error::{Chip8Error, Result};
use crate::framebuffer::SpriteEdge;
use crate::timer::TIMER_HZ;
use std::path::PathBuf;
use std::time::Duration;

/// Instructions run between timer ticks unless told otherwise; 600 a second
/// at 60Hz, which suits most games
pub const DEFAULT_INSTRUCTIONS_PER_TICK: u32 = 10;

/// Everything the driver needs to know to run a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rom: PathBuf,
    pub instructions_per_tick: u32,
    pub tick_hz: u32,
    pub sprite_edge: SpriteEdge,
    /// stop after this many frames; run until quit otherwise
    pub max_frames: Option<u64>,
    pub mute: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rom: PathBuf::new(),
            instructions_per_tick: DEFAULT_INSTRUCTIONS_PER_TICK,
            tick_hz: TIMER_HZ,
            sprite_edge: SpriteEdge::Clip,
            max_frames: None,
            mute: false,
        }
    }
}

impl Config {
    pub fn new(rom: impl Into<PathBuf>) -> Self {
        Config {
            rom: rom.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.instructions_per_tick == 0 {
            return Err(Chip8Error::InvalidConfig(
                "instructions per tick must be at least 1".into(),
            ));
        }
        if self.tick_hz == 0 {
            return Err(Chip8Error::InvalidConfig(
                "tick rate must be at least 1Hz".into(),
            ));
        }
        Ok(())
    }

    /// wall-clock time per tick (and per rendered frame)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }
}
