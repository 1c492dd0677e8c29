/// Rate the delay and sound timers count down at
pub const TIMER_HZ: u32 = 60;

/// Tone state the host's audio device should be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    On,
    Off,
}

/// The delay and sound timers. Both count down once per tick, independently
/// of how many instructions run in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count both timers down by one. Returns `Some(Tone::On)` while the
    /// sound timer is still running, `Some(Tone::Off)` on the tick that
    /// takes it to zero, and `None` when it was already silent.
    pub fn tick(&mut self) -> Option<Tone> {
        if self.delay > 0 {
            self.delay -= 1;
        }
        if self.sound == 0 {
            return None;
        }
        self.sound -= 1;
        if self.sound > 0 {
            Some(Tone::On)
        } else {
            Some(Tone::Off)
        }
    }

    pub fn tone(&self) -> Tone {
        if self.sound > 0 {
            Tone::On
        } else {
            Tone::Off
        }
    }
}
