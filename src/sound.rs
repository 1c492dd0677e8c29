use crate::timer::Tone;
use beep::beep;
use std::error::Error;

/// The single tone the machine can make. `apply` is called with every
/// timer transition; implementations only have to start and stop.
pub trait Sound {
    fn start(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn is_playing(&self) -> bool;

    fn apply(&mut self, tone: Tone) -> Result<(), Box<dyn Error>> {
        match (tone, self.is_playing()) {
            (Tone::On, false) => self.start(),
            (Tone::Off, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// beeps through the PC speaker
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn start(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.is_beeping
    }
}

/// keeps track of the tone without making any noise
#[derive(Debug, Default)]
pub struct Mute {
    playing: bool,
    pub starts: u32,
    pub stops: u32,
}

impl Mute {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for Mute {
    fn start(&mut self) -> Result<(), Box<dyn Error>> {
        self.playing = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.playing = false;
        self.stops += 1;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
