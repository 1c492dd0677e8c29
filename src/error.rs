use std::io;
use thiserror::Error;

/// Everything that can go wrong while setting up or running a machine
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("couldn't read program: {0}")]
    Read(#[from] io::Error),

    #[error("address {address:#06x} is outside of memory")]
    AddressOutOfRange { address: usize },

    #[error("stack overflow: call at {pc:#06x} nests deeper than 16 levels")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06x} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("key {0:#04x} is not a CHIP-8 key")]
    InvalidKey(u8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("display failed: {0}")]
    Display(io::Error),

    #[error("input failed: {0}")]
    Input(io::Error),

    #[error("sound failed: {0}")]
    Sound(String),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
