use crate::error::{Chip8Error, Result};
use log::info;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine. Every access is bounds
/// checked; stepping outside of memory is an error, never a wrap.
pub trait MemoryMap {
    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]>;

    /// write a chunk of bytes into RAM
    fn write(&mut self, data: &[u8], addr: u16) -> Result<()> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    fn get_byte(&self, addr: u16) -> Result<u8> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(((word[0] as u16) << 8) | (word[1] as u16))
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// largest program that fits between the load address and the top of memory
pub const CHIP8_MAX_PROGRAM_BYTES: usize = 0x0fff - CHIP8_PROGRAM_ADDR as usize;

/// where the hex digit glyphs live
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map as this interpreter lays it out:
///   0x0000-0x004f  unused
///   0x0050-0x009f  hex digit font
///   0x00a0-0x01ff  unused
///   0x0200-0x0fff  program
///
/// unlike the COSMAC VIP, the stack, timers and display live outside of RAM,
/// so programs can't scribble on them
pub struct Chip8Memory {
    bytes: Box<[u8; CHIP8_RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8Memory {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let a = check_range(addr, len)?;
        Ok(&mut self.bytes[a..(a + len)])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let a = check_range(addr, len)?;
        Ok(&self.bytes[a..(a + len)])
    }
}

fn check_range(addr: u16, len: usize) -> Result<usize> {
    let a = addr as usize;
    if a + len > CHIP8_RAM_SIZE_BYTES {
        return Err(Chip8Error::AddressOutOfRange {
            address: a + len.max(1) - 1,
        });
    }
    Ok(a)
}

impl Chip8Memory {
    /// zeroed RAM with the font baked in at 0x050
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; CHIP8_RAM_SIZE_BYTES]);
        let font = CHIP8_FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8Memory { bytes }
    }

    /// load a CHIP-8 program at 0x200, returning how many bytes were loaded
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_bytes(&buf)?;
        Ok(buf.len())
    }

    /// copy an in-memory program to 0x200
    pub fn load_bytes(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(program, CHIP8_PROGRAM_ADDR)?;
        info!("loaded {} byte program at {:#05x}", program.len(), CHIP8_PROGRAM_ADDR);
        Ok(())
    }

    /// address of the glyph for the low nibble of `digit`
    pub fn glyph_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + (digit & 0x0f) as u16 * CHIP8_FONT_GLYPH_BYTES
    }
}

impl Default for Chip8Memory {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
