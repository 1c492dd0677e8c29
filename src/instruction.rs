//! # instruction
//!
//! Decodes 16-bit instruction words into a tagged enum. Field names follow
//! the usual CHIP-8 notation:
//!
//!  * `x`, `y`  - register nibbles (bits 8-11 and 4-7)
//!  * `n`       - low nibble
//!  * `nn`      - low byte
//!  * `nnn`     - low 12 bits, an address
//!
//! The `Display` impl renders the conventional assembler mnemonics, which is
//! what ends up in the trace log.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jump { nnn: u16 },
    /// 2nnn
    Call { nnn: u16 },
    /// 3xnn
    SkipEqImm { x: usize, nn: u8 },
    /// 4xnn
    SkipNeImm { x: usize, nn: u8 },
    /// 5xy0
    SkipEqReg { x: usize, y: usize },
    /// 6xnn
    LoadImm { x: usize, nn: u8 },
    /// 7xnn
    AddImm { x: usize, nn: u8 },
    /// 8xy0
    Move { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    AddReg { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6
    ShiftRight { x: usize, y: usize },
    /// 8xy7
    SubN { x: usize, y: usize },
    /// 8xyE
    ShiftLeft { x: usize, y: usize },
    /// 9xy0
    SkipNeReg { x: usize, y: usize },
    /// Annn
    LoadI { nnn: u16 },
    /// Bnnn
    JumpV0 { nnn: u16 },
    /// Cxnn
    Random { x: usize, nn: u8 },
    /// Dxyn
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E
    SkipKey { x: usize },
    /// ExA1
    SkipNotKey { x: usize },
    /// Fx07
    LoadDelay { x: usize },
    /// Fx0A
    WaitKey { x: usize },
    /// Fx15
    SetDelay { x: usize },
    /// Fx18
    SetSound { x: usize },
    /// Fx1E
    AddI { x: usize },
    /// Fx29
    LoadGlyph { x: usize },
    /// Fx33
    StoreBcd { x: usize },
    /// Fx55
    StoreRegs { x: usize },
    /// Fx65
    LoadRegs { x: usize },
    /// anything else; executed as a two-byte no-op
    Unknown(u16),
}

impl Instruction {
    pub fn decode(opcode: u16) -> Instruction {
        use Instruction::*;

        let x = ((opcode >> 8) & 0x0f) as usize;
        let y = ((opcode >> 4) & 0x0f) as usize;
        let n = (opcode & 0x000f) as u8;
        let nn = (opcode & 0x00ff) as u8;
        let nnn = opcode & 0x0fff;

        match opcode & 0xf000 {
            0x0000 => match opcode {
                0x00e0 => Cls,
                0x00ee => Ret,
                _ => Unknown(opcode),
            },
            0x1000 => Jump { nnn },
            0x2000 => Call { nnn },
            0x3000 => SkipEqImm { x, nn },
            0x4000 => SkipNeImm { x, nn },
            0x5000 if n == 0 => SkipEqReg { x, y },
            0x6000 => LoadImm { x, nn },
            0x7000 => AddImm { x, nn },
            0x8000 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubN { x, y },
                0xe => ShiftLeft { x, y },
                _ => Unknown(opcode),
            },
            0x9000 if n == 0 => SkipNeReg { x, y },
            0xa000 => LoadI { nnn },
            0xb000 => JumpV0 { nnn },
            0xc000 => Random { x, nn },
            0xd000 => Draw { x, y, n },
            0xe000 => match nn {
                0x9e => SkipKey { x },
                0xa1 => SkipNotKey { x },
                _ => Unknown(opcode),
            },
            0xf000 => match nn {
                0x07 => LoadDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddI { x },
                0x29 => LoadGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => Unknown(opcode),
            },
            _ => Unknown(opcode),
        }
    }
}

impl From<u16> for Instruction {
    fn from(opcode: u16) -> Self {
        Instruction::decode(opcode)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:03x}", nnn),
            Call { nnn } => write!(f, "CALL {:03x}", nnn),
            SkipEqImm { x, nn } => write!(f, "SE V{:x}, {:02x}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:x}, {:02x}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:x}, V{:x}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:x}, {:02x}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:x}, {:02x}", x, nn),
            Move { x, y } => write!(f, "LD V{:x}, V{:x}", x, y),
            Or { x, y } => write!(f, "OR V{:x}, V{:x}", x, y),
            And { x, y } => write!(f, "AND V{:x}, V{:x}", x, y),
            Xor { x, y } => write!(f, "XOR V{:x}, V{:x}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:x}, V{:x}", x, y),
            Sub { x, y } => write!(f, "SUB V{:x}, V{:x}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:x} {{, V{:x}}}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:x}, V{:x}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:x} {{, V{:x}}}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:x}, V{:x}", x, y),
            LoadI { nnn } => write!(f, "LD I, {:03x}", nnn),
            JumpV0 { nnn } => write!(f, "JP V0, {:03x}", nnn),
            Random { x, nn } => write!(f, "RND V{:x}, {:02x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:x}, V{:x}, {:x}", x, y, n),
            SkipKey { x } => write!(f, "SKP V{:x}", x),
            SkipNotKey { x } => write!(f, "SKNP V{:x}", x),
            LoadDelay { x } => write!(f, "LD V{:x}, DT", x),
            WaitKey { x } => write!(f, "LD V{:x}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:x}", x),
            SetSound { x } => write!(f, "LD ST, V{:x}", x),
            AddI { x } => write!(f, "ADD I, V{:x}", x),
            LoadGlyph { x } => write!(f, "LD F, V{:x}", x),
            StoreBcd { x } => write!(f, "LD B, V{:x}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:x}", x),
            LoadRegs { x } => write!(f, "LD V{:x}, [I]", x),
            Unknown(opcode) => write!(f, "not supported ({:04x})", opcode),
        }
    }
}
