//! # machine
//!
//! The complete CHIP-8 machine state and the fetch/decode/execute step.
//!
//!  * memory    - 4K of RAM, font at 0x050, program from 0x200
//!  * V0-VF     - byte registers; VF doubles as carry/borrow/collision flag
//!  * I         - 16-bit address register, checked when dereferenced
//!  * PC        - starts at 0x200, always points at the next instruction
//!  * stack     - 16 return addresses, SP is the next free slot
//!  * timers    - delay and sound, counted down by `tick_60hz`
//!  * display   - 64x32 one-bit frame buffer
//!  * keypad    - 16 keys, latched by the host through `set_key`
//!
//! The host owns the machine outright and drives it through `step`,
//! `tick_60hz` and `set_key`; there's no global state, so each machine is
//! independent.
//!
//! A step either completes or fails without touching anything: addresses
//! and stack depth are checked before any register, memory or PC write.
use crate::error::{Chip8Error, Result};
use crate::framebuffer::{FrameBuffer, SpriteEdge};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{Chip8Memory, MemoryMap, CHIP8_PROGRAM_ADDR};
use crate::timer::{Timers, Tone};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io;
use std::path::Path;

pub const STACK_DEPTH: usize = 16;
pub const REGISTER_COUNT: usize = 16;

/// flag register
const VF: usize = 0xf;

/// bytes per instruction
const INSTRUCTION_BYTES: u16 = 2;

/// What a call to `step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// hit `Fx0A` with no key down; the same instruction runs again next step
    WaitingForKey,
}

/// how the program counter moves once an instruction has taken effect
enum Flow {
    Next,
    SkipIf(bool),
    Jump(u16),
    Wait,
}

pub struct Machine {
    memory: Chip8Memory,
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: usize,
    timers: Timers,
    display: FrameBuffer,
    keypad: Keypad,
    rng: StdRng,
    unknown_opcodes: u64,
}

impl Machine {
    /// a freshly initialised machine, clipping sprites at the screen edge
    pub fn new() -> Self {
        Self::build(SpriteEdge::default(), StdRng::from_entropy())
    }

    fn build(edge: SpriteEdge, rng: StdRng) -> Self {
        Machine {
            memory: Chip8Memory::new(),
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            timers: Timers::new(),
            display: FrameBuffer::new(edge),
            keypad: Keypad::new(),
            rng,
            unknown_opcodes: 0,
        }
    }

    pub fn with_sprite_edge(mut self, edge: SpriteEdge) -> Self {
        self.display = FrameBuffer::new(edge);
        self
    }

    /// make `Cxnn` repeatable
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// back to power-on state; the loaded program is wiped too
    pub fn reset(&mut self) {
        let edge = self.display.edge();
        let rng = self.rng.clone();
        *self = Self::build(edge, rng);
    }

    /// copy a program to 0x200, returning its length
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.memory.load_program(reader)
    }

    pub fn load_program_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        debug!("loading program from {}", path.display());
        let mut file = File::open(path)?;
        self.load_program(&mut file)
    }

    pub fn load_bytes(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_bytes(program)
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        debug!("key {:x} {}", key, if pressed { "down" } else { "up" });
        self.keypad.set_key(key, pressed)
    }

    /// count the timers down; call this at 60Hz however many steps run
    pub fn tick_60hz(&mut self) -> Option<Tone> {
        self.timers.tick()
    }

    /// fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<Step> {
        let opcode = self.memory.get_word(self.pc)?;
        let instruction = Instruction::decode(opcode);
        trace!("{:03x}  {:04x}  {}", self.pc, opcode, instruction);

        match self.execute(instruction)? {
            Flow::Next => self.pc += INSTRUCTION_BYTES,
            Flow::SkipIf(true) => self.pc += 2 * INSTRUCTION_BYTES,
            Flow::SkipIf(false) => self.pc += INSTRUCTION_BYTES,
            Flow::Jump(addr) => self.pc = addr,
            Flow::Wait => return Ok(Step::WaitingForKey),
        }
        Ok(Step::Executed(instruction))
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Flow> {
        use Instruction::*;

        let flow = match instruction {
            Cls => {
                self.display.clear();
                Flow::Next
            }
            Ret => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { pc: self.pc });
                }
                self.sp -= 1;
                // the stack holds the address of the call itself
                Flow::Jump(self.stack[self.sp] + INSTRUCTION_BYTES)
            }
            Jump { nnn } => Flow::Jump(nnn),
            Call { nnn } => {
                if self.sp == STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow { pc: self.pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                Flow::Jump(nnn)
            }
            SkipEqImm { x, nn } => Flow::SkipIf(self.v[x] == nn),
            SkipNeImm { x, nn } => Flow::SkipIf(self.v[x] != nn),
            SkipEqReg { x, y } => Flow::SkipIf(self.v[x] == self.v[y]),
            LoadImm { x, nn } => {
                self.v[x] = nn;
                Flow::Next
            }
            AddImm { x, nn } => {
                self.v[x] = self.v[x].wrapping_add(nn);
                Flow::Next
            }
            Move { x, y } => {
                self.v[x] = self.v[y];
                Flow::Next
            }
            Or { x, y } => {
                self.v[x] |= self.v[y];
                Flow::Next
            }
            And { x, y } => {
                self.v[x] &= self.v[y];
                Flow::Next
            }
            Xor { x, y } => {
                self.v[x] ^= self.v[y];
                Flow::Next
            }
            AddReg { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry as u8);
                Flow::Next
            }
            Sub { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx > vy) as u8);
                Flow::Next
            }
            ShiftRight { x, .. } => {
                let vx = self.v[x];
                self.set_with_flag(x, vx >> 1, vx & 0x01);
                Flow::Next
            }
            SubN { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy > vx) as u8);
                Flow::Next
            }
            ShiftLeft { x, .. } => {
                let vx = self.v[x];
                self.set_with_flag(x, vx << 1, vx >> 7);
                Flow::Next
            }
            SkipNeReg { x, y } => Flow::SkipIf(self.v[x] != self.v[y]),
            LoadI { nnn } => {
                self.i = nnn;
                Flow::Next
            }
            JumpV0 { nnn } => Flow::Jump(nnn + self.v[0] as u16),
            Random { x, nn } => {
                self.v[x] = self.rng.gen::<u8>() & nn;
                Flow::Next
            }
            Draw { x, y, n } => {
                let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
                let collided =
                    self.display
                        .draw_sprite(self.v[x] as usize, self.v[y] as usize, sprite);
                self.v[VF] = collided as u8;
                Flow::Next
            }
            SkipKey { x } => Flow::SkipIf(self.keypad.is_pressed(self.v[x])),
            SkipNotKey { x } => Flow::SkipIf(!self.keypad.is_pressed(self.v[x])),
            LoadDelay { x } => {
                self.v[x] = self.timers.delay;
                Flow::Next
            }
            WaitKey { x } => match self.keypad.pressed_key() {
                Some(key) => {
                    self.v[x] = key;
                    Flow::Next
                }
                None => Flow::Wait,
            },
            SetDelay { x } => {
                self.timers.delay = self.v[x];
                Flow::Next
            }
            SetSound { x } => {
                self.timers.sound = self.v[x];
                Flow::Next
            }
            AddI { x } => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                Flow::Next
            }
            LoadGlyph { x } => {
                self.i = Chip8Memory::glyph_addr(self.v[x]);
                Flow::Next
            }
            StoreBcd { x } => {
                let vx = self.v[x];
                self.memory
                    .write(&[vx / 100, (vx / 10) % 10, vx % 10], self.i)?;
                Flow::Next
            }
            StoreRegs { x } => {
                self.memory.write(&self.v[..=x], self.i)?;
                self.i = self.i.wrapping_add(x as u16 + 1);
                Flow::Next
            }
            LoadRegs { x } => {
                let src = self.memory.get_ro_slice(self.i, x + 1)?;
                self.v[..=x].copy_from_slice(src);
                self.i = self.i.wrapping_add(x as u16 + 1);
                Flow::Next
            }
            Unknown(opcode) => {
                warn!("unknown opcode {:04x} at {:03x}, skipping", opcode, self.pc);
                self.unknown_opcodes += 1;
                Flow::Next
            }
        };
        Ok(flow)
    }

    /// flag first, so that an `x` of F ends up holding the result
    fn set_with_flag(&mut self, x: usize, result: u8, flag: u8) {
        self.v[VF] = flag;
        self.v[x] = result;
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn address_register(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.pc
    }

    pub fn stack_pointer(&self) -> usize {
        self.sp
    }

    /// return addresses currently on the stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn tone(&self) -> Tone {
        self.timers.tone()
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn memory(&self) -> &Chip8Memory {
        &self.memory
    }

    /// how many unrecognised instructions have been skipped
    pub fn unknown_opcodes(&self) -> u64 {
        self.unknown_opcodes
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CHIP8_FONT_ADDR;

    /// a seeded machine with `words` loaded at 0x200
    fn machine_with(words: &[u16]) -> Machine {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        let mut m = Machine::new().with_seed(8);
        m.load_bytes(&bytes).unwrap();
        m
    }

    fn run(m: &mut Machine, steps: usize) -> Result<()> {
        for _ in 0..steps {
            m.step()?;
        }
        Ok(())
    }

    #[test]
    fn test_initial_state() -> Result<()> {
        let m = Machine::new();
        assert_eq!(m.program_counter(), 0x200);
        assert_eq!(m.stack_pointer(), 0);
        assert_eq!(m.address_register(), 0);
        assert_eq!(m.registers(), &[0; 16]);
        assert_eq!(m.timers(), &Timers { delay: 0, sound: 0 });
        assert_eq!(m.display().lit_count(), 0);
        assert_eq!(m.keypad().pressed_key(), None);
        assert_eq!(m.memory().get_byte(CHIP8_FONT_ADDR)?, 0xf0);
        Ok(())
    }

    #[test]
    fn test_load_and_run_two_instructions() -> Result<()> {
        let mut m = Machine::new();
        let mut prog: &[u8] = &[0x6a, 0x02, 0xa2, 0xf0];
        assert_eq!(m.load_program(&mut prog)?, 4);
        run(&mut m, 2)?;
        assert_eq!(m.registers()[0xa], 2);
        assert_eq!(m.address_register(), 0x2f0);
        assert_eq!(m.program_counter(), 0x204);
        Ok(())
    }

    #[test]
    fn test_load_then_skip_always_skips() -> Result<()> {
        for x in 0..16u16 {
            for nn in 0..=255u16 {
                let mut m = machine_with(&[0x6000 | x << 8 | nn, 0x3000 | x << 8 | nn]);
                m.step()?;
                m.step()?;
                assert_eq!(m.program_counter(), 0x206, "x={:x} nn={:02x}", x, nn);
            }
        }
        Ok(())
    }

    #[test]
    fn test_skip_not_taken() -> Result<()> {
        let mut m = machine_with(&[0x6105, 0x3106, 0x4105, 0x5120, 0x9110]);
        run(&mut m, 5)?;
        // V1=5, V2=0, V0=0: every skip is not taken
        assert_eq!(m.program_counter(), 0x20a);
        Ok(())
    }

    #[test]
    fn test_register_skips_taken() -> Result<()> {
        let mut m = machine_with(&[0x5120, 0x0000, 0x6101, 0x9120]);
        m.step()?;
        assert_eq!(m.program_counter(), 0x204);
        run(&mut m, 2)?;
        assert_eq!(m.program_counter(), 0x20a);
        Ok(())
    }

    #[test]
    fn test_add_carry_law() -> Result<()> {
        let mut m = machine_with(&[0x8124]);
        for a in 0..=255u16 {
            for b in 0..=255u16 {
                m.pc = 0x200;
                m.v[1] = a as u8;
                m.v[2] = b as u8;
                m.step()?;
                assert_eq!(m.v[VF], (a + b > 255) as u8);
                assert_eq!(m.v[1] as u16, (a + b) % 256);
            }
        }
        Ok(())
    }

    #[test]
    fn test_shift_right_law() -> Result<()> {
        let mut m = machine_with(&[0x8126]);
        for a in 0..=255u8 {
            m.pc = 0x200;
            m.v[1] = a;
            m.v[2] = 0xff;
            m.step()?;
            assert_eq!(m.v[VF], a & 1);
            assert_eq!(m.v[1], a >> 1);
        }
        Ok(())
    }

    #[test]
    fn test_shift_left_flag_is_high_bit() -> Result<()> {
        let mut m = machine_with(&[0x812e, 0x812e]);
        m.v[1] = 0x81;
        m.step()?;
        assert_eq!((m.v[1], m.v[VF]), (0x02, 1));
        m.step()?;
        assert_eq!((m.v[1], m.v[VF]), (0x04, 0));
        Ok(())
    }

    #[test]
    fn test_sub_and_subn_borrow() -> Result<()> {
        let mut m = machine_with(&[0x8125, 0x8125, 0x8347]);
        m.v[1] = 10;
        m.v[2] = 3;
        m.step()?;
        assert_eq!((m.v[1], m.v[VF]), (7, 1));
        m.v[2] = 7;
        // equal isn't greater, so no flag
        m.step()?;
        assert_eq!((m.v[1], m.v[VF]), (0, 0));
        m.v[3] = 5;
        m.v[4] = 2;
        m.step()?;
        assert_eq!((m.v[3], m.v[VF]), (253, 0));
        Ok(())
    }

    #[test]
    fn test_flag_register_as_target_keeps_result() -> Result<()> {
        let mut m = machine_with(&[0x6ff0, 0x6120, 0x8f14]);
        run(&mut m, 3)?;
        assert_eq!(m.v[VF], 0x10);
        Ok(())
    }

    #[test]
    fn test_logic_and_moves() -> Result<()> {
        let mut m = machine_with(&[0x610c, 0x620a, 0x8121, 0x8322, 0x8423, 0x8520, 0x71fa]);
        m.v[3] = 0x0f;
        m.v[4] = 0xff;
        run(&mut m, 7)?;
        assert_eq!(m.v[1], 0x0e_u8.wrapping_add(0xfa));
        assert_eq!(m.v[3], 0x0a);
        assert_eq!(m.v[4], 0xf5);
        assert_eq!(m.v[5], 0x0a);
        // 7xnn never touches the flag
        assert_eq!(m.v[VF], 0);
        Ok(())
    }

    #[test]
    fn test_bcd() -> Result<()> {
        let mut m = machine_with(&[0xa300, 0xf133, 0xa310, 0xf233]);
        m.v[1] = 234;
        m.v[2] = 7;
        run(&mut m, 4)?;
        assert_eq!(m.memory().get_ro_slice(0x300, 3)?, &[2, 3, 4]);
        assert_eq!(m.memory().get_ro_slice(0x310, 3)?, &[0, 0, 7]);
        Ok(())
    }

    #[test]
    fn test_call_return_round_trip() -> Result<()> {
        // 0x200: call 0x206; 0x202: ld v1, 1; 0x206: ret
        let mut m = machine_with(&[0x2206, 0x6101, 0x0000, 0x00ee]);
        m.step()?;
        assert_eq!(m.program_counter(), 0x206);
        assert_eq!(m.stack(), &[0x200]);
        m.step()?;
        assert_eq!(m.program_counter(), 0x202);
        assert_eq!(m.stack_pointer(), 0);
        m.step()?;
        assert_eq!(m.v[1], 1);
        Ok(())
    }

    #[test]
    fn test_stack_capacity() -> Result<()> {
        // calls itself forever
        let mut m = machine_with(&[0x2200]);
        run(&mut m, STACK_DEPTH)?;
        assert_eq!(m.stack_pointer(), 16);
        let err = m.step();
        assert!(matches!(err, Err(Chip8Error::StackOverflow { pc: 0x200 })));
        assert_eq!(m.stack_pointer(), 16);
        assert_eq!(m.program_counter(), 0x200);
        Ok(())
    }

    #[test]
    fn test_return_with_empty_stack() {
        let mut m = machine_with(&[0x00ee]);
        assert!(matches!(
            m.step(),
            Err(Chip8Error::StackUnderflow { pc: 0x200 })
        ));
        assert_eq!(m.program_counter(), 0x200);
    }

    #[test]
    fn test_jumps() -> Result<()> {
        let mut m = machine_with(&[0x1300]);
        m.step()?;
        assert_eq!(m.program_counter(), 0x300);

        let mut m = machine_with(&[0x6004, 0xb300]);
        run(&mut m, 2)?;
        assert_eq!(m.program_counter(), 0x304);
        Ok(())
    }

    #[test]
    fn test_draw_collision() -> Result<()> {
        let mut m = machine_with(&[0x6003, 0x6104, 0xa300, 0xd011, 0xd011]);
        m.memory.write(&[0x80], 0x300)?;
        run(&mut m, 4)?;
        assert!(m.display().get(3, 4));
        assert_eq!(m.v[VF], 0);
        m.step()?;
        assert!(!m.display().get(3, 4));
        assert_eq!(m.v[VF], 1);
        Ok(())
    }

    #[test]
    fn test_draw_clears_stale_flag() -> Result<()> {
        let mut m = machine_with(&[0x6f01, 0xa300, 0xd001]);
        m.memory.write(&[0x80], 0x300)?;
        run(&mut m, 3)?;
        assert_eq!(m.v[VF], 0);
        Ok(())
    }

    #[test]
    fn test_draw_font_glyph() -> Result<()> {
        // draw "7" at the origin
        let mut m = machine_with(&[0x6007, 0xf029, 0xd115]);
        run(&mut m, 3)?;
        assert_eq!(m.address_register(), CHIP8_FONT_ADDR + 35);
        let packed = m.display().to_packed();
        let rows: Vec<u8> = (0..5).map(|r| packed[r * 8]).collect();
        assert_eq!(rows, vec![0xf0, 0x10, 0x20, 0x40, 0x40]);
        Ok(())
    }

    #[test]
    fn test_clear_screen() -> Result<()> {
        let mut m = machine_with(&[0xa050, 0xd005, 0x00e0]);
        run(&mut m, 2)?;
        assert!(m.display().lit_count() > 0);
        m.step()?;
        assert_eq!(m.display().lit_count(), 0);
        Ok(())
    }

    #[test]
    fn test_wrap_mode_draw() -> Result<()> {
        let mut m = machine_with(&[0x603f, 0xa300, 0xd011]).with_sprite_edge(SpriteEdge::Wrap);
        m.memory.write(&[0xc0], 0x300)?;
        run(&mut m, 3)?;
        assert!(m.display().get(63, 0));
        assert!(m.display().get(0, 0));
        Ok(())
    }

    #[test]
    fn test_draw_out_of_range_sprite() {
        let mut m = machine_with(&[0xafff, 0xd005]);
        m.step().unwrap();
        assert!(matches!(
            m.step(),
            Err(Chip8Error::AddressOutOfRange { address: 0x1003 })
        ));
        assert_eq!(m.program_counter(), 0x202);
        assert_eq!(m.display().lit_count(), 0);
    }

    #[test]
    fn test_wait_for_key_polls() -> Result<()> {
        let mut m = machine_with(&[0xf30a]);
        assert_eq!(m.step()?, Step::WaitingForKey);
        assert_eq!(m.step()?, Step::WaitingForKey);
        assert_eq!(m.program_counter(), 0x200);
        m.set_key(0x5, true)?;
        assert_eq!(m.step()?, Step::Executed(Instruction::WaitKey { x: 3 }));
        assert_eq!(m.v[3], 5);
        assert_eq!(m.program_counter(), 0x202);
        Ok(())
    }

    #[test]
    fn test_key_skips() -> Result<()> {
        let mut m = machine_with(&[0x6109, 0xe19e, 0xe1a1]);
        m.set_key(0x9, true)?;
        run(&mut m, 2)?;
        assert_eq!(m.program_counter(), 0x206);

        let mut m = machine_with(&[0x6109, 0xe19e, 0xe1a1]);
        run(&mut m, 3)?;
        // not pressed: no skip, then skip
        assert_eq!(m.program_counter(), 0x208);
        Ok(())
    }

    #[test]
    fn test_set_key_rejects_bad_index() {
        let mut m = Machine::new();
        assert!(matches!(m.set_key(16, true), Err(Chip8Error::InvalidKey(16))));
    }

    #[test]
    fn test_timer_registers() -> Result<()> {
        let mut m = machine_with(&[0x6003, 0xf015, 0xf018, 0xf107]);
        run(&mut m, 3)?;
        assert_eq!(m.timers(), &Timers { delay: 3, sound: 3 });
        assert_eq!(m.tick_60hz(), Some(Tone::On));
        m.step()?;
        assert_eq!(m.v[1], 2);
        Ok(())
    }

    #[test]
    fn test_sound_timer_stops_once() -> Result<()> {
        let mut m = machine_with(&[0x6001, 0xf018]);
        run(&mut m, 2)?;
        assert_eq!(m.tone(), Tone::On);
        assert_eq!(m.tick_60hz(), Some(Tone::Off));
        assert_eq!(m.timers().sound, 0);
        assert_eq!(m.tick_60hz(), None);
        Ok(())
    }

    #[test]
    fn test_timers_ignore_step_count() -> Result<()> {
        // many steps, no ticks: the timer doesn't move
        let mut m = machine_with(&[0x6009, 0xf015, 0x1204]);
        run(&mut m, 100)?;
        assert_eq!(m.timers().delay, 9);
        Ok(())
    }

    #[test]
    fn test_random_is_masked() -> Result<()> {
        let mut m = machine_with(&[0xc00f, 0xc100, 0x1200]);
        for _ in 0..50 {
            run(&mut m, 3)?;
            assert_eq!(m.v[0] & 0xf0, 0);
            assert_eq!(m.v[1], 0);
        }
        Ok(())
    }

    #[test]
    fn test_random_is_seeded() -> Result<()> {
        let mut a = machine_with(&[0xc0ff]);
        let mut b = machine_with(&[0xc0ff]);
        a.step()?;
        b.step()?;
        assert_eq!(a.v[0], b.v[0]);
        Ok(())
    }

    #[test]
    fn test_store_and_load_registers() -> Result<()> {
        let mut m = machine_with(&[0xa300, 0xf255, 0xa300, 0x6000, 0x6100, 0xf165]);
        m.v[..3].copy_from_slice(&[7, 8, 9]);
        run(&mut m, 2)?;
        assert_eq!(m.memory().get_ro_slice(0x300, 4)?, &[7, 8, 9, 0]);
        assert_eq!(m.address_register(), 0x303);
        run(&mut m, 4)?;
        assert_eq!(&m.v[..3], &[7, 8, 9]);
        assert_eq!(m.address_register(), 0x302);
        Ok(())
    }

    #[test]
    fn test_add_i_is_unmasked() -> Result<()> {
        let mut m = machine_with(&[0xafff, 0x6002, 0xf01e, 0xf065]);
        run(&mut m, 3)?;
        assert_eq!(m.address_register(), 0x1001);
        assert!(matches!(
            m.step(),
            Err(Chip8Error::AddressOutOfRange { address: 0x1001 })
        ));
        assert_eq!(m.program_counter(), 0x206);
        Ok(())
    }

    #[test]
    fn test_store_registers_out_of_range_writes_nothing() {
        let mut m = machine_with(&[0xaffe, 0xf255]);
        m.v[..3].copy_from_slice(&[1, 2, 3]);
        m.step().unwrap();
        assert!(m.step().is_err());
        assert_eq!(m.memory().get_word(0xffe).unwrap(), 0);
        assert_eq!(m.address_register(), 0xffe);
    }

    #[test]
    fn test_fetch_past_end_of_memory() {
        let mut m = machine_with(&[0x1fff]);
        m.step().unwrap();
        assert!(matches!(
            m.step(),
            Err(Chip8Error::AddressOutOfRange { address: 0x1000 })
        ));
    }

    #[test]
    fn test_unknown_opcode_is_skipped() -> Result<()> {
        let mut m = machine_with(&[0x0123, 0xffff, 0x6101]);
        run(&mut m, 3)?;
        assert_eq!(m.unknown_opcodes(), 2);
        assert_eq!(m.v[1], 1);
        assert_eq!(m.program_counter(), 0x206);
        Ok(())
    }

    #[test]
    fn test_reset() -> Result<()> {
        let mut m = machine_with(&[0x6101, 0x2300]);
        run(&mut m, 2)?;
        m.set_key(1, true)?;
        m.reset();
        assert_eq!(m.program_counter(), 0x200);
        assert_eq!(m.stack_pointer(), 0);
        assert_eq!(m.registers(), &[0; 16]);
        assert_eq!(m.keypad().pressed_key(), None);
        assert_eq!(m.memory().get_word(0x200)?, 0);
        Ok(())
    }

    #[test]
    fn test_load_program_from_missing_file() {
        let mut m = Machine::new();
        let res = m.load_program_from_file("/definitely/not/a/rom.ch8");
        assert!(matches!(res, Err(Chip8Error::Read(_))));
    }

    #[test]
    fn test_load_program_from_file() -> Result<()> {
        let path = std::env::temp_dir().join("chip8vm_machine_test.ch8");
        std::fs::write(&path, [0x6a_u8, 0x02])?;
        let mut m = Machine::new();
        assert_eq!(m.load_program_from_file(&path)?, 2);
        std::fs::remove_file(&path)?;
        m.step()?;
        assert_eq!(m.registers()[0xa], 2);
        Ok(())
    }
}
