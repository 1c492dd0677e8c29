use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// map of host keys to CHIP-8 keys, using the left-hand side of a qwerty
/// keyboard in reading order:
///
///   1 2 3 4      0 1 2 3
///   q w e r  =>  4 5 6 7
///   a s d f      8 9 a b
///   z x c v      c d e f
pub const CHIP8_KEYMAP: [(char, u8); 16] = [
    ('1', 0x00),
    ('2', 0x01),
    ('3', 0x02),
    ('4', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('r', 0x07),
    ('a', 0x08),
    ('s', 0x09),
    ('d', 0x0a),
    ('f', 0x0b),
    ('z', 0x0c),
    ('x', 0x0d),
    ('c', 0x0e),
    ('v', 0x0f),
];

/// something the host wants the machine to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: u8, pressed: bool },
    Quit,
}

/// reads key presses and releases
pub trait Input {
    /// everything that has happened since the last poll, oldest first;
    /// never blocks
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error>;
}

/// terminals only report presses, so a key counts as held for this many
/// polls after its last press (auto-repeat keeps it held)
const STDIN_HOLD_POLLS: u8 = 6;

/// simple implementation of Input, using STDIN in raw mode
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    held: [u8; 16],
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: HashMap::from(CHIP8_KEYMAP),
            held: [0; 16],
        })
    }

    /// release keys that haven't been pressed again recently
    fn expire_held(&mut self, events: &mut Vec<InputEvent>) {
        for (key, polls) in self.held.iter_mut().enumerate() {
            if *polls == 0 {
                continue;
            }
            *polls -= 1;
            if *polls == 0 {
                events.push(InputEvent::Key {
                    key: key as u8,
                    pressed: false,
                });
            }
        }
    }

    fn press(&mut self, key: u8, events: &mut Vec<InputEvent>) {
        let polls = &mut self.held[key as usize];
        if *polls == 0 {
            events.push(InputEvent::Key { key, pressed: true });
        }
        *polls = STDIN_HOLD_POLLS;
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        let mut events = Vec::new();
        self.expire_held(&mut events);
        while poll(Duration::from_millis(0))? {
            let evt = match read()? {
                Event::Key(evt) => evt,
                _ => continue,
            };
            match evt.code {
                KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                    events.push(InputEvent::Quit)
                }
                KeyCode::Esc => events.push(InputEvent::Quit),
                KeyCode::Char(c) => match self.keymap.get(&c.to_ascii_lowercase()) {
                    Some(&key) => self.press(key, &mut events),
                    None => warn!("can't map {:?} to a CHIP-8 key", c),
                },
                other => debug!("ignoring key {:?}", other),
            }
        }
        Ok(events)
    }
}

/// scripted Input implementation for testing; each poll hands out the next
/// batch of events
pub struct DummyInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl DummyInput {
    pub fn new(batches: Vec<Vec<InputEvent>>) -> Self {
        DummyInput {
            batches: VecDeque::from(batches),
        }
    }

    /// never reports anything
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
