use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use chip8vm::config::{Config, DEFAULT_INSTRUCTIONS_PER_TICK};
use chip8vm::display::MonoTermDisplay;
use chip8vm::input::StdinInput;
use chip8vm::interpreter::{Chip8Interpreter, Stopped};
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::timer::TIMER_HZ;
use chip8vm::SpriteEdge;

/// Run a CHIP-8 program in the terminal. Keys 1234/qwer/asdf/zxcv are the
/// keypad; Esc quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// program to run
    rom: PathBuf,

    /// instructions executed per timer tick
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_TICK)]
    ipt: u32,

    /// timer tick (and frame) rate in Hz
    #[arg(long, default_value_t = TIMER_HZ)]
    hz: u32,

    /// wrap sprites around the screen edges instead of clipping them
    #[arg(long)]
    wrap: bool,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// don't beep
    #[arg(long)]
    mute: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            rom: args.rom,
            instructions_per_tick: args.ipt,
            tick_hz: args.hz,
            sprite_edge: if args.wrap {
                SpriteEdge::Wrap
            } else {
                SpriteEdge::Clip
            },
            max_frames: args.frames,
            mute: args.mute,
        }
    }
}

fn run(config: Config, sound: &mut impl Sound) -> Result<Stopped, Box<dyn Error>> {
    // initialise
    let mut display = MonoTermDisplay::new("CHIP-8")?;
    let mut input = StdinInput::new()?;
    let mut interpreter = Chip8Interpreter::new(config, &mut display, &mut input, sound)?;

    // load a program
    let len = interpreter.load_rom()?;
    info!("running {} byte program", len);

    let stopped = interpreter.main_loop();
    drop(interpreter);

    // don't leave the speaker going
    if sound.is_playing() {
        sound.stop()?;
    }
    Ok(stopped?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::from(Args::parse());
    config.validate()?;

    let stopped = if config.mute {
        run(config, &mut Mute::new())?
    } else {
        run(config, &mut SimpleBeep::new())?
    };

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    info!("{:?}", stopped);
    Ok(())
}
