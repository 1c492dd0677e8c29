use crate::framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the interpreter to put the frame buffer on a screen.
/// It should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// draw every pixel of the frame; lit pixels in the foreground colour,
    /// the rest in the background colour
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;
}

// store useful metadata about the screen we're drawing on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolution {
    width: usize,
    height: usize,
}

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.width - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.height - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel that is (or isn't) lit. tui's
    /// y axis points up, so rows go negative.
    fn points<'a>(
        &self,
        frame: &'a FrameBuffer,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.width;
        frame
            .cells()
            .enumerate()
            .filter(move |&(_, cell)| (cell == 1) == lit)
            .map(move |(i, _)| ((i % w) as f64, -1.0 * (i / w) as f64))
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    title: String,
}

impl MonoTermDisplay {
    pub fn new(title: &str) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution {
                width: SCREEN_WIDTH,
                height: SCREEN_HEIGHT,
            },
            title: title.to_string(),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        // nothing sensible to do if the terminal has gone away
        let _ = self.terminal.show_cursor();
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        let resolution = self.resolution;
        let title = self.title.as_str();

        // one terminal cell per CHIP-8 pixel, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + resolution.width as u16,
                2 + resolution.height as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &resolution.points(frame, false).collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &resolution.points(frame, true).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for running without a screen; remembers what it was last asked
/// to draw
#[derive(Debug, Default)]
pub struct DummyDisplay {
    pub frames: u64,
    pub last: Option<[u8; 256]>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = Some(frame.to_packed());
        Ok(())
    }
}
