use std::io::{self, Write};

use crate::overlay::{Visibility, VisibilityTransition};

/// Whatever actually puts overlay lines in front of someone.
pub trait DisplaySurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;

    fn visibility_changed(&mut self, transition: VisibilityTransition) -> io::Result<()>;

    /// Free-form host output (help text, stats). Ignored by default.
    fn notice(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Draws a framed block to any writer. The binary points it at stderr.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        writeln!(self.out, "+--- debug overlay ({} lines) ---", lines.len())?;
        for line in lines {
            writeln!(self.out, "| {line}")?;
        }
        writeln!(self.out, "+---")?;
        self.out.flush()
    }

    fn visibility_changed(&mut self, transition: VisibilityTransition) -> io::Result<()> {
        let word = match transition.to {
            Visibility::Visible => "shown",
            Visibility::Hidden => "hidden",
        };
        writeln!(self.out, "[overlay {word}]")?;
        self.out.flush()
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
