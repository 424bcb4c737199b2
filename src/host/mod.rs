//! Adapters between the overlay core and whatever hosts it.

pub mod console;
pub mod surface;

pub use console::{parse_command, Command, ConsoleStats};
pub use surface::{DisplaySurface, TerminalSurface};
