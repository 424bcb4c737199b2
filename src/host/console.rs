//! Line-oriented console host: each input line is either a `:command` or a
//! diagnostic to capture.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::surface::DisplaySurface;
use crate::overlay::{Level, OverlayController};

pub const HELP: &str = "\
commands:
  :show | :hide | :toggle   change overlay visibility
  :clear                    drop all captured records
  :cap N                    resize the buffer, keeping the newest N
  :stats                    print a summary
  :json                     print held records as JSON lines
  :help                     this text
  :quit                     stop reading input
anything else is captured: [debug|info|warn|error] message [key=value ...]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Hide,
    Toggle,
    Clear,
    SetCapacity(usize),
    Stats,
    Json,
    Help,
    Quit,
    Capture {
        level: Level,
        message: String,
        context: Vec<(String, String)>,
    },
    /// Not understood; carries the reason shown to the user.
    Invalid(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    if let Some(rest) = line.strip_prefix(':') {
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("");
        let arg = words.next();
        return match (name, arg) {
            ("show", None) => Command::Show,
            ("hide", None) => Command::Hide,
            ("toggle", None) => Command::Toggle,
            ("clear", None) => Command::Clear,
            ("stats", None) => Command::Stats,
            ("json", None) => Command::Json,
            ("help", None) => Command::Help,
            ("quit", None) | ("q", None) => Command::Quit,
            ("cap", Some(n)) => match n.parse() {
                Ok(n) => Command::SetCapacity(n),
                Err(_) => Command::Invalid(format!("not a capacity: {n}")),
            },
            ("cap", None) => Command::Invalid("usage: :cap N".into()),
            _ => Command::Invalid(format!("unknown command: {line}")),
        };
    }

    // a leading level word only counts when something follows it
    let (level, mut rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => match Level::from_label(first) {
            Some(level) => (level, rest.trim_start()),
            None => (Level::Info, line),
        },
        None => (Level::Info, line),
    };

    // trailing key=value tokens become context; the message keeps its own spacing
    let mut context = Vec::new();
    while let Some(pos) = rest.rfind(char::is_whitespace) {
        let Some((k, v)) = rest[pos..].trim_start().split_once('=') else {
            break;
        };
        context.push((k.to_string(), v.to_string()));
        rest = rest[..pos].trim_end();
    }
    context.reverse();

    Command::Capture {
        level,
        message: rest.to_string(),
        context,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleStats {
    pub lines: u64,
    pub captured: u64,
    pub rejected: u64,
}

/// Applies one command. Returns false when the host should stop.
pub fn apply<S>(
    command: Command,
    overlay: &mut OverlayController,
    surface: &mut S,
    stats: &mut ConsoleStats,
) -> io::Result<bool>
where
    S: DisplaySurface + ?Sized,
{
    match command {
        Command::Empty => {}
        Command::Quit => return Ok(false),
        Command::Show | Command::Hide | Command::Toggle => {
            let transition = match command {
                Command::Show => overlay.show(),
                Command::Hide => overlay.hide(),
                _ => overlay.toggle(),
            };
            if let Some(t) = transition {
                surface.visibility_changed(t)?;
            }
            overlay.present(surface)?;
        }
        Command::Clear => {
            overlay.clear();
            overlay.present(surface)?;
        }
        Command::SetCapacity(n) => match overlay.set_capacity(n) {
            Ok(()) => overlay.present(surface)?,
            Err(e) => {
                stats.rejected += 1;
                surface.notice(&format!("error: {e}"))?;
            }
        },
        Command::Stats => surface.notice(&overlay.summary().one_line())?,
        Command::Json => {
            let lines = overlay.export_json_lines().map_err(io::Error::other)?;
            for line in lines {
                surface.notice(&line)?;
            }
        }
        Command::Help => surface.notice(HELP)?,
        Command::Invalid(reason) => {
            stats.rejected += 1;
            warn!(%reason, "console command rejected");
            surface.notice(&format!("error: {reason}"))?;
        }
        Command::Capture {
            level,
            message,
            context,
        } => {
            let sequence = overlay.capture(level, message, context);
            stats.captured += 1;
            debug!(sequence, "console capture");
            overlay.present(surface)?;
        }
    }
    Ok(true)
}

/// Drives the overlay from `reader` until EOF or `:quit`.
pub async fn run<R, S>(
    reader: R,
    overlay: &mut OverlayController,
    surface: &mut S,
) -> io::Result<ConsoleStats>
where
    R: AsyncBufRead + Unpin,
    S: DisplaySurface + ?Sized,
{
    let mut stats = ConsoleStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;
        if !apply(parse_command(&line), overlay, surface, &mut stats)? {
            break;
        }
    }

    Ok(stats)
}
