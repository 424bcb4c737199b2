use super::buffer::Snapshot;
use super::record::{Level, Record};

/// `#000042 +1500ms WARN  message {key=value, ...}`
pub fn format_record(record: &Record) -> String {
    let mut line = format!(
        "#{:06} {} {:<5} {}",
        record.sequence(),
        record.timestamp(),
        record.level(),
        escape_line(record.message()),
    );
    if !record.context().is_empty() {
        let pairs: Vec<String> = record
            .context()
            .iter()
            .map(|(k, v)| format!("{k}={}", escape_line(v)))
            .collect();
        line.push_str(&format!(" {{{}}}", pairs.join(", ")));
    }
    line
}

/// One line per record, oldest first, keeping only `level` and above.
pub fn render_lines(snapshot: &Snapshot, min_level: Level) -> Vec<String> {
    snapshot
        .iter()
        .filter(|r| r.level() >= min_level)
        .map(format_record)
        .collect()
}

/// Backslash-escapes anything that could break or fake a line break,
/// including the backslash itself, so escaped output stays unambiguous.
fn escape_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.extend(c.escape_unicode()),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}
