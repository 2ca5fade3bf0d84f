//! Recorded pointer scripts: one JSON event per line.
//!
//! ```text
//! # draw a triangle, then grab it
//! {"kind":"down","position":{"x":0,"y":0}}
//! {"kind":"move","position":{"x":0,"y":10}}
//! {"kind":"move","position":{"x":10,"y":10}}
//! {"kind":"up","position":{"x":10,"y":10}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A `cancel` line may
//! omit `position`.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::io::BufRead;

use piecework::Point;
use piecework::input::{PointerEvent, PointerKind};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read event script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: `{kind}` event needs a position")]
    MissingPosition { line: usize, kind: &'static str },
}

#[derive(Debug, Deserialize)]
struct ScriptLine {
    kind: PointerKind,
    #[serde(default)]
    position: Option<Point>,
}

fn kind_name(kind: PointerKind) -> &'static str {
    match kind {
        PointerKind::Down => "down",
        PointerKind::Move => "move",
        PointerKind::Up => "up",
        PointerKind::Cancel => "cancel",
    }
}

/// Parse a whole script into events, in file order.
///
/// # Errors
///
/// Returns [`ScriptError`] on a read failure or the first malformed line.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<PointerEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(event) = parse_line(index + 1, &line)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn parse_line(line_no: usize, raw: &str) -> Result<Option<PointerEvent>, ScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parsed: ScriptLine =
        serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse { line: line_no, source })?;
    let position = match (parsed.kind, parsed.position) {
        (_, Some(p)) => p,
        (PointerKind::Cancel, None) => Point::ZERO,
        (kind, None) => return Err(ScriptError::MissingPosition { line: line_no, kind: kind_name(kind) }),
    };
    Ok(Some(PointerEvent::new(parsed.kind, position)))
}
