use std::fmt;
use std::time::Duration;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: WebVTT cue segmentation and timestamp parsing

static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}").unwrap()
});

// Anything shaped like a timing line
static ARROW_SHAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d[^\s]*:[^\s]+\s+-->\s+[^\s]+\s*$").unwrap()
});

static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+").unwrap()
});

/// Arrow separating start and end on a timing line
pub const TIMING_ARROW: &str = " --> ";

/// Start and end of a timed cue, along with the line they are written as.
///
/// Timings read from a document keep their source line byte for byte, cue
/// settings included. Timings built from durations use the canonical
/// `HH:MM:SS.mmm --> HH:MM:SS.mmm` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTiming {
    pub start: Duration,
    pub end: Duration,
    line: String,
}

impl CueTiming {
    pub fn new(start: Duration, end: Duration) -> Self {
        let line = format!("{}{}{}", format_timestamp(start), TIMING_ARROW, format_timestamp(end));
        Self { start, end, line }
    }

    /// The timing line as it will be written out
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Parse a `HH:MM:SS.mmm --> HH:MM:SS.mmm` line, keeping it verbatim
    pub fn parse(line: &str) -> Result<Self, SubtitleError> {
        let (start, end) = line.trim().split_once(TIMING_ARROW.trim())
            .ok_or_else(|| SubtitleError::malformed(line, "missing '-->' separator"))?;

        let start = parse_timestamp(start.trim())
            .map_err(|e| e.with_line(line))?;
        // Cue settings may follow the end time
        let end = end.split_whitespace().next().unwrap_or_default();
        let end = parse_timestamp(end)
            .map_err(|e| e.with_line(line))?;

        Ok(Self { start, end, line: line.to_string() })
    }
}

impl fmt::Display for CueTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// One subtitle cue: optional timing plus its text on a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub timing: Option<CueTiming>,
    pub text: String,
}

impl Cue {
    pub fn timed(start: Duration, end: Duration, text: impl Into<String>) -> Self {
        Self {
            timing: Some(CueTiming::new(start, end)),
            text: text.into(),
        }
    }

    pub fn untimed(text: impl Into<String>) -> Self {
        Self {
            timing: None,
            text: text.into(),
        }
    }

    pub fn is_timed(&self) -> bool {
        self.timing.is_some()
    }
}

/// Split raw VTT content into ordered cues.
///
/// Blocks are separated by one or more blank lines. A block is timed when it
/// has at least two lines and the first one is a timing line; every other
/// block is untimed and keeps all of its lines as text. The lines making up
/// a cue's text are joined with a single space.
///
/// A block whose first line looks like a timing line but does not parse
/// fails the whole document with [`SubtitleError::MalformedTimestamp`].
pub fn segment(content: &str) -> Result<Vec<Cue>, SubtitleError> {
    let normalized = content.replace("\r\n", "\n");
    let trimmed = normalized.trim();

    if trimmed.is_empty() {
        debug!("Empty subtitle content, no cues to segment");
        return Ok(Vec::new());
    }

    let mut cues = Vec::new();

    for block in BLOCK_SEPARATOR_REGEX.split(trimmed) {
        let lines: Vec<&str> = block.split('\n').collect();
        cues.push(parse_block(&lines)?);
    }

    debug!(
        "Segmented {} cues ({} timed)",
        cues.len(),
        cues.iter().filter(|c| c.is_timed()).count()
    );

    Ok(cues)
}

/// Split a leading `WEBVTT` header block off the content.
///
/// Returns the header exactly as written (line breaks kept, CRLF normalised)
/// and the rest of the document. Content without such a header comes back
/// whole.
pub fn split_header(content: &str) -> (Option<String>, String) {
    let normalized = content.replace("\r\n", "\n");
    let body = normalized.trim_start_matches(['\u{feff}', '\n', ' ', '\t']);

    let is_header = body.strip_prefix("WEBVTT")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '\n']));
    if !is_header {
        return (None, normalized);
    }

    match BLOCK_SEPARATOR_REGEX.find(body) {
        Some(separator) => (
            Some(body[..separator.start()].trim_end().to_string()),
            body[separator.end()..].to_string(),
        ),
        None => (Some(body.trim_end().to_string()), String::new()),
    }
}

fn parse_block(lines: &[&str]) -> Result<Cue, SubtitleError> {
    // A lone timing line has no text to go with it, so it stays untimed
    if lines.len() >= 2 {
        let first = lines[0];

        if TIMESTAMP_REGEX.is_match(first) || ARROW_SHAPE_REGEX.is_match(first) {
            let timing = CueTiming::parse(first)?;
            if timing.end < timing.start {
                warn!("Cue ends before it starts: {}", first.trim());
            }
            return Ok(Cue {
                timing: Some(timing),
                text: lines[1..].join(" "),
            });
        }
    }

    Ok(Cue::untimed(lines.join(" ")))
}

/// Parse a `HH:MM:SS.mmm` timestamp into a duration.
///
/// Fields are read positionally. Hours may have any width; minutes and
/// seconds take exactly two digits below 60 and milliseconds exactly three.
pub fn parse_timestamp(timestamp: &str) -> Result<Duration, SubtitleError> {
    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() != 3 {
        return Err(SubtitleError::malformed(
            timestamp,
            format!("expected 3 ':'-separated fields, found {}", parts.len()),
        ));
    }

    let (seconds, millis) = parts[2].split_once('.')
        .ok_or_else(|| SubtitleError::malformed(timestamp, "missing '.' before milliseconds"))?;

    let hours = parse_field(timestamp, parts[0], "hours")?;
    let minutes = parse_fixed_field(timestamp, parts[1], "minutes", 2, 59)?;
    let seconds = parse_fixed_field(timestamp, seconds, "seconds", 2, 59)?;
    let millis = parse_fixed_field(timestamp, millis, "milliseconds", 3, 999)?;

    hours.checked_mul(3_600_000)
        .and_then(|total| total.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|total| total.checked_add(seconds.checked_mul(1_000)?))
        .and_then(|total| total.checked_add(millis))
        .map(Duration::from_millis)
        .ok_or_else(|| SubtitleError::malformed(timestamp, "timestamp is out of range"))
}

fn parse_field(timestamp: &str, field: &str, name: &str) -> Result<u64, SubtitleError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubtitleError::malformed(
            timestamp,
            format!("{} component '{}' is not numeric", name, field),
        ));
    }
    field.parse().map_err(|_| {
        SubtitleError::malformed(timestamp, format!("{} component '{}' is out of range", name, field))
    })
}

fn parse_fixed_field(
    timestamp: &str,
    field: &str,
    name: &str,
    width: usize,
    max: u64,
) -> Result<u64, SubtitleError> {
    let value = parse_field(timestamp, field, name)?;
    if field.len() != width {
        return Err(SubtitleError::malformed(
            timestamp,
            format!("{} component '{}' must have {} digits", name, field, width),
        ));
    }
    if value > max {
        return Err(SubtitleError::malformed(
            timestamp,
            format!("{} component '{}' is out of range", name, field),
        ));
    }
    Ok(value)
}

/// Format a duration as `HH:MM:SS.mmm`, truncating below the millisecond
pub fn format_timestamp(duration: Duration) -> String {
    let ms = duration.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
