/*!
 * Reassembly of translated cues into a fully timed VTT document.
 *
 * Timed cues keep their own timing line as written. Untimed cues get a synthetic timing
 * taken from a running clock that follows the document: it jumps to the end
 * of every timed cue and moves forward by a fixed step for every untimed one.
 */

use std::time::Duration;
use log::debug;

use crate::subtitle_processor::{Cue, CueTiming};

/// Separator between two output blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Length given to a cue that had no timing in the source
pub const DEFAULT_SYNTHETIC_CUE_DURATION: Duration = Duration::from_secs(5);

/// Running time cursor used to synthesize timings for untimed cues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    now: Duration,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Jump to the end of a timed cue
    pub fn jump_to(&mut self, at: Duration) {
        self.now = at;
    }

    /// Hand out `[now, now + step]` and move past it
    pub fn advance(&mut self, step: Duration) -> CueTiming {
        let start = self.now;
        self.now = start.saturating_add(step);
        CueTiming::new(start, self.now)
    }
}

/// Builds the output document from cues and their translations
#[derive(Debug, Clone)]
pub struct Reassembler {
    synthetic_cue_duration: Duration,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_CUE_DURATION)
    }
}

impl Reassembler {
    pub fn new(synthetic_cue_duration: Duration) -> Self {
        Self { synthetic_cue_duration }
    }

    pub fn synthetic_cue_duration(&self) -> Duration {
        self.synthetic_cue_duration
    }

    /// Resolve the timing every cue will be written with, in document order
    pub fn resolve_timings<'a, I>(&self, cues: I) -> Vec<CueTiming>
    where
        I: IntoIterator<Item = &'a Cue>,
    {
        let mut clock = Clock::new();

        cues.into_iter()
            .map(|cue| match &cue.timing {
                Some(timing) => {
                    clock.jump_to(timing.end);
                    timing.clone()
                }
                None => clock.advance(self.synthetic_cue_duration),
            })
            .collect()
    }

    /// Emit one `timing\ntext` block per cue, joined by a blank line
    pub fn reassemble<S: AsRef<str>>(&self, pairs: &[(Cue, S)]) -> String {
        let timings = self.resolve_timings(pairs.iter().map(|(cue, _)| cue));

        let blocks: Vec<String> = timings.iter()
            .zip(pairs)
            .map(|(timing, (_, text))| {
                let text: &str = text.as_ref();
                format!("{}\n{}", timing, text)
            })
            .collect();

        debug!(
            "Reassembled {} blocks ({} with synthetic timing)",
            blocks.len(),
            pairs.iter().filter(|(cue, _)| !cue.is_timed()).count()
        );

        blocks.join(BLOCK_SEPARATOR)
    }
}
