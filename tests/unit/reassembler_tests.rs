/*!
 * Tests for timing synthesis and output assembly
 */

use std::time::Duration;
use vttwai::reassembler::{Clock, Reassembler, DEFAULT_SYNTHETIC_CUE_DURATION};
use vttwai::subtitle_processor::{Cue, CueTiming};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[test]
fn test_reassemble_withTimedCue_shouldKeepTimingLineVerbatim() {
    let pairs = vec![(Cue::timed(Duration::from_millis(1_000), Duration::from_millis(3_500), "Olá"), "Hola")];
    assert_eq!(Reassembler::default().reassemble(&pairs), "00:00:01.000 --> 00:00:03.500\nHola");
}

#[test]
fn test_reassemble_withUntimedRunAfterTimedCue_shouldChainFromItsEnd() {
    let pairs = vec![
        (Cue::timed(secs(10), secs(12), "a"), "A".to_string()),
        (Cue::untimed("b"), "B".to_string()),
        (Cue::untimed("c"), "C".to_string()),
        (Cue::untimed("d"), "D".to_string()),
    ];

    let output = Reassembler::default().reassemble(&pairs);

    assert_eq!(output, [
        "00:00:10.000 --> 00:00:12.000\nA",
        "00:00:12.000 --> 00:00:17.000\nB",
        "00:00:17.000 --> 00:00:22.000\nC",
        "00:00:22.000 --> 00:00:27.000\nD",
    ].join("\n\n"));
}

#[test]
fn test_reassemble_withTimedCueAfterUntimed_shouldJumpClockToItsEnd() {
    let pairs = vec![
        (Cue::untimed("a"), "A"),
        (Cue::timed(secs(60), secs(61), "b"), "B"),
        (Cue::untimed("c"), "C"),
    ];

    let timings = Reassembler::default().resolve_timings(pairs.iter().map(|(cue, _)| cue));

    assert_eq!(timings, vec![
        CueTiming::new(secs(0), secs(5)),
        CueTiming::new(secs(60), secs(61)),
        CueTiming::new(secs(61), secs(66)),
    ]);
}

#[test]
fn test_reassemble_withReversedTimedCue_shouldMoveClockToItsEnd() {
    let pairs = vec![
        (Cue::timed(secs(20), secs(8), "a"), "A"),
        (Cue::untimed("b"), "B"),
    ];

    let output = Reassembler::default().reassemble(&pairs);
    assert!(output.ends_with("00:00:08.000 --> 00:00:13.000\nB"));
}

#[test]
fn test_reassemble_withCustomStep_shouldUseIt() {
    let reassembler = Reassembler::new(Duration::from_millis(2_500));
    let pairs = vec![(Cue::untimed("a"), "A"), (Cue::untimed("b"), "B")];

    assert_eq!(
        reassembler.reassemble(&pairs),
        "00:00:00.000 --> 00:00:02.500\nA\n\n00:00:02.500 --> 00:00:05.000\nB"
    );
}

#[test]
fn test_reassemble_shouldNotEndWithSeparator() {
    let pairs = vec![(Cue::untimed("a"), "A")];
    let output = Reassembler::default().reassemble(&pairs);
    assert!(!output.ends_with('\n'));
}

#[test]
fn test_reassemble_shouldPreserveInputOrder() {
    let pairs: Vec<(Cue, String)> = (0..20)
        .map(|i| (Cue::untimed(format!("t{}", i)), format!("T{}", i)))
        .collect();

    let output = Reassembler::default().reassemble(&pairs);
    let texts: Vec<&str> = output.split("\n\n")
        .map(|block| block.lines().nth(1).unwrap_or_default())
        .collect();

    let expected: Vec<String> = (0..20).map(|i| format!("T{}", i)).collect();
    assert_eq!(texts, expected);
}

#[test]
fn test_clock_jump_to_thenAdvance_shouldStartFromJumpedTime() {
    let mut clock = Clock::new();
    clock.jump_to(secs(30));
    assert_eq!(clock.advance(DEFAULT_SYNTHETIC_CUE_DURATION), CueTiming::new(secs(30), secs(35)));
    assert_eq!(clock.now(), secs(35));
}

#[test]
fn test_default_reassembler_shouldUseFiveSeconds() {
    assert_eq!(Reassembler::default().synthetic_cue_duration(), secs(5));
}
