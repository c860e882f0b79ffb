//! Fuzz target: `QuadratureDecoder::on_channel_a`
//!
//! Drives arbitrary pin-level sequences through the decoder and asserts
//! that it never panics and that the accumulated position always equals
//! an independently replayed signed falling-edge count.
//!
//! cargo fuzz run fuzz_decoder

#![no_main]

use knobview::encoder::{Direction, EncoderState, QuadratureDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&first, samples)) = data.split_first() else {
        return;
    };
    let initial_a = first & 1 != 0;

    let mut decoder = QuadratureDecoder::new(initial_a);
    let state = EncoderState::new();

    // Replay model alongside the decoder.
    let mut prev_a = initial_a;
    let mut expected = 0i64;

    for &byte in samples {
        let a = byte & 1 != 0;
        let b = byte & 2 != 0;

        let fired = decoder.on_channel_a(a, b);
        if a != prev_a && !a {
            expected += if b { 1 } else { -1 };
            let dir = if b {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
            assert_eq!(fired, Some(dir));
            state.record(dir);
        } else {
            assert_eq!(fired, None);
        }
        prev_a = a;
    }

    // Bounded input (< 2^31 samples), so no wrapping to account for.
    assert_eq!(i64::from(state.snapshot().0), expected);
});
