//! Fuzz target for encoder/decoder round trips.
//!
//! Tests that any input under any clamped parameter pair compresses and
//! decompresses back to itself without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use shrink::{Config, Decoder, Encoder};
use std::io::Read;

/// Structured input for round-trip fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundTripInput {
    /// Requested window parameter (clamped by Config)
    window: u8,
    /// Requested lookahead parameter (clamped by Config)
    lookahead: u8,
    /// Raw data to compress
    data: Vec<u8>,
}

fuzz_target!(|input: RoundTripInput| {
    // Limit input size to avoid OOM
    if input.data.len() > 256 * 1024 {
        return;
    }

    // Config clamps arbitrary parameters into the valid ranges
    let config = Config::new(input.window, input.lookahead);

    let mut encoder = Encoder::new(Vec::new(), config);
    encoder.write(&input.data).expect("write to Vec cannot fail");
    let encoded = encoder.finish().expect("finish to Vec cannot fail");

    let mut decoder = Decoder::new(encoded.as_slice(), config);
    let mut decoded = Vec::with_capacity(input.data.len());
    decoder.read_to_end(&mut decoded).expect("decode own output");

    assert_eq!(decoded, input.data, "round trip mismatch");
});
