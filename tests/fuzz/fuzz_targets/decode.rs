//! Fuzz target for the decoder.
//!
//! Feeds arbitrary bytes as a compressed stream: the decoder must emit
//! bytes or report truncation, never panic or loop.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use shrink::{Config, Decoder};

/// Structured input for decoder fuzzing.
#[derive(Arbitrary, Debug)]
struct DecodeInput {
    /// Requested window parameter (clamped by Config)
    window: u8,
    /// Requested lookahead parameter (clamped by Config)
    lookahead: u8,
    /// Arbitrary bytes presented as a compressed stream
    stream: Vec<u8>,
}

fuzz_target!(|input: DecodeInput| {
    if input.stream.len() > 64 * 1024 {
        return;
    }

    let config = Config::new(input.window, input.lookahead);
    let mut decoder = Decoder::new(input.stream.as_slice(), config);

    // A corrupt stream can legally expand a lot, so cap how much we pull.
    let mut total = 0usize;
    let mut buf = [0u8; 4096];
    while total < 8 * 1024 * 1024 {
        match decoder.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => total += n,
        }
    }
});
