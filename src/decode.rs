//! Streaming LZSS decompression.
//!
//! The decoder is a suspendable state machine: each step either consumes
//! bits from a bounded refill buffer, emits bytes into the caller's output
//! slice, or stays put when it lacks the bits or the room to continue. A
//! step that leaves the state unchanged is the suspension fixpoint; the
//! drive loop returns to the caller instead of spinning.

use std::io::{self, Read};

use crate::bits::BitReader;
use crate::config::Config;
use crate::error::{Error, Result};

/// Decoder states. Any state other than `YieldBackRef` sits on a token
/// boundary or inside a not-yet-acted-upon field, so end of input there is
/// a legal end of stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Pull one tag bit and dispatch.
    TagBit,
    /// Pull 8 bits and emit them as a literal byte.
    YieldLiteral,
    /// Pull the upper `window - 8` bits of the distance field.
    BackRefIndexMsb,
    /// Pull the low (up to 8) bits of the distance field.
    BackRefIndexLsb,
    /// Pull the upper `lookahead - 8` bits of the length field.
    BackRefCountMsb,
    /// Pull the low (up to 8) bits of the length field.
    BackRefCountLsb,
    /// Copy `backref_count` bytes out of the history ring.
    YieldBackRef,
}

/// Streaming LZSS decoder wrapping a byte source.
///
/// Holds a `1 << window` byte history ring and a refill buffer of the same
/// size; it never reads more than one refill buffer ahead of what it has
/// decoded, so intermittently-available sources are safe to wrap.
///
/// The `window` and `lookahead` parameters must match the encoder that
/// produced the stream; they are not recorded in the stream itself.
#[derive(Debug)]
pub struct Decoder<R> {
    source: R,
    config: Config,
    state: State,
    bits: BitReader,
    /// Circular history, addressed through the low `window` bits of
    /// `head_index`.
    window_buffer: Box<[u8]>,
    head_index: usize,
    /// Distance of the in-flight back-reference (1-based).
    backref_index: usize,
    /// Remaining length of the in-flight back-reference.
    backref_count: usize,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder reading compressed bytes from `source`.
    pub fn new(source: R, config: Config) -> Self {
        Self {
            source,
            config,
            state: State::TagBit,
            bits: BitReader::new(config.window_size()),
            window_buffer: vec![0; config.window_size()].into_boxed_slice(),
            head_index: 0,
            backref_index: 0,
            backref_count: 0,
        }
    }

    /// The config this decoder was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Decode up to `out.len()` bytes into `out`.
    ///
    /// Returns the number of bytes produced. `Ok(0)` with a non-empty
    /// `out` means the stream ended cleanly. [`Error::Truncated`] means
    /// the source hit EOF mid-token; [`Error::Io`] propagates a source
    /// failure.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        let mut written = 0;
        loop {
            written += self.poll(&mut out[written..]);
            if written == out.len() {
                return Ok(written);
            }
            // The machine suspended needing bits; pull more from the source.
            match self.bits.fill(&mut self.source) {
                Ok(0) => {
                    return if self.is_finished() {
                        Ok(written)
                    } else if written > 0 {
                        // Hand back what we have; the next call reports the
                        // truncation.
                        Ok(written)
                    } else {
                        Err(Error::Truncated)
                    };
                }
                Ok(_) => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }

    /// Restore the initial state and swap in a new source.
    ///
    /// Keeps the ring and refill allocations; behaves identically to a
    /// freshly constructed decoder with the same config.
    pub fn reset(&mut self, new_source: R) {
        self.source = new_source;
        self.state = State::TagBit;
        self.bits.reset();
        self.window_buffer.fill(0);
        self.head_index = 0;
        self.backref_index = 0;
        self.backref_count = 0;
    }

    /// Consume the decoder and return the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Drive the state machine until it needs more input or `out` fills.
    fn poll(&mut self, out: &mut [u8]) -> usize {
        let mut n = 0;
        loop {
            let state = self.state;
            self.state = match state {
                State::TagBit => self.step_tag_bit(),
                State::YieldLiteral => self.step_yield_literal(out, &mut n),
                State::BackRefIndexMsb => self.step_backref_index_msb(),
                State::BackRefIndexLsb => self.step_backref_index_lsb(),
                State::BackRefCountMsb => self.step_backref_count_msb(),
                State::BackRefCountLsb => self.step_backref_count_lsb(),
                State::YieldBackRef => self.step_yield_backref(out, &mut n),
            };
            if self.state == state {
                return n;
            }
        }
    }

    fn step_tag_bit(&mut self) -> State {
        match self.bits.get_bits(1) {
            None => State::TagBit,
            Some(0) => {
                if self.config.window() > 8 {
                    State::BackRefIndexMsb
                } else {
                    self.backref_index = 0;
                    State::BackRefIndexLsb
                }
            }
            Some(_) => State::YieldLiteral,
        }
    }

    fn step_yield_literal(&mut self, out: &mut [u8], n: &mut usize) -> State {
        if *n < out.len() {
            match self.bits.get_bits(8) {
                None => State::YieldLiteral,
                Some(bits) => {
                    let mask = self.config.window_size() - 1;
                    let c = bits as u8;
                    self.window_buffer[self.head_index & mask] = c;
                    self.head_index = self.head_index.wrapping_add(1);
                    out[*n] = c;
                    *n += 1;
                    State::TagBit
                }
            }
        } else {
            State::YieldLiteral
        }
    }

    fn step_backref_index_msb(&mut self) -> State {
        match self.bits.get_bits(self.config.window() - 8) {
            None => State::BackRefIndexMsb,
            Some(bits) => {
                self.backref_index = (bits as usize) << 8;
                State::BackRefIndexLsb
            }
        }
    }

    fn step_backref_index_lsb(&mut self) -> State {
        match self.bits.get_bits(self.config.window().min(8)) {
            None => State::BackRefIndexLsb,
            Some(bits) => {
                self.backref_index |= bits as usize;
                self.backref_index += 1;
                self.backref_count = 0;
                if self.config.lookahead() > 8 {
                    State::BackRefCountMsb
                } else {
                    State::BackRefCountLsb
                }
            }
        }
    }

    fn step_backref_count_msb(&mut self) -> State {
        match self.bits.get_bits(self.config.lookahead() - 8) {
            None => State::BackRefCountMsb,
            Some(bits) => {
                self.backref_count = (bits as usize) << 8;
                State::BackRefCountLsb
            }
        }
    }

    fn step_backref_count_lsb(&mut self) -> State {
        match self.bits.get_bits(self.config.lookahead().min(8)) {
            None => State::BackRefCountLsb,
            Some(bits) => {
                self.backref_count |= bits as usize;
                self.backref_count += 1;
                State::YieldBackRef
            }
        }
    }

    fn step_yield_backref(&mut self, out: &mut [u8], n: &mut usize) -> State {
        let room = out.len() - *n;
        if room > 0 {
            let count = room.min(self.backref_count);
            let mask = self.config.window_size() - 1;
            // Source and destination share the ring, so an overlapping copy
            // must go byte at a time.
            for _ in 0..count {
                let c = self.window_buffer[self.head_index.wrapping_sub(self.backref_index) & mask];
                out[*n] = c;
                *n += 1;
                self.window_buffer[self.head_index & mask] = c;
                self.head_index = self.head_index.wrapping_add(1);
            }
            self.backref_count -= count;
            if self.backref_count == 0 {
                return State::TagBit;
            }
        }
        State::YieldBackRef
    }

    /// Whether end of input here is a legal end of stream: no buffered
    /// input remains and no back-reference copy is in flight.
    fn is_finished(&self) -> bool {
        self.state != State::YieldBackRef && self.bits.is_drained()
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Decoder::read(self, buf).map_err(io::Error::from)
    }
}
