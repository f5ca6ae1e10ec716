//! Streaming LZSS compression.
//!
//! The encoder scans a dual-window buffer: the left half is the backlog
//! (history that back-references may point into) and the right half is the
//! input currently being scanned. Once the input half fills, a single pass
//! builds a per-byte back-chain index, the scan emits tokens, and the
//! scanned bytes slide left to become the next round's backlog.

use std::io::{self, Write};

use crate::bits::BitWriter;
use crate::config::Config;
use crate::error::{Error, Result};

/// Back-chain sentinel: no earlier occurrence of this byte value.
const NO_POS: i32 = -1;

/// Encoder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Accepting input into the right half of the buffer.
    NotFull,
    /// Input half is full; build the index before scanning.
    Filled,
    /// Find the longest match at the current scan offset.
    Search,
    /// Emit the literal/back-reference tag bit.
    YieldTagBit,
    /// Emit the 8 bits of a literal byte.
    YieldLiteral,
    /// Emit the distance field of a back-reference.
    YieldBackRefIndex,
    /// Emit the length field of a back-reference.
    YieldBackRefLength,
    /// Slide scanned input left into the backlog.
    SaveBacklog,
    /// Emit the final partial byte, zero-padded.
    FlushBits,
    /// Terminal: the stream is complete.
    Done,
    /// A sink failure left the machine unable to continue.
    Invalid,
}

/// Streaming LZSS encoder writing compressed bytes to a sink.
///
/// Memory use is fixed at construction: a `2 << window` byte buffer plus a
/// back-chain index of the same length. Output is produced in stream order
/// a byte at a time, so an unbuffered `File` sink should be wrapped in
/// [`std::io::BufWriter`].
///
/// The final token and the zero-padded last byte are only written by
/// [`Encoder::finish`] (or [`Encoder::try_finish`]); dropping the encoder
/// without finishing loses the tail of the stream.
#[derive(Debug)]
pub struct Encoder<W: Write> {
    sink: W,
    config: Config,
    state: State,
    bits: BitWriter,
    /// Backlog in `[0, W)`, current input in `[W, W + input_size)`.
    buffer: Box<[u8]>,
    /// `index[i]` is the nearest `j < i` with `buffer[j] == buffer[i]`,
    /// or [`NO_POS`]. Rebuilt by each indexing pass.
    index: Box<[i32]>,
    input_size: usize,
    match_scan_index: usize,
    match_length: usize,
    match_position: usize,
    /// Pending back-reference field bits, drained at most 8 per step.
    outgoing_bits: u16,
    outgoing_count: u8,
    finishing: bool,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder writing compressed bytes to `sink`.
    pub fn new(sink: W, config: Config) -> Self {
        let buffer_size = 2 * config.window_size();
        Self {
            sink,
            config,
            state: State::NotFull,
            bits: BitWriter::new(),
            buffer: vec![0; buffer_size].into_boxed_slice(),
            index: vec![NO_POS; buffer_size].into_boxed_slice(),
            input_size: 0,
            match_scan_index: 0,
            match_length: 0,
            match_position: 0,
            outgoing_bits: 0,
            outgoing_count: 0,
            finishing: false,
        }
    }

    /// The config this encoder was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Compress `buf`, writing output to the sink as tokens complete.
    ///
    /// Always absorbs the whole slice (the scan window recycles as needed),
    /// so the return value equals `buf.len()` unless an error occurs.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.finishing {
            return Err(Error::WriteAfterFinish);
        }
        let total = buf.len();
        let mut done = 0;
        while done < total {
            done += self.sink_input(&buf[done..]);
            self.poll()?;
        }
        Ok(done)
    }

    /// Declare end of input and drive the machine to completion.
    ///
    /// Emits any final tokens plus the zero-padded last byte, then flushes
    /// the sink. Further [`Encoder::write`] calls fail with
    /// [`Error::WriteAfterFinish`].
    pub fn try_finish(&mut self) -> Result<()> {
        self.finishing = true;
        if self.state == State::NotFull {
            self.state = State::Filled;
        }
        if self.state != State::Done {
            self.poll()?;
        }
        if self.state != State::Done {
            return Err(Error::BadStateOnClose);
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Finish the stream and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.try_finish()?;
        Ok(self.sink)
    }

    /// Consume the encoder and return the sink without finishing.
    ///
    /// Any unemitted tokens and the partial final byte are discarded.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Copy input into the right half of the buffer, up to the free space.
    fn sink_input(&mut self, buf: &[u8]) -> usize {
        debug_assert_eq!(self.state, State::NotFull);
        let window_size = self.config.window_size();
        let offset = window_size + self.input_size;
        let copy_size = (window_size - self.input_size).min(buf.len());
        self.buffer[offset..offset + copy_size].copy_from_slice(&buf[..copy_size]);
        self.input_size += copy_size;
        if self.input_size == window_size {
            self.state = State::Filled;
        }
        copy_size
    }

    /// Run the state machine until it wants more input or is done.
    ///
    /// The sink absorbs every byte the machine produces, so the only
    /// suspension points are `NotFull` (input starved) and `Done`.
    fn poll(&mut self) -> Result<()> {
        loop {
            match self.state {
                State::NotFull | State::Done => return Ok(()),
                State::Filled => {
                    self.do_indexing();
                    self.state = State::Search;
                }
                State::Search => self.state = self.step_search(),
                State::YieldTagBit => self.state = self.step_yield_tag_bit()?,
                State::YieldLiteral => self.state = self.step_yield_literal()?,
                State::YieldBackRefIndex => self.state = self.step_yield_backref_index()?,
                State::YieldBackRefLength => self.state = self.step_yield_backref_length()?,
                State::SaveBacklog => {
                    self.save_backlog();
                    self.state = State::NotFull;
                }
                State::FlushBits => self.state = self.step_flush_bits()?,
                State::Invalid => return Err(Error::BadStateOnClose),
            }
        }
    }

    /// Rebuild the back-chain index over the backlog plus current input.
    ///
    /// One left-to-right scan with a last-seen table per byte value gives
    /// every position a chain of earlier occurrences of its first byte.
    fn do_indexing(&mut self) {
        let mut last = [NO_POS; 256];
        let end = self.config.window_size() + self.input_size;
        for i in 0..end {
            let v = self.buffer[i] as usize;
            self.index[i] = last[v];
            last[v] = i as i32;
        }
    }

    fn step_search(&mut self) -> State {
        let msi = self.match_scan_index;
        // While draining the tail we scan down to single bytes; otherwise a
        // full lookahead must be available so matches are never cut short
        // by the window seam.
        let lookahead_compare = if self.finishing {
            1
        } else {
            self.config.lookahead_size()
        };
        if msi + lookahead_compare > self.input_size {
            return if self.finishing {
                State::FlushBits
            } else {
                State::SaveBacklog
            };
        }
        let window_size = self.config.window_size();
        let end = window_size + msi;
        let start = end - window_size;
        let max = self.config.lookahead_size().min(self.input_size - msi);
        match self.find_longest_match(start, end, max) {
            None => {
                self.match_scan_index += 1;
                self.match_length = 0;
                State::YieldTagBit
            }
            Some((position, length)) => {
                self.match_position = position;
                self.match_length = length;
                State::YieldTagBit
            }
        }
    }

    /// Walk the back-chain from `index[end]` for the longest match of
    /// `buffer[end..end + max]`, returning `(distance, length)`.
    ///
    /// Chain entries share their first byte by construction, so comparison
    /// starts at offset 1. A candidate that cannot beat the best length is
    /// rejected on a single byte compare before any scan.
    fn find_longest_match(&self, start: usize, end: usize, max: usize) -> Option<(usize, usize)> {
        let mut best_length = 0;
        let mut best_index = None;
        let mut pos = self.index[end];
        while pos >= start as i32 {
            let p = pos as usize;
            if self.buffer[p + best_length] != self.buffer[end + best_length] {
                pos = self.index[p];
                continue;
            }
            let mut length = 1;
            while length < max && self.buffer[p + length] == self.buffer[end + length] {
                length += 1;
            }
            if length > best_length {
                best_length = length;
                best_index = Some(p);
                if length == max {
                    break;
                }
            }
            pos = self.index[p];
        }
        // Worth a back-reference only if strictly cheaper than literals.
        if 8 * best_length > self.config.backref_bit_cost() {
            best_index.map(|index| (end - index, best_length))
        } else {
            None
        }
    }

    fn step_yield_tag_bit(&mut self) -> Result<State> {
        if self.match_length == 0 {
            self.push_bits(1, 1)?;
            Ok(State::YieldLiteral)
        } else {
            self.push_bits(1, 0)?;
            self.outgoing_bits = (self.match_position - 1) as u16;
            self.outgoing_count = self.config.window();
            Ok(State::YieldBackRefIndex)
        }
    }

    fn step_yield_literal(&mut self) -> Result<State> {
        let offset = self.config.window_size() + self.match_scan_index - 1;
        let byte = self.buffer[offset];
        self.push_bits(8, byte)?;
        Ok(State::Search)
    }

    fn step_yield_backref_index(&mut self) -> Result<State> {
        if self.push_outgoing_bits()? > 0 {
            return Ok(State::YieldBackRefIndex);
        }
        self.outgoing_bits = (self.match_length - 1) as u16;
        self.outgoing_count = self.config.lookahead();
        Ok(State::YieldBackRefLength)
    }

    fn step_yield_backref_length(&mut self) -> Result<State> {
        if self.push_outgoing_bits()? > 0 {
            return Ok(State::YieldBackRefLength);
        }
        self.match_scan_index += self.match_length;
        self.match_length = 0;
        Ok(State::Search)
    }

    /// Slide everything from the scan point down to offset 0. The scanned
    /// bytes become backlog; unscanned input follows them.
    fn save_backlog(&mut self) {
        let msi = self.match_scan_index;
        self.buffer.copy_within(msi.., 0);
        self.match_scan_index = 0;
        self.input_size -= msi;
    }

    fn step_flush_bits(&mut self) -> Result<State> {
        match self.bits.take_partial() {
            None => Ok(State::Done),
            Some(byte) => {
                self.write_byte(byte)?;
                Ok(State::Done)
            }
        }
    }

    /// Emit up to 8 bits of the pending field, widest slice first.
    ///
    /// Returns the number of bits pushed so callers can tell when the
    /// field has fully drained.
    fn push_outgoing_bits(&mut self) -> Result<u8> {
        let (count, bits) = if self.outgoing_count > 8 {
            (8, (self.outgoing_bits >> (self.outgoing_count - 8)) as u8)
        } else {
            (self.outgoing_count, self.outgoing_bits as u8)
        };
        if count > 0 {
            self.push_bits(count, bits)?;
            self.outgoing_count -= count;
        }
        Ok(count)
    }

    fn push_bits(&mut self, count: u8, bits: u8) -> Result<()> {
        match self.bits.push_bits(count, bits, &mut self.sink) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state = State::Invalid;
                Err(Error::Io(err))
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        match self.sink.write_all(&[byte]) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state = State::Invalid;
                Err(Error::Io(err))
            }
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Encoder::write(self, buf).map_err(io::Error::from)
    }

    /// Flushes the sink. Bits short of a byte boundary stay buffered until
    /// [`Encoder::finish`] pads and emits them.
    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
