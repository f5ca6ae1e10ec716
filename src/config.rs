//! Codec parameters shared by the encoder and decoder.

/// Minimum base-2 log of the sliding window size.
pub const MIN_WINDOW: u8 = 4;

/// Maximum base-2 log of the sliding window size.
///
/// Window positions travel through 16-bit field registers on the wire, so
/// 15 is the largest width a single field can carry.
pub const MAX_WINDOW: u8 = 15;

/// Minimum number of bits used for back-reference lengths.
pub const MIN_LOOKAHEAD: u8 = 3;

/// Default base-2 log of the sliding window size.
pub const DEFAULT_WINDOW: u8 = 8;

/// Default number of bits used for back-reference lengths.
pub const DEFAULT_LOOKAHEAD: u8 = 4;

/// Sliding-window and lookahead parameters for one stream.
///
/// `window` is the base-2 log of the history size searched for repeated
/// patterns: a larger value can compress better but costs memory and time.
/// `lookahead` is the number of bits used to store back-reference lengths;
/// every back-reference costs `window + lookahead` bits, so large values
/// are counterproductive when most matches are short.
///
/// The parameters are not stored in the compressed stream. An encoder and
/// the decoder for its output must be given the same `Config` out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    window: u8,
    lookahead: u8,
}

impl Config {
    /// Create a config, clamping both parameters into their valid ranges.
    ///
    /// `window` is clamped to `[MIN_WINDOW, MAX_WINDOW]` and `lookahead`
    /// to `[MIN_LOOKAHEAD, window - 1]`.
    pub fn new(window: u8, lookahead: u8) -> Self {
        let window = window.clamp(MIN_WINDOW, MAX_WINDOW);
        let lookahead = lookahead.clamp(MIN_LOOKAHEAD, window - 1);
        Self { window, lookahead }
    }

    /// Base-2 log of the sliding window size.
    pub fn window(&self) -> u8 {
        self.window
    }

    /// Number of bits used for back-reference lengths.
    pub fn lookahead(&self) -> u8 {
        self.lookahead
    }

    /// Window capacity in bytes (`1 << window`).
    pub(crate) fn window_size(&self) -> usize {
        1 << self.window
    }

    /// Maximum back-reference length in bytes (`1 << lookahead`).
    pub(crate) fn lookahead_size(&self) -> usize {
        1 << self.lookahead
    }

    /// Bit cost of a back-reference token: tag + distance + length.
    pub(crate) fn backref_bit_cost(&self) -> usize {
        1 + self.window as usize + self.lookahead as usize
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}
