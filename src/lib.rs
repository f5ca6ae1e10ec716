//! # shrink
//!
//! A minimal-dependency, streaming LZSS compression library.
//!
//! Both the encoder and decoder are suspendable state machines with
//! memory bounded by two parameters: `window` (base-2 log of the sliding
//! history) and `lookahead` (bits per back-reference length). They make
//! incremental progress no matter how input and output are fragmented,
//! which makes them practical for embedded targets and for wrapping
//! sources with intermittent availability.
//!
//! The compressed stream is a flat sequence of tokens with no header,
//! checksum, or length framing; an encoder/decoder pair must agree on the
//! same [`Config`] out of band.
//!
//! ## Features
//!
//! - **Zero runtime dependencies by default**
//! - Bounded memory proportional to the window size
//! - [`std::io::Read`] / [`std::io::Write`] adapters for both machines
//! - Optional CLI via the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! use shrink::{Config, Decoder, Encoder};
//!
//! let config = Config::default();
//!
//! let mut encoder = Encoder::new(Vec::new(), config);
//! encoder.write(b"tea pot tea pot tea pot")?;
//! let compressed = encoder.finish()?;
//!
//! let mut decoder = Decoder::new(compressed.as_slice(), config);
//! let mut restored = Vec::new();
//! std::io::Read::read_to_end(&mut decoder, &mut restored)?;
//! assert_eq!(restored, b"tea pot tea pot tea pot");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bits;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;

pub use config::Config;
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, Result};
