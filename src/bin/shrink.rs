//! shrink CLI - streaming LZSS compression tool
//!
//! Compresses or decompresses a file (or stdin/stdout) through the shrink
//! codec. The window and lookahead parameters are not stored in the
//! stream, so a decode must be given the same `-w`/`-l` values used to
//! encode.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;

use shrink::{Config, Decoder, Encoder};

/// A minimal-dependency, streaming LZSS compression tool.
#[derive(Parser, Debug)]
#[command(name = "shrink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Encode (compress, the default)
    #[arg(short, long)]
    encode: bool,

    /// Decode (decompress)
    #[arg(short, long, conflicts_with = "encode")]
    decode: bool,

    /// Print input & output sizes and compression ratio
    #[arg(short, long)]
    verbose: bool,

    /// Base-2 log of the LZSS sliding window size
    #[arg(short, long, default_value = "8")]
    window: u8,

    /// Number of bits used for back-reference lengths
    #[arg(short, long, default_value = "4")]
    lookahead: u8,

    /// The file to process (stdin when omitted)
    #[arg(value_name = "IN_FILE")]
    input: Option<PathBuf>,

    /// The file to write to (stdout when omitted)
    #[arg(value_name = "OUT_FILE")]
    output: Option<PathBuf>,
}

/// Counts bytes passing through to the wrapped reader.
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Counts bytes passing through to the wrapped writer.
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::new(args.window, args.lookahead);

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    // (uncompressed bytes, compressed bytes) as seen by this process.
    let (raw, compressed) = if args.decode {
        decompress(input, output, config)?
    } else {
        compress(input, output, config)?
    };

    if args.verbose {
        report(&args, config, raw, compressed);
    }

    Ok(())
}

fn compress(
    mut input: Box<dyn Read>,
    output: Box<dyn Write>,
    config: Config,
) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    // The encoder emits byte at a time; buffer between it and the sink.
    let sink = BufWriter::new(CountingWriter::new(output));
    let mut encoder = Encoder::new(sink, config);
    let n = io::copy(&mut input, &mut encoder)?;
    let sink = encoder.finish()?;
    let counter = sink.into_inner().map_err(|e| e.into_error())?;
    Ok((n, counter.count))
}

fn decompress(
    input: Box<dyn Read>,
    mut output: Box<dyn Write>,
    config: Config,
) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    let mut decoder = Decoder::new(CountingReader::new(input), config);
    let n = io::copy(&mut decoder, &mut output)?;
    output.flush()?;
    let counter = decoder.into_inner();
    Ok((n, counter.count))
}

fn report(args: &Args, config: Config, raw: u64, compressed: u64) {
    let name = args
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let pct = if raw > 0 {
        100.0 - (100.0 * compressed as f64) / raw as f64
    } else {
        0.0
    };
    let line = format!(
        "{} {:.2}%\t {} -> {} (-w {} -l {})\n",
        name,
        pct,
        raw,
        compressed,
        config.window(),
        config.lookahead(),
    );
    // When the payload occupies stdout, the report moves to stderr.
    if args.output.is_some() {
        print!("{line}");
    } else {
        eprint!("{line}");
    }
}
