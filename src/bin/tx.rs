use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;

use ieee80211b::Preamble;
use ieee80211b::Rate;
use ieee80211b::blocks::CodeMapper;
use ieee80211b::blocks::Framer;
use ieee80211b::blocks::Mode;
use ieee80211b::blocks::Scrambler;
use ieee80211b::runtime;
use ieee80211b::runtime::Mocker;
use ieee80211b::runtime::config;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// PSDU data rate in Mbps (1, 2, 5.5, 11)
    #[clap(short, long, default_value = "11")]
    rate: Rate,
    /// Preamble (long, short)
    #[clap(short, long, default_value = "long")]
    preamble: Preamble,
    /// PSDU as text, can be given multiple times
    #[clap(short = 'm', long = "message")]
    messages: Vec<String>,
    /// PSDU as hex string, can be given multiple times
    #[clap(long = "hex")]
    hex: Vec<String>,
    /// Send every PSDU this many times
    #[clap(short = 'n', long, default_value_t = 1)]
    repeat: usize,
    /// Output items requested per block call
    #[clap(short, long)]
    buffer_size: Option<usize>,
    /// File for interleaved little-endian f32 IQ samples
    #[clap(short, long, default_value = "tx.cf32")]
    output: PathBuf,
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    anyhow::ensure!(s.len() % 2 == 0, "odd number of hex digits in {s}");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).with_context(|| format!("invalid hex {s}")))
        .collect()
}

const DEFAULT_MESSAGE: &str = "Hello from FutureSDR";

/// PSDUs from the command line, the default message if none are given.
fn psdus(args: &Args) -> Result<Vec<Vec<u8>>> {
    let mut psdus: Vec<Vec<u8>> = args.messages.iter().map(|m| m.as_bytes().to_vec()).collect();
    for h in args.hex.iter() {
        psdus.push(parse_hex(h)?);
    }
    if psdus.is_empty() {
        psdus.push(DEFAULT_MESSAGE.as_bytes().to_vec());
    }
    Ok(psdus)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(b) = args.buffer_size {
        config::set("buffer_size", b as i64);
    }
    runtime::init();
    info!("Configuration: {:?}", args);

    let psdus = psdus(&args)?;
    // optional output scaling, e.g. `IEEE80211B_TX_AMPLITUDE=0.5`
    let amplitude = config::get::<f32>("tx_amplitude").unwrap_or(1.0);

    let framer = Framer::new(args.rate, args.preamble)?;
    let handle = framer.handle();
    let repeat = args.repeat;
    let producer = thread::spawn(move || {
        for _ in 0..repeat {
            for p in psdus.iter() {
                handle.submit(p);
            }
        }
        handle.finish();
    });

    let buffer_size = config::config().buffer_size;
    let mut framer = Mocker::new(framer);
    let mut scrambler = Mocker::new(Scrambler::new(Mode::Scramble));
    let mut mapper = Mocker::new(CodeMapper::new());

    let mut out = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("cannot create {}", args.output.display()))?,
    );
    let mut n_bytes = 0;
    let mut n_samples = 0;

    loop {
        let (_, produced) = framer.process(0, buffer_size)?;
        let (bytes, tags) = framer.take_output();
        n_bytes += bytes.len();

        scrambler.input_with_tags(bytes, tags);
        scrambler.run()?;
        let (bytes, tags) = scrambler.take_output();

        mapper.input_with_tags(bytes, tags);
        mapper.run()?;
        let (samples, _) = mapper.take_output();
        n_samples += samples.len();

        for s in samples {
            let s = s * amplitude;
            out.write_all(&s.re.to_le_bytes())?;
            out.write_all(&s.im.to_le_bytes())?;
        }

        if framer.finished() {
            break;
        }
        if produced == 0 {
            thread::sleep(Duration::from_millis(1));
        }
    }
    out.flush()?;

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("frame producer panicked"))?;

    info!(
        "wrote {} samples ({} PPDU bytes) to {}",
        n_samples,
        n_bytes,
        args.output.display()
    );

    Ok(())
}
