// src/bin/tdigest_cli.rs
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use stream_tdigest::anomaly::{TailScorer, DEFAULT_FLOOR};
use stream_tdigest::tdigest::{DEFAULT_COMPRESSION, DEFAULT_REBUILD_FACTOR, DEFAULT_SEED};
use stream_tdigest::Digest;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    digest: DigestArgs,

    /// Load the digest from a snapshot instead of reading numbers from stdin
    #[arg(long, value_name = "PATH")]
    from_digest: Option<PathBuf>,

    /// Save the digest to a snapshot after building or loading it
    #[arg(long, value_name = "PATH")]
    to_digest: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(ClapArgs)]
struct DigestArgs {
    /// Absolute compression δ (smaller keeps more centroids)
    #[arg(short = 'c', long, default_value_t = DEFAULT_COMPRESSION)]
    compression: f64,

    /// Rebuild once the digest holds more than ceil(K/δ) centroids
    #[arg(short = 'k', long, default_value_t = DEFAULT_REBUILD_FACTOR)]
    rebuild_factor: f64,

    /// Seed for rebuild shuffles
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print `x<TAB>cdf(x)` for each probe (or each input value if --probes is omitted)
    Cdf {
        /// Probe xs (space/comma/newline separated)
        #[arg(long, allow_hyphen_values = true)]
        probes: Option<String>,
    },
    /// Print the value at quantile q
    Quantile {
        /// q in [0,1]
        #[arg(short, long)]
        q: f64,
    },
    /// Print `x<TAB>score(x)` with score = -ln(max(1 - cdf(x), floor))
    Score {
        /// Probe xs (space/comma/newline separated)
        #[arg(long, allow_hyphen_values = true)]
        probes: Option<String>,

        /// Tail-mass floor in (0, 1)
        #[arg(long, default_value_t = DEFAULT_FLOOR)]
        floor: f64,
    },
    /// Print count, extremes, mean and a few quantiles
    Summary,
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut out = Vec::new();
    for tok in s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
    {
        out.push(tok.parse::<f64>()?);
    }
    Ok(out)
}

fn read_stdin_f64s() -> Result<Vec<f64>, Box<dyn Error>> {
    let mut s = String::new();
    io::stdin().read_to_string(&mut s)?;
    parse_numbers(&s)
}

fn load_digest(path: &PathBuf) -> Result<Digest, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let (digest, _) =
        bincode::serde::decode_from_slice::<Digest, _>(&bytes, bincode::config::standard())?;
    Ok(digest)
}

fn save_digest(path: &PathBuf, digest: &Digest) -> Result<(), Box<dyn Error>> {
    let bytes = bincode::serde::encode_to_vec(digest, bincode::config::standard())?;
    fs::write(path, bytes)?;
    Ok(())
}

fn probes_or_inputs(
    probes: Option<String>,
    inputs: &[f64],
) -> Result<Vec<f64>, Box<dyn Error>> {
    match probes {
        Some(p) => parse_numbers(&p),
        None if inputs.is_empty() => Err("no probes: pass --probes when using --from-digest".into()),
        None => Ok(inputs.to_vec()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TDIGEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let (digest, xs) = match &args.from_digest {
        Some(path) => {
            let d = load_digest(path)?;
            info!(path = %path.display(), count = d.count(), "loaded digest");
            (d, Vec::new())
        }
        None => {
            let xs = read_stdin_f64s()?;
            let mut d = Digest::builder()
                .compression(args.digest.compression)
                .rebuild_factor(args.digest.rebuild_factor)
                .seed(args.digest.seed)
                .build()?;
            d.update_many(&xs)?;
            debug!(count = d.count(), centroids = d.centroid_count(), "built digest");
            (d, xs)
        }
    };

    if let Some(path) = &args.to_digest {
        save_digest(path, &digest)?;
        info!(path = %path.display(), "saved digest");
    }

    match args.cmd {
        Cmd::Cdf { probes } => {
            let probes = probes_or_inputs(probes, &xs)?;
            let cdf = digest.cdf_many(&probes)?;
            for (x, p) in probes.iter().zip(cdf.iter()) {
                println!("{x}\t{p}");
            }
        }
        Cmd::Quantile { q } => {
            println!("{}", digest.quantile(q)?);
        }
        Cmd::Score { probes, floor } => {
            let scorer = TailScorer::new(floor)?;
            let probes = probes_or_inputs(probes, &xs)?;
            let scores = scorer.score_many(&digest, &probes)?;
            for (x, s) in probes.iter().zip(scores.iter()) {
                println!("{x}\t{s}");
            }
        }
        Cmd::Summary => {
            println!("count\t{}", digest.count());
            println!("centroids\t{}", digest.centroid_count());
            println!("min\t{}", digest.min());
            println!("max\t{}", digest.max());
            println!("mean\t{}", digest.mean());
            let qs = [0.01, 0.25, 0.5, 0.75, 0.99];
            for (q, v) in qs.iter().zip(digest.quantiles(&qs)?) {
                println!("p{}\t{v}", (q * 100.0).round());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
