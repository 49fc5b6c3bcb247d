//! Print an overview of the raw true/fake news corpora.

use anyhow::{Context, Result};
use clap::Parser;
use misinfo_kg::corpus::{load_corpus, render_report, summarize};
use misinfo_kg::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "explore")]
#[command(about = "Summarize the true/fake news corpora (counts, dates, subjects, samples)")]
struct Args {
    /// Titles to sample per corpus (defaults to corpus.sample_size)
    #[arg(short, long)]
    samples: Option<usize>,

    /// Seed for reproducible samples
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();
    let config = Config::load()?;
    let sample_size = args.samples.unwrap_or(config.corpus.sample_size);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut summaries = Vec::new();
    for (name, path) in [("True", &config.corpus.true_csv), ("Fake", &config.corpus.fake_csv)] {
        let records = load_corpus(path)
            .with_context(|| format!("Failed to load {} corpus from {}", name, path.display()))?;
        summaries.push(summarize(name, &records, sample_size, &mut rng));
    }

    print!("{}", render_report(&summaries));
    Ok(())
}
