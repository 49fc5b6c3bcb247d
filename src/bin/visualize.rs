//! Render the materialized graph as one HTML page of predicate-filtered views.

use anyhow::{Context, Result};
use clap::Parser;
use misinfo_kg::graph::Vocabulary;
use misinfo_kg::pipeline::render_views_file;
use misinfo_kg::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "visualize")]
#[command(about = "Render the knowledge graph views as a single HTML page")]
struct Args {
    /// Write the page here instead of paths.graph_html
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .init();

    let args = Args::parse();

    let config = Config::load()?;
    let html_path = args.output.unwrap_or_else(|| config.graph_html().to_path_buf());
    let vocab = Vocabulary::new(config.namespace());

    render_views_file(config.output_ttl(), &html_path, &vocab).with_context(|| {
        format!(
            "Failed to render views from {} (run misinfo-kg first)",
            config.output_ttl().display()
        )
    })?;

    println!(
        "All graphs saved to {} - open this in any modern browser.",
        html_path.display()
    );
    Ok(())
}
