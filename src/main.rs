use anyhow::{Context, Result};
use misinfo_kg::pipeline::materialize_file;
use misinfo_kg::Config;

fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    log::info!("Starting misinfo-kg v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Input table: {}", config.input_csv().display());
    log::info!("Output graph: {}", config.output_ttl().display());
    log::info!(
        "Namespace: {}: <{}>",
        config.ontology.prefix,
        config.ontology.base_uri
    );

    let report = materialize_file(
        config.input_csv(),
        config.output_ttl(),
        &config.materialize_options(),
    )
    .with_context(|| format!("Failed to materialize {}", config.input_csv().display()))?;

    log::info!("=== Materialization Complete ===");
    log::info!("Articles: {}", report.articles);
    log::info!("Truth labels: {}", report.labels);
    log::info!("Subjects: {}", report.subjects);
    log::info!("Topic edges: {}", report.topic_edges);
    log::info!("Entities: {} (skipped: {})", report.entities, report.skipped_entities);
    if report.skipped_topics > 0 {
        log::warn!("Rows with a non-numeric dominant_topic: {}", report.skipped_topics);
    }
    log::info!("Statements: {}", report.statements);
    log::debug!("Report: {}", serde_json::to_string(&report)?);

    Ok(())
}
