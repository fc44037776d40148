//! Facets CLI
//!
//! Applies a facet configuration to a query string and prints the resulting
//! Elasticsearch request body together with the canonical parameters.
//!
//! ```text
//! facets-cli --config facets.json --index records --query 'type=book&year=>2000--'
//! ```

use std::path::PathBuf;

use clap::Parser;
use helios_facets::{EsSearch, FacetsConfig, RequestValues, apply_facets, init_logging};
use serde_json::json;
use tracing::info;

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "facets-cli")]
#[command(about = "Apply search facets to a query string", version)]
struct Cli {
    /// Facet configuration file (JSON).
    #[arg(short, long, env = "FACETS_CONFIG")]
    config: PathBuf,

    /// Index whose facet configuration is applied.
    #[arg(short, long)]
    index: String,

    /// Request query string, e.g. `type=book&facets=type,year`.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Base query as JSON; defaults to `match_all`.
    #[arg(long)]
    base_query: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FACETS_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = FacetsConfig::from_file(&cli.config)?;
    let values = RequestValues::parse(&cli.query);

    let mut search = EsSearch::new(&cli.index);
    if let Some(base) = &cli.base_query {
        let query = serde_json::from_str(base)
            .map_err(|e| anyhow::anyhow!("Invalid base query: {}", e))?;
        search = search.with_query(query);
    }

    match apply_facets(&config, search, &cli.index, &values) {
        Ok((search, echo)) => {
            info!(index = %cli.index, params = echo.len(), "Facets applied");
            let output = json!({
                "index": search.index(),
                "body": search.to_body(),
                "params": echo.to_query_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) if err.is_client_error() => {
            println!("{}", serde_json::to_string_pretty(&err.to_envelope())?);
            std::process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}
