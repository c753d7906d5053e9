//! neocypher - run Cypher statements against a Neo4j REST endpoint.

mod cli;

use anyhow::Context;
use cli::Cli;
use neocypher::config::{Config, ConnectionConfig};
use neocypher::{logging, CypherQuery, Database, NeoError};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<NeoError>() {
            Some(neo) => error!("{}: {:#}", neo.category(), e),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(&cli, &config)?;
    info!("Connection: {}", connection.display_string());

    let db = Database::connect(&connection)
        .await
        .with_context(|| format!("connecting to {}", connection.display_string()))?;

    let mut query = CypherQuery::new(cli.statement.clone()).with_params(cli.parameters()?);
    db.cypher(&mut query).await?;

    println!("{}", cli::render(query.result(), cli.format)?);
    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence: `--url` (plus `--timeout`), then `--connection NAME`, then the
/// `default` entry of the config file, then `NEO4J_URL`, then the built-in URL.
fn resolve_connection(cli: &Cli, config: &Config) -> neocypher::Result<ConnectionConfig> {
    let from_cli = cli.to_connection_config()?;

    let mut connection = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            NeoError::config(format!("Connection '{}' not found in config file", name))
        })?,
        None => config.get_connection(None).cloned().unwrap_or_default(),
    };

    if let Some(ref overrides) = from_cli {
        connection.merge(overrides);
    }

    connection.apply_env_defaults()?;
    Ok(connection)
}
