//! flink-sql - run a statement through the Flink SQL Gateway.

mod cli;

use std::sync::Arc;

use cli::Cli;
use flink_cursor::config::Config;
use flink_cursor::gateway::{MockGatewayClient, Row};
use flink_cursor::{logging, FlinkHandler, Result};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging_with(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    // Precedence: CLI arguments, then environment, then config file
    config.gateway.apply_env_overrides()?;
    cli.apply_overrides(&mut config.gateway);

    let sql = cli.statement()?;
    let bindings = cli.binding_values();

    let handler = if cli.mock {
        info!("Using mock gateway");
        FlinkHandler::open(Arc::new(MockGatewayClient::new()), &config.gateway.session_name)
            .await?
            .with_fetch_interval(config.cursor.fetch_interval())
    } else {
        info!("Gateway: {}", config.gateway.display_string());
        FlinkHandler::from_config(&config).await?
    };

    let mut cursor = handler.cursor();
    cursor.execute(&sql, bindings.as_deref()).await?;

    let header: Vec<String> = cursor
        .description()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    println!("{}", header.join("\t"));

    if cli.fetch_one {
        while let Some(row) = cursor.fetchone().await? {
            print_row(&row);
        }
    } else {
        for row in cursor.fetchall().await? {
            print_row(&row);
        }
    }

    cursor.close().await?;
    handler.close().await
}

fn print_row(row: &Row) {
    let fields: Vec<String> = row.iter().map(|v| v.to_display_string()).collect();
    println!("{}", fields.join("\t"));
}
