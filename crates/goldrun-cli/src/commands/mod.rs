mod metrics;
mod schema;

use goldrun_core::Identifier;
use goldrun_warehouse::{DuckDbSession, WarehouseConfig};

use crate::cli::{Cli, Command, SchemaCommand};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = warehouse_config(cli);
    let catalog = cli
        .database
        .as_deref()
        .map(|name| Identifier::parse_as(name, "database name"))
        .transpose()?;

    match &cli.command {
        Command::Metrics(args) => metrics::run(args, &config, catalog),
        Command::Schema(args) => match &args.command {
            SchemaCommand::Create(args) => schema::create(args, &config),
            SchemaCommand::Drop(args) => schema::teardown(args, &config, catalog.as_ref()),
        },
    }
}

/// Flags override the environment-derived default.
fn warehouse_config(cli: &Cli) -> WarehouseConfig {
    match &cli.db_path {
        Some(path) => WarehouseConfig::with_db_path(path),
        None => WarehouseConfig::default(),
    }
}

fn open_session(config: &WarehouseConfig) -> Result<DuckDbSession, CliError> {
    tracing::debug!(db_path = %config.db_path.display(), "opening warehouse");
    Ok(DuckDbSession::open(config)?)
}
