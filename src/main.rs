//src/main.rs

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;

use args::{Cli, Command};
use inventory_client::{
    config::{AppState, ClientConfig},
    handlers::{self, Next},
    models::{inventory::PageQuery, view::Route},
};

// Um único thread: as duas buscas da tela de inventário são concorrentes, não paralelas
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs vão para o stderr; o stdout fica só com as tabelas / JSON
    let default_filter = if cli.verbose { "inventory_client=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ClientConfig::from_env()?.with_overrides(cli.api_url, cli.session_file)?;
    let app_state = AppState::new(config)?;
    let mut session = app_state.open_session()?;
    let format = cli.format;

    let next = match cli.command {
        Command::Home => handlers::navigate(Route::Home, &app_state, &mut session, format).await?,
        Command::Login { email, password } => {
            handlers::auth::login(&app_state, &mut session, &email, &password).await?
        }
        Command::Logout => handlers::auth::logout(&app_state, &mut session)?,
        Command::Me => handlers::auth::me(&app_state, &mut session, format).await?,
        Command::Inventory { skip, limit } => {
            let page = PageQuery { skip, limit };
            handlers::inventory::list_inventory(&app_state, &mut session, page, format).await?
        }
        Command::Tenants => {
            handlers::tenancy::list_tenants(&app_state, &mut session, format).await?
        }
        Command::Restock {
            inventory_id,
            quantity,
        } => handlers::inventory::restock(&app_state, &mut session, inventory_id, &quantity).await?,
    };

    Ok(match handlers::follow(next, &app_state, &mut session, format).await? {
        Next::Done => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
