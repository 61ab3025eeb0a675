mod authz;
mod errors;
mod identity;
mod secrets;
mod settings;
mod token;
mod web;

use std::sync::Arc;

use clap::Parser;
use miette::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::identity::{HttpIdentityBackend, IdentityBackend, UnconfiguredBackend};
use crate::secrets::FileSecret;

#[derive(Parser, Debug)]
#[command(
    name = "portcullis",
    version,
    about = "Role-based request authorization engine"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(host = %settings.server.host, port = settings.server.port, "Loaded configuration");

    // route table; a broken one degrades to "no restrictions" by design
    let route_table = authz::RouteTable::from_config(settings.route_table_source().as_deref());

    // signing secret, read lazily and cached for the process lifetime
    let secrets = Arc::new(FileSecret::new(
        settings.auth.secret_path.clone(),
        settings.auth.fallback_secret.clone(),
    ));

    // profile service for the login flow
    let identity: Arc<dyn IdentityBackend> = match &settings.identity.base_url {
        Some(base_url) => Arc::new(HttpIdentityBackend::new(base_url.clone())),
        None => Arc::new(UnconfiguredBackend),
    };

    let state = web::AppState {
        settings: Arc::new(settings),
        route_table: Arc::new(route_table),
        secrets,
        identity,
    };

    web::serve(state).await
}
