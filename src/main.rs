use color_eyre::eyre::Context;
use dotenvy::dotenv;
use research_portal::{
    config::{Config, DEFAULT_JWT_SECRET, DEFAULT_UPDATE_TOKEN_SECRET},
    startup::HttpServer,
    state::build_state,
};
use secrecy::ExposeSecret;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    color_eyre::install()?;
    config_tracing();

    let config = Config::load().wrap_err("Failed to load configuration")?;
    warn_on_default_secrets(&config);

    let state = build_state(&config).await?;
    let server = HttpServer::new(&config, state).await?;
    server.run().await
}

fn warn_on_default_secrets(config: &Config) {
    if config.auth.jwt_secret.expose_secret() == DEFAULT_JWT_SECRET {
        tracing::warn!("APP_AUTH__JWT_SECRET is not set, using the development default");
    }
    if config.auth.update_token_secret.expose_secret() == DEFAULT_UPDATE_TOKEN_SECRET {
        tracing::warn!("APP_AUTH__UPDATE_TOKEN_SECRET is not set, using the development default");
    }
}

fn config_tracing() {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1")
    }

    use tracing::Level;
    use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

    let tracing_layer = tracing_subscriber::fmt::layer();
    let filter = filter::Targets::new()
        .with_target("hyper::proto", Level::INFO)
        .with_target("tower_http::trace", Level::DEBUG)
        .with_target("sqlx::query", Level::WARN)
        .with_default(Level::DEBUG);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}
