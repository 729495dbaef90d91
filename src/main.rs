use actix_web::{middleware::Logger, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use clap::Parser;
use job_board::cli::{self, Cli, CliError, Command, ServeArgs};
use job_board::config::Config;
use job_board::routes::{self, AppState};
use job_board::security::PasswordHasher;
use job_board::shutdown::ShutdownCoordinator;

fn init_logging(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Log files will be created as: logs/info.log.2024-12-22, logs/error.log.2024-12-22, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();
    Ok(())
}

async fn serve(config: Config, args: ServeArgs) -> Result<(), CliError> {
    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);

    let store = cli::open_store(&config, args.in_memory).await?;

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Store backend: {}", store.backend_name());
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Cascade step retries: {}", config.cascade_step_retries);
    info!("  - Public URL: {}", config.base_url);
    if config.oauth.client_id.is_empty() {
        info!("  - GitHub login: not configured (GITHUB_CLIENT_ID unset)");
    }

    let state = AppState::new(store.clone(), &config, PasswordHasher::new());

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::configure(cfg, &state))
    })
    .bind((host.as_str(), port))?
    .run();

    info!("Server starting on http://{}:{}", host, port);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, store)
        .wait_for_shutdown()
        .await?;
    Ok(())
}

async fn run() -> Result<(), CliError> {
    let command = Cli::parse().into_command();
    let config = Config::from_env().map_err(CliError::Config)?;
    init_logging(&config.log_dir)?;

    match command {
        Command::Serve(args) => serve(config, args).await,
        Command::Migrate => cli::migrate(&config).await,
        Command::Seed => cli::seed(&config).await,
        Command::CreateAdmin(args) => cli::create_admin(&config, &args).await,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    run().await.map_err(|e| {
        error!("{}", e);
        eprintln!("job-board: {}", e);
        std::io::Error::other(e.to_string())
    })
}
