use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use voicechanger::{
    create_router, run_cycle, AppState, Config, EngineFactory, EngineKind, EngineRuntime,
    PermissionGate, SessionController, StaticPermissionGate,
};

#[derive(Parser)]
#[command(name = "voicechanger", version, about = "Voice changer session controller")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the Start/Stop controls over HTTP
    Serve {
        /// Config file (without extension)
        #[arg(long, default_value = "config/voicechanger")]
        config: String,
    },
    /// Run one Start, answer, Stop cycle against the logging engine
    Simulate {
        /// Permission is already granted before Start
        #[arg(long)]
        granted: bool,
        /// Deny the permission request instead of granting it
        #[arg(long, conflicts_with = "granted")]
        deny: bool,
        /// Press Stop before the permission answer is applied
        #[arg(long)]
        stop_before_answer: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config } => serve(&config).await,
        Command::Simulate {
            granted,
            deny,
            stop_before_answer,
        } => simulate(granted, deny, stop_before_answer).await,
    }
}

async fn serve(config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path)?;

    info!("Voice changer v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let runtime = EngineRuntime::init(&cfg.engine.library)
        .context("Failed to initialize engine runtime")?;
    info!(
        "Engine library {} loaded at {}",
        runtime.library(),
        runtime.loaded_at()
    );
    let gate = cfg.permission.build_gate()?;

    let engine = EngineFactory::create(cfg.engine.kind, runtime);
    let controller = Arc::new(SessionController::new(engine, gate.gate()));
    let listener_handle = controller.spawn_permission_listener();

    let app = create_router(AppState::new(controller.clone(), gate.prompt()));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("HTTP server failed")?;

    info!("Shutting down, stopping session");
    controller.on_stop_requested().await;

    if let Some(handle) = listener_handle {
        handle.abort();
    }

    Ok(())
}

async fn simulate(granted: bool, deny: bool, stop_before_answer: bool) -> Result<()> {
    let runtime =
        EngineRuntime::init("voicechanger").context("Failed to initialize engine runtime")?;

    let gate: Arc<dyn PermissionGate> = if granted {
        Arc::new(StaticPermissionGate::granted())
    } else {
        Arc::new(StaticPermissionGate::not_granted(!deny))
    };

    let engine = EngineFactory::create(EngineKind::Logging, runtime);
    let controller = SessionController::new(engine, gate);

    let report = run_cycle(&controller, stop_before_answer).await;
    info!("Cycle report:\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
