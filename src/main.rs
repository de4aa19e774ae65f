use arcade_theme::{app, config, logger, server};
use std::sync::Arc;
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr, cfg.performance.backlog)?;

    // Plugins load before the host's own routes; the table is frozen afterwards
    let state = Arc::new(app::build_state(cfg)?);
    logger::log_route_table(&state.routes);
    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));
    server::run(listener, state, shutdown).await;
    Ok(())
}
