use reroute_sim::adapters::outbound::{init_combined_logger, BufferedLogger};
use reroute_sim::application::{Scenario, SimulationService};
use reroute_sim::config::CONFIG_PATH_ENV;
use reroute_sim::Config;
use std::error::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting reroute-sim");

    let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let config = match Config::from_file(&config_path).await {
        Ok(config) => {
            info!("Configuration loaded from {}", config_path);
            config
        }
        Err(e) => {
            warn!("Using default configuration ({}: {})", config_path, e);
            Config::default()
        }
    };
    info!("Planner: {:?}, detection radius {} m", config.planner.kind, config.simulation.detection_radius_m);

    let sink = init_combined_logger(config.logging.file.as_deref(), config.log_level());
    let (logger, log_task) = BufferedLogger::spawn(sink, config.logging.buffer_capacity);

    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::from_file(&path).await?,
        None => Scenario::midtown_demo(),
    };
    info!("Playing scenario '{}' ({} steps)", scenario.name, scenario.steps.len());

    let service = SimulationService::from_config(&config, logger.clone())?;
    let (action_tx, action_rx) = mpsc::channel(32);
    tokio::spawn(scenario.play(action_tx));

    tokio::select! {
        coordinator = service.run(action_rx) => {
            println!("--- event log ---");
            for entry in coordinator.event_log().entries() {
                println!("{:>4} {} {}", entry.sequence, entry.recorded_at.format("%H:%M:%S%.3f"), entry.message);
            }
            for snapshot in coordinator.snapshots() {
                match snapshot.position {
                    Some(p) => println!("{} {:?} at {}", snapshot.agent, snapshot.phase, p),
                    None => println!("{} {:?}", snapshot.agent, snapshot.phase),
                }
            }
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted");
        }
    }

    let dropped = logger.dropped();
    drop(logger);
    // Drain whatever is still queued for the sink.
    let _ = log_task.await;
    if dropped > 0 {
        warn!("{} log messages were dropped", dropped);
    }
    info!("Shutting down reroute-sim");
    Ok(())
}
