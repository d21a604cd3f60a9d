use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skateway_sim::transport::tcp::TcpConnector;
use skateway_sim::{connect_all, load_devices, run, shutdown_channel, ConfigError, SimulatorConfig};

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Rideau Canal sensor simulator...");

    let config = SimulatorConfig::from_env()?;

    info!("Connecting devices...");
    let descriptors = load_devices(&config);
    let devices = connect_all(&TcpConnector, descriptors).await;

    if devices.is_empty() {
        info!("No devices connected. Exiting.");
        return Ok(());
    }

    let (handle, signal) = shutdown_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Simulation stopped by user."),
            Err(err) => error!("Failed to listen for shutdown signal: {}", err),
        }
        // Either way the handle goes away here, which also requests
        // shutdown, so an unobservable signal stream stops the loop rather
        // than leaving it unstoppable.
        handle.trigger();
    });

    info!("Simulation running... press CTRL+C to stop");
    run(devices, &config, signal).await;

    Ok(())
}
