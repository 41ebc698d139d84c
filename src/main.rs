use log::{error, info, warn};
use recipe_vision::server::{self, AppState};
use recipe_vision::{build_orchestrator, AnalyzerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AnalyzerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let orchestrator = match build_orchestrator(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("Failed to build provider chain: {}", e);
            return Err(e.into());
        }
    };

    let providers = orchestrator.provider_names();
    if providers.is_empty() {
        warn!("No providers enabled, every request will get demo recipes");
    } else {
        info!("Provider chain: {}", providers.join(" -> "));
    }

    if let Err(e) = server::serve(
        AppState::new(orchestrator),
        &config.server.host,
        config.server.port,
    )
    .await
    {
        error!(
            "Server on {}:{} stopped: {}",
            config.server.host, config.server.port, e
        );
        return Err(e.into());
    }

    Ok(())
}
