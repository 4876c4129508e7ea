use anyhow::Result;
use feed_frontend::FrontendConfig;

fn main() -> Result<()> {
    env_logger::init();
    let config = FrontendConfig::from_env()?;
    log::info!("starting feed frontend against {}", config.api_url);
    feed_frontend::run_frontend(config).map_err(|err| anyhow::anyhow!("UI exited with error: {err}"))
}
