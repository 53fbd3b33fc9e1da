use anyhow::Context;

use kickabout::{app::KickaboutApp, config::ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    log::info!("Loading assets from {}", config.asset_root.display());

    let app = KickaboutApp::new(config).context("failed to create the event loop")?;
    let exit_code = app.run().context("event loop terminated abnormally")?;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
