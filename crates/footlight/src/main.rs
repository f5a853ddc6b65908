//! Footlight - foot switch driven DMX preset controller
//!
//! Boots the actor graph, serves the configuration API and, on hosts
//! without GPIO, reads foot switch commands from stdin.

mod app;
mod logging_setup;
mod settings;
mod simulator;

use anyhow::Result;
use settings::ControllerSettings;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = ControllerSettings::from_args()?;
    let _log_guard = logging_setup::init(&settings.logging)?;

    info!("==========================================");
    info!("===   Footlight {:<8} starting      ===", footlight_core::VERSION);
    info!("==========================================");

    app::run(settings).await
}
