use anyhow::Context;
use showroom::{app::ShowroomApp, config::ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = ShowroomApp::new(ViewerConfig::default()).context("failed to create event loop")?;
    app.run().context("showroom viewer stopped with an error")?;
    Ok(())
}
