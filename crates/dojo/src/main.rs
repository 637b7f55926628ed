use anyhow::Context;
use dojo::config;
use dojo::gui::app::AppModel;
use dojo::sys::runtime;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_setup();
    let store = config
        .open_store()
        .context("Failed to open the data directory")?;
    log::info!("Using data directory {}", store.dir().display());

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx, store.clone());

    let app = RelmApp::new("org.shinobi.dojo");
    app.run::<AppModel>((config, store, rx));

    Ok(())
}
