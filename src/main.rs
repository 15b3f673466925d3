use std::error::Error;

use env_logger::Env;

mod app;
mod config;
mod constants;
mod fetch;
mod ui;
mod util;

use app::App;
use config::Config;
use fetch::Fetcher;

fn main() -> Result<(), Box<dyn Error>> {
    // Per-tick reading summaries go to stderr; RUST_LOG overrides the level.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = Config::default();
    let fetcher = Fetcher::new(cfg.endpoint.clone());
    let app = App::new(cfg.window_size);

    ui::run(app, &fetcher, &cfg)?;
    Ok(())
}
