mod app;
mod cli;
mod color;
mod data;
mod output;
mod render;

use anyhow::Result;
use clap::Parser;

use app::App;
use cli::{Cli, RunConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = RunConfig::from_cli(Cli::parse())?;

    let mut app = App::new(config);
    app.render()?;
    app.write()?;

    Ok(())
}
