use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cardfile::config;
use cardfile::ui::app::App;

#[derive(Parser, Debug)]
#[command(name = "cardfile", version, about = "Interactive terminal contact book")]
struct Cli {
    /// Path to an alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => config::load_from(&path)?,
        None => config::load()?,
    };

    let mut app = App::new(&config);
    app.run()?;

    Ok(())
}
