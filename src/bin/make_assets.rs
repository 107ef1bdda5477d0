//! Writes the placeholder sprite descriptors the game loads at startup.
//!
//! Usage:
//!   make_assets [--out assets]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use invaders::assets::Assets;

#[derive(Parser)]
#[command(name = "make_assets")]
#[command(about = "Generate placeholder sprites for invaders")]
struct Args {
    /// Directory to write the sprite files into
    #[arg(long, default_value = "assets")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    Assets::placeholders().write(&args.out)?;
    tracing::debug!("placeholder sprites written");
    println!("Assets created in {}", args.out.display());
    Ok(())
}
