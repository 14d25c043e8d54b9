//! `ospfx init`: Write a default analysis configuration.

use clap::Args;
use std::path::PathBuf;

use ospfx_core::AnalysisConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("ospfx.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    crate::config::save(&AnalysisConfig::default(), &config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    println!("Run 'ospfx paths --topology <FILE> --from <ID> --to <ID>' to query paths.");

    Ok(())
}
