//! `imgfetch config` – show config location and effective values.

use anyhow::Result;
use imgfetch_core::config::{self, FetchConfig};
use std::path::Path;

pub fn run_show_config(explicit: Option<&Path>, cfg: &FetchConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# config file: {}", path.display());
    print!("{}", config::to_toml(cfg)?);
    Ok(())
}
