use crate::data::persistence::get_data_dir;
use crate::data::Settings;
use anyhow::Result;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    run_in_dir(&dir)?;
    println!("Wrote default config to {}", dir.join("config.yaml").display());
    Ok(())
}

/// Writes a default config.yaml into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    Settings::default().save_to(dir)
}
