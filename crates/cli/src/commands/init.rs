//! `herald init` — Write the default configuration file.

use herald_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();

    if AppConfig::write_default(&path, force)? {
        println!("Wrote default config to {}", path.display());
        println!("Add `credential = \"...\"` or set HERALD_API_KEY to enable the fallback.");
    } else {
        println!("Config already exists at {}", path.display());
        println!("Re-run with --force to overwrite it.");
    }

    Ok(())
}
