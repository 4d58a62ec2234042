use owo_colors::OwoColorize;
use std::error::Error;
use std::process::Command;
use zim_trim::config::Config;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current ztrim configuration:");
    println!("  api_base_url: {}", config.api_base_url);
    println!("  default_artist: {}", config.default_artist);
    println!("  max_upload_mb: {}", config.max_upload_mb);
    println!(
        "  allowed_extensions: {}",
        config.allowed_extensions.join(", ")
    );
    println!("  log_file: {}", config.log_path().display());

    if !Config::exists()? {
        println!();
        println!(
            "{} No config file yet, showing defaults. Run 'ztrim init' to create one.",
            "Note:".yellow()
        );
    }

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        return Err("ztrim not initialized. Run 'ztrim init' first.".into());
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
