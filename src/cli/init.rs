use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use std::error::Error;
use zim_trim::config::Config;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("ztrim is already initialized. Overwrite the configuration?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Keeping existing configuration.");
            return Ok(());
        }
    }

    let defaults = Config::new();

    let api_base_url = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("API base URL")
        .default(defaults.api_base_url.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("Not a valid URL: {e}"))
        })
        .interact_text()?;

    let default_artist = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Default artist")
        .default(defaults.default_artist.clone())
        .allow_empty(true)
        .interact_text()?;

    let mut config = defaults;
    config.set_value("api_base_url", &api_base_url)?;
    config.set_value("default_artist", &default_artist)?;
    config.save()?;

    println!("{}", "ztrim initialized successfully!".green());
    println!("API base URL: {}", config.api_base_url.cyan());
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );

    Ok(())
}
