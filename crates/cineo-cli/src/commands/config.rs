use super::prompts;
use crate::app::App;
use crate::output::{new_table, Output};
use cineo_config::Config;
use cineo_core::accounts::hash_password;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn show_config(app: &App, full: bool, output: &Output) -> Result<()> {
    let config = &app.config;
    let config_file = app.paths.config_file();
    let key_source = if app.credentials.get_tmdb_api_key().is_some() { "credentials" } else { "config" };
    let api_key = app
        .credentials
        .get_tmdb_api_key()
        .cloned()
        .unwrap_or_else(|| config.tmdb.api_key.clone());
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "users_file": app.paths.users_file().display().to_string(),
            "layout": app.paths.origin().to_string(),
            "tmdb": {
                "api_key": api_key_display,
                "api_key_source": key_source,
                "api_base": config.tmdb.api_base,
                "image_base": config.tmdb.image_base,
                "language": config.tmdb.language,
            },
            "sync": { "enabled": config.sync.enabled, "mode": config.sync.mode },
            "search": { "debounce_ms": config.search.debounce_ms, "min_query_len": config.search.min_query_len },
            "admin": config.admin.as_ref().map(|a| a.username.clone()),
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("No config file at {}, showing defaults", config_file.display()));
    }

    let mut files = new_table(&["File", "Path"]);
    files.add_row(vec![Cell::new("Config"), Cell::new(config_file.display())]);
    files.add_row(vec![Cell::new("Credentials"), Cell::new(app.paths.credentials_file().display())]);
    files.add_row(vec![Cell::new("Users"), Cell::new(app.paths.users_file().display())]);
    output.table(&files);
    output.info(format!("Layout: {}", app.paths.origin()));

    let mut table = new_table(&["Setting", "Value"]);
    let section = |name: &str| Cell::new(name).fg(Color::Cyan).add_attribute(Attribute::Bold);
    table.add_row(vec![section("TMDB"), Cell::new("")]);
    table.add_row(vec![Cell::new("API key"), Cell::new(format!("{} ({})", api_key_display, key_source))]);
    table.add_row(vec![Cell::new("API base"), Cell::new(&config.tmdb.api_base)]);
    table.add_row(vec![Cell::new("Language"), Cell::new(config.tmdb.language)]);
    table.add_row(vec![section("Sync"), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Enabled"),
        Cell::new(if config.sync.enabled { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    table.add_row(vec![Cell::new("Mode"), Cell::new(format!("{:?}", config.sync.mode))]);
    table.add_row(vec![section("Search"), Cell::new("")]);
    table.add_row(vec![Cell::new("Debounce"), Cell::new(format!("{} ms", config.search.debounce_ms))]);
    table.add_row(vec![Cell::new("Min query length"), Cell::new(config.search.min_query_len)]);
    if let Some(admin) = &config.admin {
        table.add_row(vec![section("Admin"), Cell::new("")]);
        table.add_row(vec![Cell::new("Username"), Cell::new(&admin.username)]);
    }
    output.table(&table);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
    }
    Ok(())
}

pub async fn init_config(app: &App, output: &Output) -> Result<()> {
    let config_file = app.paths.config_file();
    if config_file.exists() {
        output.warn(format!("Config file already exists at {}", config_file.display()));
        return Ok(());
    }
    let created = app
        .paths
        .prepare()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    for dir in &created {
        output.info(format!("Created {}", dir.display()));
    }
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

pub async fn set_api_key(app: &mut App, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("TMDB API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }
    app.credentials.set_tmdb_api_key(key);
    app.credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success("TMDB API key saved");
    Ok(())
}

/// Print an Argon2 hash for the `[admin]` section
pub async fn hash_admin_password(output: &Output) -> Result<()> {
    let password = prompts::prompt_new_password("Administrator password")?;
    let hash = hash_password(&password)?;
    if output.is_human() {
        println!("[admin]\nusername = \"admin\"\npassword_hash = \"{}\"", hash);
    } else {
        output.json(&json!({ "password_hash": hash }));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}
