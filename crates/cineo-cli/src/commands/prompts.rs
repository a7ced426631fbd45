use color_eyre::Result;
use std::io::{self, BufRead, Write};

/// Prompt for a line of text; empty input takes the default when there is one
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", prompt, d),
        None => print!("{}: ", prompt),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim();
    if value.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Use the flag value, or ask for it
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt_string(prompt, None),
    }
}

/// Masked password prompt
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", prompt))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

/// Ask twice and require both entries to match
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    let first = prompt_password(prompt)?;
    let second = prompt_password("Repeat password")?;
    if first != second {
        return Err(color_eyre::eyre::eyre!("Passwords do not match"));
    }
    Ok(first)
}
