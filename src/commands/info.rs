//! Info command handler

use anyhow::Result;
use std::path::Path;

use quizgen::config::API_KEY_VAR;
use quizgen::Config;

pub fn run_info(config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!("Quizgen - Reviewers and quizzes from lecture documents\n");

    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => Config::path()?,
    };
    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config:      {}{}", path.display(), state);

    println!("\n\x1b[1mCompletion\x1b[0m");
    println!("  Endpoint     {}", config.completion.base_url);
    println!("  Model        {}", config.completion.model);
    println!("  Temperature  {}", config.completion.temperature);
    println!("  Timeout      {}s", config.completion.timeout_secs);
    match config.completion.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => println!("  API key      \x1b[32mset\x1b[0m"),
        _ => println!("  API key      \x1b[31mnot set\x1b[0m (export {})", API_KEY_VAR),
    }

    println!("\n\x1b[1mServer\x1b[0m");
    println!("  Listen       {}:{}", config.server.host, config.server.port);
    println!("  Max upload   {} MB", config.server.max_upload_mb);
    println!("  CORS         {}", config.server.allowed_origins.join(", "));

    Ok(())
}
