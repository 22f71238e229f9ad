//! Info command - show system and model configuration

use anyhow::Result;

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    println!("rampup v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    println!("  Working dir: {}", working_dir());

    println!();
    println!("Configuration:");
    println!("  Config dir: {}", config_dir());
    println!("  Summary file: {}", config.scan.summary_file);
    println!("  Extensions: {}", config.scan.extensions.join(", "));
    println!("  Ignore match: {:?}", config.scan.ignore_match);
    println!("  Failure policy: {:?}", config.scan.failure_policy);

    println!();
    println!("Azure OpenAI:");
    let endpoint = if config.azure.endpoint.is_empty() {
        "not configured"
    } else {
        config.azure.endpoint.as_str()
    };
    println!("  Endpoint: {}", endpoint);
    println!("  Deployment: {}", config.azure.deployment_name);
    println!("  API version: {}", config.azure.api_version);
    let key_status = if config.azure.resolve_api_key().is_ok() {
        "configured"
    } else {
        "not configured"
    };
    println!("  API key ({}): {}", config.azure.api_key_env, key_status);

    Ok(())
}

fn working_dir() -> String {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn config_dir() -> String {
    directories::ProjectDirs::from("dev", "rampup", "rampup")
        .map(|p| p.config_dir().to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
