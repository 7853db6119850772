//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "intake.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Intake configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set api.base_url in {} to your backend", self.output);
                println!("  2. Validate configuration: intake validate-config");
                println!("  3. Sign in: intake login --email <email>");
                println!("  4. Start a draft: intake patient new --draft patient.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# Intake Configuration File
# Patient intake client for the hospital REST backend

# Runtime environment: development | staging | production
environment = "development"

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[api]
# Base URL of the backend, including the /api prefix
base_url = "http://localhost:4000/api"

# Request timeout in seconds
timeout_seconds = 30

# TLS certificate verification (always on in production)
tls_verify = true

[session]
# Where the signed-in session is kept between commands
path = ".intake/session.json"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
    }
}
