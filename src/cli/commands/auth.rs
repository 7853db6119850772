//! Session commands: `login`, `logout` and `whoami`

use crate::adapters::api::Credentials;
use crate::cli::app::{exit_code, load_or_report};
use crate::config::secret_string;
use crate::domain::{ApiError, IntakeError};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Arguments for the login command
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password; read from stdin when omitted
    #[arg(long, env = "INTAKE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl LoginArgs {
    /// Execute the login command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };

        let password = match &self.password {
            Some(p) => p.clone(),
            None => read_password().await?,
        };
        let credentials = Credentials::new(&self.email, secret_string(password));

        println!("🔑 Signing in as {}", credentials.email);
        match app.controller.login(&credentials).await {
            Ok(user) => {
                println!("✅ Signed in");
                println!("  Name: {}", user.name.as_deref().unwrap_or("-"));
                println!("  Role: {}", user.role);
                Ok(exit_code::OK)
            }
            Err(IntakeError::Transport(ApiError::ClientError { message, .. })) => {
                tracing::warn!(email = %credentials.email, "Sign-in rejected");
                println!("❌ {message}");
                Ok(exit_code::SESSION)
            }
            Err(e) => Ok(app.fail(&e)),
        }
    }
}

async fn read_password() -> anyhow::Result<String> {
    println!("Password (end with Enter):");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Arguments for the logout command
#[derive(Args, Debug)]
pub struct LogoutArgs {}

impl LogoutArgs {
    /// Execute the logout command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };

        match app.controller.logout() {
            Ok(_) => {
                println!("👋 Signed out");
                Ok(exit_code::OK)
            }
            Err(e) => Ok(app.fail(&e)),
        }
    }
}

/// Arguments for the whoami command
#[derive(Args, Debug)]
pub struct WhoamiArgs {}

impl WhoamiArgs {
    /// Execute the whoami command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };

        match app.session().user() {
            Some(user) => {
                println!("👤 {}", user.email);
                println!("  Name: {}", user.name.as_deref().unwrap_or("-"));
                println!("  Role: {}", user.role);
                println!("  ID: {}", user.id);
                Ok(exit_code::OK)
            }
            None => Ok(app.fail(&IntakeError::AuthExpired)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_login_parses_email() {
        let cli = Cli::parse_from(["intake", "login", "--email", "staff@example.com"]);
        match cli.command {
            Commands::Login(args) => assert_eq!(args.email, "staff@example.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
