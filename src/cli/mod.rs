//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Intake using clap.

pub mod app;
pub mod commands;
pub mod draft_file;

use clap::{Parser, Subcommand};

/// Intake - patient intake client
#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(version, about, long_about = None)]
#[command(author = "Intake Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "intake.toml", env = "INTAKE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "INTAKE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Sign in and keep the session for later commands
    Login(commands::auth::LoginArgs),

    /// Sign out and forget the stored session
    Logout(commands::auth::LogoutArgs),

    /// Show the signed-in user
    Whoami(commands::auth::WhoamiArgs),

    /// Create patients from a draft file
    Patient(commands::patient::PatientArgs),

    /// Manage doctor accounts
    Doctors(commands::doctors::DoctorsArgs),
}
