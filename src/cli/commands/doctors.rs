//! Doctor administration commands (staff only)

use crate::adapters::api::{DoctorQuery, NewDoctor, DEFAULT_SEARCH_LIMIT};
use crate::cli::app::{exit_code, load_or_report, App};
use crate::config::secret_string;
use crate::domain::{Doctor, DoctorId, IntakeError, Role};
use clap::{Args, Subcommand};

/// Arguments for the doctors command
#[derive(Args, Debug)]
pub struct DoctorsArgs {
    #[command(subcommand)]
    pub command: DoctorsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DoctorsCommand {
    /// Create a doctor account
    Add {
        #[arg(long)]
        email: String,

        /// Initial password
        #[arg(long, env = "INTAKE_DOCTOR_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Search doctors by name or email
    Search {
        #[arg(short, long, default_value = "")]
        q: String,

        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },

    /// Delete a doctor account
    Remove {
        /// Doctor ID
        id: String,
    },
}

impl DoctorsArgs {
    /// Execute the doctors command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let app = match load_or_report(config_path) {
            Ok(app) => app,
            Err(code) => return Ok(code),
        };

        if let Err(e) = app.session().require_role(Role::DOCTOR_ADMIN, "manage doctors") {
            return Ok(app.fail(&e));
        }

        match self.run(&app).await {
            Ok(()) => Ok(exit_code::OK),
            Err(e) => Ok(app.fail(&e)),
        }
    }

    async fn run(&self, app: &App) -> crate::domain::Result<()> {
        match &self.command {
            DoctorsCommand::Add {
                email,
                password,
                name,
            } => {
                let doctor = NewDoctor {
                    email: email.trim().to_string(),
                    password: secret_string(password.clone()),
                    name: name.clone().filter(|n| !n.trim().is_empty()),
                };
                let created = app.client.create_doctor(&doctor).await?;
                println!("✅ Doctor created");
                print_doctor(&created);
            }
            DoctorsCommand::Search { q, limit } => {
                let query = DoctorQuery {
                    q: q.clone(),
                    limit: *limit,
                };
                let list = app.client.search_doctors(&query).await?;
                println!("🔍 {} doctor(s)", list.items.len());
                for doctor in &list.items {
                    print_doctor(doctor);
                }
            }
            DoctorsCommand::Remove { id } => {
                let id = DoctorId::new(id.as_str()).map_err(|message| IntakeError::InvalidField {
                    path: "id".to_string(),
                    message,
                })?;
                app.client.delete_doctor(&id).await?;
                println!("🗑️  Doctor {id} deleted");
            }
        }
        Ok(())
    }
}

fn print_doctor(doctor: &Doctor) {
    println!(
        "  {}  {}  {}",
        doctor.id,
        doctor.name.as_deref().unwrap_or("-"),
        doctor.email.as_deref().unwrap_or("-")
    );
}
