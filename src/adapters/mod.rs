//! External system integrations for Intake.
//!
//! - [`api`] - the hospital REST backend
//!
//! # Design Pattern
//!
//! Adapters isolate the HTTP client from the workflow. The intake
//! coordinator depends on the traits in [`api::traits`], so it can be tested
//! against in-memory implementations.
//!
//! ```rust,no_run
//! use intake::adapters::api::{ApiClient, DoctorQuery};
//! use intake::config::ApiConfig;
//! use intake::core::session::SessionContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(&ApiConfig::default(), SessionContext::anonymous())?;
//! let doctors = client.search_doctors(&DoctorQuery::default()).await?;
//! println!("{} doctors", doctors.items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
