//! REST backend adapter
//!
//! - [`client`] - HTTP client, bearer token, status and error mapping
//! - [`patients`] - `POST /patients/validate` and `POST /patients`
//! - [`uploads`] - `POST /uploads`
//! - [`auth`] - `POST /auth/login`
//! - [`doctors`] - doctor administration
//! - [`traits`] - the seams the intake workflow depends on

pub mod auth;
pub mod client;
pub mod doctors;
pub mod patients;
pub mod traits;
pub mod uploads;

pub use auth::Credentials;
pub use client::{error_message, ApiClient};
pub use doctors::{DoctorQuery, NewDoctor, DEFAULT_SEARCH_LIMIT};
pub use traits::{Authenticator, DocumentUploader, PatientRegistry, ValidationGateway};
pub use uploads::DocumentFile;
