//! Session handling
//!
//! - [`context`] - the injected session read by every request
//! - [`store`] - persistence of the session between CLI invocations
//! - [`controller`] - login, logout and expiry handling

pub mod context;
pub mod controller;
pub mod store;

pub use context::{Session, SessionContext};
pub use controller::{Navigation, SessionController};
pub use store::SessionStore;
