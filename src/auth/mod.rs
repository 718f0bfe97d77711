//! Authentication module
//!
//! # Components
//!
//! - `AuthSession`: state machine turning operator input into a credential
//! - `AuthState`: the session's states and allowed transitions
//! - `Credential`: the bearer token handed to the crawler

mod credential;
mod session;
mod state;

pub use credential::{Credential, IssuedVia};
pub use session::{AuthSession, CredentialInput, OtpProvider};
pub use state::AuthState;
