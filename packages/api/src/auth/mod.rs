//! Session state and the operations behind the sign-in widget.

mod client;
mod code;
mod session;

pub use client::{SessionClient, TokenVerdict};
pub use code::AuthorizationCode;
pub use session::{Session, SessionCell};
