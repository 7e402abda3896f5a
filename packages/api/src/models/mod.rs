//! Data models shared by the backend client and the session state.

mod messages;
mod user;

pub use messages::{
    LoginRequest, LoginResponse, ProfileResponse, UserDataResponse, VerifyTokenRequest,
    VerifyTokenResponse,
};
pub use user::UserProfile;
