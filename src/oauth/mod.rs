mod oauth_client;
mod token;

pub use token::{GrantedToken, OAuthError, TokenPayload};
