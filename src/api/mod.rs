mod classify;
mod client;
mod envelope;
mod error;
mod request;

pub use client::{ApiClient, Credentials};
pub use envelope::{ResponseEnvelope, ResponseHeaders};
pub use error::ApiError;
pub use request::ApiRequest;

pub(crate) use envelope::decode_body;
