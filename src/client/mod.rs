//! Client side of the registration flow: the HTTP API wrapper and the
//! form models behind the signup and login pages.

pub mod api;
pub mod form;
pub mod login;
pub mod signup;

pub use api::{ApiClient, ApiError, RegistrationApi};
pub use form::{Field, FieldErrors};
