//! Composition wrappers over the context accessor.

pub mod authentication_required;
pub mod with_auth;

pub use authentication_required::AuthenticationRequired;
pub use with_auth::WithAuth;
