//! Translates a decoded SELinux/Xen policy database into CIL-like prefix
//! text. The binary decode step itself (`policydb::PolicyDecoder`) is an
//! external collaborator; everything downstream of an in-memory
//! [`policydb::PolicyDatabase`] lives here.

pub mod decoder;
pub mod emit;
pub mod error;
pub mod lower;
pub mod names;
pub mod policydb;
pub mod resolve;
pub mod setexpand;
pub mod sidecar;
pub mod walker;

pub use decoder::{DecodedPackage, PolicyDecoder, PolicySource};
pub use error::TranslateError;
