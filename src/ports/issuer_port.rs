//! Issuer directory port trait.

use crate::domain::error::EodError;
use crate::domain::issuer::Issuer;

/// Maps an opaque numeric security id to its issuer record.
pub trait IssuerPort {
    fn get_issuer(&self, id: i64) -> Result<Option<Issuer>, EodError>;
}
