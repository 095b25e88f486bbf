// ============================================================================
// UMRS SELINUX: Security Context (Security Label)
// NIST 800-53 AC-4 / NSA RTB (Strong Data Modeling & Lattice Math)
// ============================================================================
//! Security Context (a.k.a, Security Label or just Label)
//!
//! Author: Jamie Adams (a.k.a, Imodium Operator)
//!
//! This module defines the strongly-typed `SecurityContext` structure used
//! throughout the UMRS SELinux userland modeling layer.
//!
//! A Security Context represents the canonical SELinux label format:
//!     user : role : type [:range]
//!
//! NIST 800-53 AC-4: This module enforces the internal representation of
//! security attributes used for Information Flow Enforcement.

use std::fmt;
use std::str::FromStr;

use crate::mls::range::MlsRange;
use crate::role::SelinuxRole;
use crate::type_id::SelinuxType;
use crate::user::SelinuxUser;

// ===========================================================================
// SecurityContext structure
// ===========================================================================
/// NIST 800-53 AC-3: Access Enforcement logic depends on this structure.
/// NSA RTB: Minimized TCB via strictly bounded data structures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct SecurityContext {
    user: SelinuxUser,
    role: SelinuxRole,
    security_type: SelinuxType,
    range: Option<MlsRange>,
}

impl SecurityContext {
    /// Creates a new SecurityContext with an optional MLS range.
    pub const fn new(
        user: SelinuxUser,
        role: SelinuxRole,
        security_type: SelinuxType,
        range: Option<MlsRange>,
    ) -> Self {
        Self {
            user,
            role,
            security_type,
            range,
        }
    }

    /// Returns the SELinux user component.
    #[must_use]
    pub const fn user(&self) -> &SelinuxUser {
        &self.user
    }

    /// Returns the SELinux role component.
    #[must_use]
    pub const fn role(&self) -> &SelinuxRole {
        &self.role
    }

    /// Returns the SELinux type component.
    #[must_use]
    pub const fn security_type(&self) -> &SelinuxType {
        &self.security_type
    }

    /// Returns the optional MLS/MCS range component.
    #[must_use]
    pub fn range(&self) -> Option<&MlsRange> {
        self.range.as_ref()
    }
}

/// Provides canonical string serialization in standard SELinux format.
impl fmt::Display for SecurityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(
                f,
                "{}:{}:{}:{}",
                self.user, self.role, self.security_type, range
            ),
            None => {
                write!(f, "{}:{}:{}", self.user, self.role, self.security_type)
            }
        }
    }
}

// ===========================================================================
// Error Taxonomy
// ===========================================================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextParseError {
    InvalidFormat,
    InvalidUser,
    InvalidRole,
    InvalidType,
    InvalidRange,
}

impl fmt::Display for ContextParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid security context format"),
            Self::InvalidUser => write!(f, "invalid SELinux user field"),
            Self::InvalidRole => write!(f, "invalid SELinux role field"),
            Self::InvalidType => write!(f, "invalid SELinux type field"),
            Self::InvalidRange => write!(f, "invalid SELinux range/MLS field"),
        }
    }
}

impl std::error::Error for ContextParseError {}

// ===========================================================================
// Trait Implementations
// ===========================================================================
impl FromStr for SecurityContext {
    type Err = ContextParseError;

    /// NIST 800-53 SI-7: Software Integrity
    ///
    /// Parses both the 3-field (TE only) and 4-field (MLS/MCS) forms of a
    /// security context. The fourth field, when present, is the full
    /// `low[-high]` MLS range rather than a bare level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, ':').collect();

        if parts.len() < 3 {
            return Err(ContextParseError::InvalidFormat);
        }

        let user = SelinuxUser::from_str(parts[0]).map_err(|_| ContextParseError::InvalidUser)?;

        let role = SelinuxRole::from_str(parts[1]).map_err(|_| ContextParseError::InvalidRole)?;

        let security_type =
            SelinuxType::from_str(parts[2]).map_err(|_| ContextParseError::InvalidType)?;

        let range = match parts.get(3) {
            Some(range_raw) => {
                Some(MlsRange::from_str(range_raw).map_err(|_| ContextParseError::InvalidRange)?)
            }
            None => None,
        };

        Ok(Self::new(user, role, security_type, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(raw: &str) -> SecurityContext {
        raw.parse().unwrap()
    }

    #[test]
    fn round_trips_te_only_context() {
        let c = ctx("system_u:system_r:sshd_t");
        assert_eq!(c.to_string(), "system_u:system_r:sshd_t");
        assert!(c.range().is_none());
    }

    #[test]
    fn round_trips_mls_context() {
        let c = ctx("staff_u:staff_r:staff_t:s0-s0:c0,c1");
        assert_eq!(c.to_string(), "staff_u:staff_r:staff_t:s0-s0:c0,c1");
        assert!(c.range().is_some());
    }

    #[test]
    fn rejects_too_few_fields() {
        assert_eq!(
            "system_u:system_r".parse::<SecurityContext>(),
            Err(ContextParseError::InvalidFormat)
        );
    }
}
