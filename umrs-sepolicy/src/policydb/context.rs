//! Raw (index-based) security contexts, as they appear inside a decoded
//! policy database — distinct from `umrs_selinux::SecurityContext`, which
//! is the name-based form this translator ultimately renders into.

use super::symbol::{CatIndex, RoleIndex, SensIndex, TypeIndex, UserIndex};

/// A sensitivity plus an ordered list of category spans, both still
/// index-referenced and awaiting name resolution.
#[derive(Debug, Clone)]
pub struct SemanticMlsLevel {
    pub sensitivity: SensIndex,
    pub categories: Vec<(CatIndex, CatIndex)>,
}

#[derive(Debug, Clone)]
pub struct RawSecurityContext {
    pub user: UserIndex,
    pub role: RoleIndex,
    pub type_: TypeIndex,
    pub range: (SemanticMlsLevel, SemanticMlsLevel),
}
