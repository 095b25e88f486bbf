//! Access-vector rules.

use super::sets::TypeSet;
use super::symbol::{ClassIndex, TypeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvRuleKind {
    Allow,
    AuditAllow,
    AuditDeny,
    DontAudit,
    NeverAllow,
    Transition,
    Member,
    Change,
}

impl AvRuleKind {
    /// The emitted keyword. `AuditDeny`'s spelling follows the corrected
    /// `auditdeny` form rather than the `auditdenty` typo the source used
    /// (see DESIGN.md's Open Question resolution).
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::AuditAllow => "auditallow",
            Self::AuditDeny => "auditdeny",
            Self::DontAudit => "dontaudit",
            Self::NeverAllow => "neverallow",
            Self::Transition => "typetransition",
            Self::Member => "typemember",
            Self::Change => "typechange",
        }
    }

    #[must_use]
    pub const fn is_access_vector(self) -> bool {
        matches!(
            self,
            Self::Allow | Self::AuditAllow | Self::AuditDeny | Self::DontAudit | Self::NeverAllow
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionBits(pub u32);

/// The per-kind payload: an access-vector rule carries a permission
/// bitmask; a transition/member/change rule carries a single new type
/// index. Making this a tagged variant (rather than a bare integer
/// reused for both meanings) makes the distinction total at the type
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePayload {
    AccessVector {
        class: ClassIndex,
        perms: PermissionBits,
    },
    NewType {
        class: ClassIndex,
        new_type: TypeIndex,
    },
}

impl RulePayload {
    #[must_use]
    pub const fn class(self) -> ClassIndex {
        match self {
            Self::AccessVector { class, .. } | Self::NewType { class, .. } => class,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AvRule {
    pub kind: AvRuleKind,
    pub source: TypeSet,
    pub target: TypeSet,
    pub self_flag: bool,
    pub nodes: Vec<RulePayload>,
}
