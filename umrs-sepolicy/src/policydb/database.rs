//! The top-level decoded policy database and its per-kind symbol datums.

use std::collections::HashMap;

use bitflags::bitflags;

use super::avrule::PermissionBits;
use super::bitmap::Bitmap;
use super::block::AvRuleBlock;
use super::constraint::ConstraintExpr;
use super::context::SemanticMlsLevel;
use super::octx::{GenfsCon, OContext};
use super::symbol::{
    BoolIndex, CatIndex, ClassIndex, CommonIndex, RoleIndex, ScopeDatum, SensIndex, SymbolKind,
    SymbolTable, TypeIndex, UserIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Selinux,
    Xen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleUnknown {
    Deny,
    Reject,
    Allow,
}

impl HandleUnknown {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Deny => "deny",
            Self::Reject => "reject",
            Self::Allow => "allow",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommonDatum {
    pub perms: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSrcTgt {
    Source,
    Target,
}

impl DefaultSrcTgt {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRangeSpec {
    SourceLow,
    SourceHigh,
    SourceLowHigh,
    TargetLow,
    TargetHigh,
    TargetLowHigh,
}

impl DefaultRangeSpec {
    #[must_use]
    pub const fn keywords(self) -> (&'static str, &'static str) {
        match self {
            Self::SourceLow => ("source", "low"),
            Self::SourceHigh => ("source", "high"),
            Self::SourceLowHigh => ("source", "low-high"),
            Self::TargetLow => ("target", "low"),
            Self::TargetHigh => ("target", "high"),
            Self::TargetLowHigh => ("target", "low-high"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassConstraint {
    pub perms: PermissionBits,
    pub expr: ConstraintExpr,
}

#[derive(Debug, Clone)]
pub struct ClassValidateTrans {
    pub expr: ConstraintExpr,
}

#[derive(Debug, Clone, Default)]
pub struct ClassDatum {
    pub common: Option<CommonIndex>,
    pub perms: Vec<String>,
    pub default_user: Option<DefaultSrcTgt>,
    pub default_role: Option<DefaultSrcTgt>,
    pub default_type: Option<DefaultSrcTgt>,
    pub default_range: Option<DefaultRangeSpec>,
    pub constraints: Vec<ClassConstraint>,
    pub validatetrans: Vec<ClassValidateTrans>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFlavor {
    Role,
    Attrib,
}

#[derive(Debug, Clone, Default)]
pub struct RoleDatum {
    pub flavor: Option<RoleFlavor>,
    pub types: Bitmap,
    pub roles: Bitmap,
    pub bounds: Option<RoleIndex>,
    pub dominates: Bitmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Type,
    Attrib,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TypeFlags: u8 {
        const PERMISSIVE = 0b0000_0001;
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeDatum {
    pub flavor: Option<TypeFlavor>,
    pub primary: bool,
    pub actual: Option<TypeIndex>,
    pub types: Bitmap,
    pub flags: TypeFlags,
    pub bounds: Option<TypeIndex>,
}

#[derive(Debug, Clone)]
pub struct UserDatum {
    pub roles: Bitmap,
    pub level: SemanticMlsLevel,
    pub range: (SemanticMlsLevel, SemanticMlsLevel),
}

#[derive(Debug, Clone, Copy)]
pub struct BoolDatum {
    pub tunable: bool,
    pub state: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SensDatum {
    pub alias_of: Option<SensIndex>,
    pub categories: Bitmap,
}

#[derive(Debug, Clone, Default)]
pub struct CatDatum {
    pub alias_of: Option<CatIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyDatabase {
    pub module_name: String,
    pub platform: Platform,
    pub mls_enabled: bool,
    pub is_base: bool,
    pub handle_unknown: HandleUnknown,
    pub policycaps: Bitmap,

    pub commons: SymbolTable<CommonDatum>,
    pub classes: SymbolTable<ClassDatum>,
    pub roles: SymbolTable<RoleDatum>,
    pub types: SymbolTable<TypeDatum>,
    pub users: SymbolTable<UserDatum>,
    pub bools: SymbolTable<BoolDatum>,
    pub sensitivities: SymbolTable<SensDatum>,
    pub categories: SymbolTable<CatDatum>,

    /// Keyed by (kind, zero-based index) — the declaring/requiring record
    /// for every name the decl-scope passes and §4.12's decl-role
    /// reconstruction look up.
    pub scopes: HashMap<(SymbolKind, u32), ScopeDatum>,

    pub blocks: Vec<AvRuleBlock>,

    pub initial_sids: Vec<OContext>,
    pub ports: Vec<OContext>,
    pub netifs: Vec<OContext>,
    pub nodes_v4: Vec<OContext>,
    pub nodes_v6: Vec<OContext>,
    pub fs_uses: Vec<OContext>,
    pub filesystems_present: bool,
    pub genfs: Vec<GenfsCon>,

    pub xen_pirqs: Vec<OContext>,
    pub xen_ioports: Vec<OContext>,
    pub xen_iomems: Vec<OContext>,
    pub xen_pcidevs: Vec<OContext>,
}

impl Default for Platform {
    fn default() -> Self {
        Self::Selinux
    }
}

impl Default for HandleUnknown {
    fn default() -> Self {
        Self::Deny
    }
}

impl PolicyDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scope_of(&self, kind: SymbolKind, index: u32) -> Option<&ScopeDatum> {
        self.scopes.get(&(kind, index))
    }
}
