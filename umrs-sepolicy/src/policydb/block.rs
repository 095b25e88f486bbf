//! The block tree: global and `optional { }` decl scopes.

use bitflags::bitflags;

use super::avrule::AvRule;
use super::bitmap::Bitmap;
use super::cond::CondNode;
use super::context::SemanticMlsLevel;
use super::symbol::{ClassIndex, RoleIndex, ScopeIndex, TypeIndex};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        const OPTIONAL = 0b0000_0001;
    }
}

#[derive(Debug, Clone)]
pub struct RoleTransition {
    pub roles: Bitmap,
    pub types: Bitmap,
    pub classes: Bitmap,
    pub new_role: RoleIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleAllow {
    pub from: RoleIndex,
    pub to: RoleIndex,
}

#[derive(Debug, Clone)]
pub struct RangeTransition {
    pub source_types: Bitmap,
    pub target_types: Bitmap,
    pub classes: Bitmap,
    pub range: (SemanticMlsLevel, SemanticMlsLevel),
}

#[derive(Debug, Clone)]
pub struct FilenameTransition {
    pub source_types: Bitmap,
    pub target_types: Bitmap,
    pub class: ClassIndex,
    pub filename: String,
    pub new_type: TypeIndex,
}

#[derive(Debug, Clone, Default)]
pub struct AvRuleDecl {
    pub decl_id: u32,
    pub declared: ScopeIndex,
    pub required: ScopeIndex,
    pub additive: ScopeIndex,
    pub avrules: Vec<AvRule>,
    pub role_transitions: Vec<RoleTransition>,
    pub role_allows: Vec<RoleAllow>,
    pub range_transitions: Vec<RangeTransition>,
    pub filename_transitions: Vec<FilenameTransition>,
    pub conditionals: Vec<CondNode>,
}

#[derive(Debug, Clone, Default)]
pub struct AvRuleBlock {
    pub flags: BlockFlags,
    /// Alternatives (`else` branches); the walker only ever lowers the
    /// first and warns-and-drops the rest.
    pub decls: Vec<AvRuleDecl>,
}

impl AvRuleBlock {
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.flags.contains(BlockFlags::OPTIONAL)
    }
}
