//! Type and role sets: positive/negative bitmaps plus STAR/COMP flags.
//!
//! The Set Expander (`crate::setexpand`) processes a `TypeSet` and a
//! `RoleSet` through the same routine, distinguished only by an `is_type`
//! tag — so both are the same shape here. The negative bitmap is
//! meaningful only when the set is a type set; a `RoleSet`'s negative
//! bitmap is always left empty by construction.

use bitflags::bitflags;

use super::bitmap::Bitmap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SetFlags: u8 {
        const STAR = 0b0000_0001;
        const COMP = 0b0000_0010;
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeOrRoleSet {
    pub positive: Bitmap,
    pub negative: Bitmap,
    pub flags: SetFlags,
}

impl TypeOrRoleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.negative.is_empty() && self.flags.is_empty()
    }
}

pub type TypeSet = TypeOrRoleSet;
pub type RoleSet = TypeOrRoleSet;
