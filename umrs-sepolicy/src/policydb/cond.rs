//! Conditional policy: postfix boolean expressions gating rule lists.

use bitflags::bitflags;

use super::avrule::AvRule;
use super::symbol::BoolIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Not,
    Or,
    And,
    Xor,
    Eq,
    Neq,
}

impl CondOp {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Or => "or",
            Self::And => "and",
            Self::Xor => "xor",
            Self::Eq => "eq",
            Self::Neq => "neq",
        }
    }

    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Not)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondAtom {
    Bool(BoolIndex),
    Op(CondOp),
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CondFlags: u8 {
        const TUNABLE = 0b0000_0001;
    }
}

#[derive(Debug, Clone)]
pub struct CondNode {
    pub postfix: Vec<CondAtom>,
    pub flags: CondFlags,
    pub true_rules: Vec<AvRule>,
    pub false_rules: Vec<AvRule>,
}
