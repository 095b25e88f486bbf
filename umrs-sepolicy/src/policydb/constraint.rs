//! Constraint expressions: the richer postfix vocabulary used by
//! `constrain`/`validatetrans` statements, comparing context attributes
//! to each other or to a name-membership test.

use super::sets::TypeSet;
use super::bitmap::Bitmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Eq,
    Neq,
    Dom,
    Domby,
    Incomp,
}

impl ConstraintOp {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Dom => "dom",
            Self::Domby => "domby",
            Self::Incomp => "incomp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintCombinator {
    Not,
    And,
    Or,
}

impl ConstraintCombinator {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Not)
    }
}

/// The attribute codes a constraint leaf can reference. The user/role/type
/// families each carry three selectors (source, target, xtarget — `U1`
/// is the source user, `U2` the target user, `U3` the xtarget user, and
/// likewise for role/type); the MLS family names the six level-pair
/// comparisons directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrCode {
    U1,
    U2,
    U3,
    R1,
    R2,
    R3,
    T1,
    T2,
    T3,
    L1L2,
    L1H2,
    H1L2,
    H1H2,
    L1H1,
    L2H2,
}

impl AttrCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::U1 => "u1",
            Self::U2 => "u2",
            Self::U3 => "u3",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::T1 => "t1",
            Self::T2 => "t2",
            Self::T3 => "t3",
            Self::L1L2 => "l1l2",
            Self::L1H2 => "l1h2",
            Self::H1L2 => "h1l2",
            Self::H1H2 => "h1h2",
            Self::L1H1 => "l1h1",
            Self::L2H2 => "l2h2",
        }
    }

    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(self, Self::T1 | Self::T2 | Self::T3)
    }
}

/// The resolved name list for a NAMES-kind leaf: types go through the Set
/// Expander (they may synthesize an attribute), roles and users resolve
/// directly off their bitmap.
#[derive(Debug, Clone)]
pub enum ConstraintNames {
    Type(TypeSet),
    Plain(Bitmap),
}

#[derive(Debug, Clone)]
pub enum ConstraintAtom {
    Attr {
        op: ConstraintOp,
        attr1: AttrCode,
        attr2: AttrCode,
    },
    Names {
        op: ConstraintOp,
        attr: AttrCode,
        names: ConstraintNames,
    },
    Combinator(ConstraintCombinator),
}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    pub postfix: Vec<ConstraintAtom>,
}
