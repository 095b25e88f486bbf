//! The decoded policy database: the read-only input the lowering engine
//! walks. Every entity named in the data-model section of the design has
//! a corresponding Rust type here; nothing in this module mutates a
//! `PolicyDatabase` after a `PolicyDecoder` produces it.

pub mod avrule;
pub mod bitmap;
pub mod block;
pub mod cond;
pub mod constraint;
pub mod context;
pub mod database;
pub mod octx;
pub mod sets;
pub mod symbol;

pub use avrule::{AvRule, AvRuleKind, PermissionBits, RulePayload};
pub use bitmap::Bitmap;
pub use block::{
    AvRuleBlock, AvRuleDecl, BlockFlags, FilenameTransition, RangeTransition, RoleAllow,
    RoleTransition,
};
pub use cond::{CondAtom, CondFlags, CondNode, CondOp};
pub use constraint::{
    AttrCode, ConstraintAtom, ConstraintCombinator, ConstraintExpr, ConstraintNames, ConstraintOp,
};
pub use context::{RawSecurityContext, SemanticMlsLevel};
pub use database::{
    BoolDatum, CatDatum, ClassConstraint, ClassDatum, ClassValidateTrans, CommonDatum,
    DefaultRangeSpec, DefaultSrcTgt, HandleUnknown, Platform, PolicyDatabase, RoleDatum,
    RoleFlavor, SensDatum, TypeDatum, TypeFlags, TypeFlavor, UserDatum,
};
pub use octx::{FsUseBehavior, GenfsCon, OContext, PortProtocol};
pub use sets::{RoleSet, SetFlags, TypeSet};
pub use symbol::{
    BoolIndex, CatIndex, ClassIndex, CommonIndex, RoleIndex, Scope, ScopeDatum, ScopeIndex,
    SensIndex, SymbolKind, SymbolTable, TypeIndex, UserIndex,
};
