//! Name Resolver: the single place the "-1 offset" lives.
//!
//! Every other component asks this module for a name; none of them ever
//! subtracts 1 from a stored value themselves. The one exception the
//! design calls out — MLS sensitivities referenced inside a `user`
//! statement declared inside an optional block use offset 0 instead of
//! offset 1 — is modeled as a distinct resolver method rather than a
//! boolean flag threaded through call sites, so callers can't forget it.

use umrs_selinux::{SelinuxRole, SelinuxType, SelinuxUser};

use crate::error::TranslateError;
use crate::policydb::{
    BoolIndex, CatIndex, ClassIndex, CommonIndex, PermissionBits, PolicyDatabase,
    RawSecurityContext, RoleIndex, SemanticMlsLevel, SensIndex, TypeIndex, UserIndex,
};

/// Maps a permission bitmask to its resolved name list, merging a class's
/// own permissions with any it inherits from a common. Common permissions
/// occupy the low bit positions; the class's own permissions continue
/// immediately after.
pub trait PermissionDecoder {
    fn permission_names(&self, class: ClassIndex, bits: PermissionBits) -> Vec<String>;
}

impl PermissionDecoder for PolicyDatabase {
    fn permission_names(&self, class: ClassIndex, bits: PermissionBits) -> Vec<String> {
        let Some(class_datum) = self.classes.datum_at(class.get()) else {
            return Vec::new();
        };

        let mut names = Vec::new();
        let mut offset = 0u32;

        if let Some(common_idx) = class_datum.common {
            if let Some(common) = self.commons.datum_at(common_idx.get()) {
                for (i, name) in common.perms.iter().enumerate() {
                    if bits.0 & (1 << i) != 0 {
                        names.push(name.clone());
                    }
                }
                offset = common.perms.len() as u32;
            }
        }

        for (i, name) in class_datum.perms.iter().enumerate() {
            let bit = offset + i as u32;
            if bit < 32 && bits.0 & (1 << bit) != 0 {
                names.push(name.clone());
            }
        }

        names
    }
}

/// Zero-based name lookup by symbol kind.
pub struct NameResolver<'a> {
    db: &'a PolicyDatabase,
}

impl<'a> NameResolver<'a> {
    #[must_use]
    pub const fn new(db: &'a PolicyDatabase) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn class_name(&self, index: ClassIndex) -> Option<&'a str> {
        self.db.classes.name_at(index.get())
    }

    #[must_use]
    pub fn common_name(&self, index: CommonIndex) -> Option<&'a str> {
        self.db.commons.name_at(index.get())
    }

    #[must_use]
    pub fn role_name(&self, index: RoleIndex) -> Option<&'a str> {
        self.db.roles.name_at(index.get())
    }

    #[must_use]
    pub fn type_name(&self, index: TypeIndex) -> Option<&'a str> {
        self.db.types.name_at(index.get())
    }

    #[must_use]
    pub fn user_name(&self, index: UserIndex) -> Option<&'a str> {
        self.db.users.name_at(index.get())
    }

    #[must_use]
    pub fn bool_name(&self, index: BoolIndex) -> Option<&'a str> {
        self.db.bools.name_at(index.get())
    }

    #[must_use]
    pub fn sens_name(&self, index: SensIndex) -> Option<&'a str> {
        self.db.sensitivities.name_at(index.get())
    }

    #[must_use]
    pub fn cat_name(&self, index: CatIndex) -> Option<&'a str> {
        self.db.categories.name_at(index.get())
    }

    /// Resolves a one-based stored value (the common "-1" offset).
    #[must_use]
    pub fn type_name_stored(&self, value: u32) -> Option<&'a str> {
        value.checked_sub(1).and_then(|idx| self.type_name(TypeIndex(idx)))
    }

    #[must_use]
    pub fn role_name_stored(&self, value: u32) -> Option<&'a str> {
        value.checked_sub(1).and_then(|idx| self.role_name(RoleIndex(idx)))
    }

    #[must_use]
    pub fn user_name_stored(&self, value: u32) -> Option<&'a str> {
        value.checked_sub(1).and_then(|idx| self.user_name(UserIndex(idx)))
    }

    /// MLS sensitivities referenced inside a `user` statement declared in
    /// an optional block use offset 0; everywhere else, offset 1.
    #[must_use]
    pub fn sens_name_in_user_stmt(&self, value: u32, in_optional: bool) -> Option<&'a str> {
        if in_optional {
            self.sens_name(SensIndex(value))
        } else {
            value.checked_sub(1).and_then(|idx| self.sens_name(SensIndex(idx)))
        }
    }

    #[must_use]
    pub fn sens_name_stored(&self, value: u32) -> Option<&'a str> {
        value.checked_sub(1).and_then(|idx| self.sens_name(SensIndex(idx)))
    }

    #[must_use]
    pub fn cat_name_stored(&self, value: u32) -> Option<&'a str> {
        value.checked_sub(1).and_then(|idx| self.cat_name(CatIndex(idx)))
    }
}

/// Renders a semantic MLS level as `sens[:cats]`, where `cats` is a
/// comma-joined list of category names and dotted ranges (`lo.hi`).
/// `apply_offset` selects the "-1" stored-value convention (everywhere
/// except a `user` statement declared in an optional block, which resolves
/// at offset 0 via [`NameResolver::sens_name_in_user_stmt`] instead).
#[must_use]
pub fn render_semantic_level(
    resolver: &NameResolver<'_>,
    level: &SemanticMlsLevel,
    apply_offset: bool,
) -> Option<String> {
    let sens = if apply_offset {
        resolver.sens_name_stored(level.sensitivity.get())
    } else {
        resolver.sens_name(level.sensitivity)
    }?;

    if level.categories.is_empty() {
        return Some(sens.to_string());
    }

    let mut atoms = Vec::with_capacity(level.categories.len());
    for (lo, hi) in &level.categories {
        let lo_name = if apply_offset {
            resolver.cat_name_stored(lo.get())
        } else {
            resolver.cat_name(*lo)
        }?;
        if lo == hi {
            atoms.push(lo_name.to_string());
        } else {
            let hi_name = if apply_offset {
                resolver.cat_name_stored(hi.get())
            } else {
                resolver.cat_name(*hi)
            }?;
            atoms.push(format!("{lo_name}.{hi_name}"));
        }
    }

    Some(format!("{sens}:{}", atoms.join(",")))
}

/// Renders an object context as `(<user> <role> <type> (<low> <high>))`.
/// Object contexts always use the "-1" stored-value convention. In
/// non-MLS mode the level pair is the literal default, twice, rather than
/// an expansion of the (meaningless) stored sensitivity/category data.
pub fn render_context(
    resolver: &NameResolver<'_>,
    ctx: &RawSecurityContext,
    mls_enabled: bool,
) -> Result<String, TranslateError> {
    let user = resolver
        .user_name_stored(ctx.user.get())
        .ok_or_else(|| TranslateError::Structural("unresolved user in object context".into()))?;
    let role = resolver
        .role_name_stored(ctx.role.get())
        .ok_or_else(|| TranslateError::Structural("unresolved role in object context".into()))?;
    let type_ = resolver
        .type_name_stored(ctx.type_.get())
        .ok_or_else(|| TranslateError::Structural("unresolved type in object context".into()))?;

    // Route each resolved name through the validated identifier primitives
    // before re-emitting them: a decoded symbol table is trusted to be
    // well-formed, but this is the last point before the name reaches the
    // output stream, so a structurally broken entry (empty, oversized, or
    // non-printable) is caught here rather than written out verbatim.
    let user = SelinuxUser::new(user).map_err(|e| TranslateError::Structural(e.to_string()))?;
    let role = SelinuxRole::new(role).map_err(|e| TranslateError::Structural(e.to_string()))?;
    let type_ = SelinuxType::new(type_).map_err(|e| TranslateError::Structural(e.to_string()))?;

    let (low, high) = if mls_enabled {
        let (l, h) = &ctx.range;
        let low = render_semantic_level(resolver, l, true)
            .ok_or_else(|| TranslateError::Structural("unresolved low level in object context".into()))?;
        let high = render_semantic_level(resolver, h, true)
            .ok_or_else(|| TranslateError::Structural("unresolved high level in object context".into()))?;
        (low, high)
    } else {
        (crate::names::DEFAULT_LEVEL.to_string(), crate::names::DEFAULT_LEVEL.to_string())
    };

    Ok(format!("({user} {role} {type_} ({low} {high}))"))
}

/// Joins names with a single space, the separator every multi-name form
/// in the target language uses.
#[must_use]
pub fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
