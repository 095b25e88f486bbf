//! Symbol Lowerers (§4.8), dispatched per-kind by the Block Walker (§4.11).
//!
//! Each function implements exactly one of the spec's bulleted per-kind
//! rules; `scope` is supplied by the caller rather than looked up here, so
//! the walker controls which pass (declared/required) a given call belongs
//! to.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::names::{DEFAULT_LEVEL, DEFAULT_OBJECT};
use crate::policydb::{
    Bitmap, BoolDatum, CatDatum, ClassDatum, ClassIndex, PolicyDatabase, RoleDatum, RoleFlavor,
    RoleIndex, Scope, SensDatum, TypeDatum, TypeFlags, TypeFlavor, TypeIndex, UserDatum,
};
use crate::resolve::{join_names, render_semantic_level, NameResolver, PermissionDecoder};
use crate::setexpand::LowerCtx;

use super::constraint::{lower_class_constraint, lower_class_validatetrans};

fn names_for_bitmap<'r>(
    resolver: &NameResolver<'r>,
    bitmap: &Bitmap,
    lookup: impl Fn(&NameResolver<'r>, u32) -> Option<&'r str>,
) -> Result<Vec<&'r str>, TranslateError> {
    bitmap
        .iter()
        .map(|bit| lookup(resolver, bit).ok_or_else(|| TranslateError::Structural("unresolved index in symbol bitmap".into())))
        .collect()
}

/// A decl's enclosing block carries the OPTIONAL flag iff any decl in
/// `decl_ids` belongs to a block with that flag set.
#[must_use]
pub fn decl_is_optional(db: &PolicyDatabase, decl_ids: &[u32]) -> bool {
    db.blocks
        .iter()
        .any(|block| block.is_optional() && block.decls.iter().any(|d| decl_ids.contains(&d.decl_id)))
}

pub fn lower_class<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &impl PermissionDecoder,
    emitter: &mut Emitter<W>,
    class: ClassIndex,
    name: &str,
    datum: &ClassDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if scope == Scope::Req {
        return Ok(());
    }

    let perm_names = join_names(datum.perms.iter().map(String::as_str));
    emitter.line(ctx.indent, &format!("(class {name} ({perm_names}))"))?;

    if let Some(common_idx) = datum.common {
        let common_name = resolver
            .common_name(common_idx)
            .ok_or_else(|| TranslateError::Structural("unresolved common index on class".into()))?;
        emitter.line(ctx.indent, &format!("(classcommon {name} {common_name})"))?;
    }

    if let Some(d) = datum.default_user {
        emitter.line(ctx.indent, &format!("(defaultuser {name} {})", d.keyword()))?;
    }
    if let Some(d) = datum.default_role {
        emitter.line(ctx.indent, &format!("(defaultrole {name} {})", d.keyword()))?;
    }
    if let Some(d) = datum.default_type {
        emitter.line(ctx.indent, &format!("(defaulttype {name} {})", d.keyword()))?;
    }
    if let Some(d) = datum.default_range {
        let (src_tgt, range_spec) = d.keywords();
        emitter.line(ctx.indent, &format!("(defaultrange {name} {src_tgt} {range_spec})"))?;
    }

    for constraint in &datum.constraints {
        lower_class_constraint(ctx, resolver, db, emitter, name, class, constraint)?;
    }
    for validatetrans in &datum.validatetrans {
        lower_class_validatetrans(ctx, resolver, emitter, name, validatetrans)?;
    }

    Ok(())
}

fn emit_role_types<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    types: &Bitmap,
) -> Result<(), TranslateError> {
    for type_name in names_for_bitmap(resolver, types, |r, bit| r.type_name(TypeIndex(bit)))? {
        emitter.line(ctx.indent, &format!("(roletype {name} {type_name})"))?;
    }
    Ok(())
}

pub fn lower_role<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: &RoleDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if datum.dominates.count() > 1 {
        log::warn!("role {name}: dominates bitmap with cardinality > 1 is unsupported, dropping");
    }

    match datum.flavor {
        Some(RoleFlavor::Attrib) => {
            if scope == Scope::Decl {
                emitter.line(ctx.indent, &format!("(roleattribute {name})"))?;
            }
            if !datum.roles.is_empty() {
                let role_names = names_for_bitmap(resolver, &datum.roles, |r, bit| r.role_name(RoleIndex(bit)))?;
                emitter.line(ctx.indent, &format!("(roleattributeset {name} ({}))", join_names(role_names)))?;
            }
            emit_role_types(ctx, resolver, emitter, name, &datum.types)?;
        }
        Some(RoleFlavor::Role) | None => {
            if scope == Scope::Decl && !db.is_base {
                emitter.line(ctx.indent, &format!("(role {name})"))?;
                return Ok(());
            }
            emit_role_types(ctx, resolver, emitter, name, &datum.types)?;
            if let Some(bounds) = datum.bounds {
                let bounds_name = resolver
                    .role_name(bounds)
                    .ok_or_else(|| TranslateError::Structural("unresolved rolebounds index".into()))?;
                emitter.line(ctx.indent, &format!("(rolebounds {name} {bounds_name})"))?;
            }
        }
    }

    Ok(())
}

pub fn lower_type<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: &TypeDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if scope != Scope::Decl {
        return Ok(());
    }

    match datum.flavor {
        Some(TypeFlavor::Attrib) => {
            emitter.line(ctx.indent, &format!("(typeattribute {name})"))?;
            if !datum.types.is_empty() {
                let type_names = names_for_bitmap(resolver, &datum.types, |r, bit| r.type_name(TypeIndex(bit)))?;
                emitter.line(ctx.indent, &format!("(typeattributeset {name} ({}))", join_names(type_names)))?;
            }
        }
        Some(TypeFlavor::Type) | None => {
            if datum.primary {
                emitter.line(ctx.indent, &format!("(type {name})"))?;
                emitter.line(ctx.indent, &format!("(roletype {DEFAULT_OBJECT} {name})"))?;
            } else {
                let actual_name = datum
                    .actual
                    .and_then(|a| resolver.type_name(a))
                    .ok_or_else(|| TranslateError::Structural("type alias missing actual type".into()))?;
                emitter.line(ctx.indent, &format!("(typealias {name})"))?;
                emitter.line(ctx.indent, &format!("(typealiasactual {name} {actual_name})"))?;
            }

            if datum.flags.contains(TypeFlags::PERMISSIVE) {
                emitter.line(ctx.indent, &format!("(typepermissive {name})"))?;
            }
            if let Some(bounds) = datum.bounds {
                let bounds_name = resolver
                    .type_name(bounds)
                    .ok_or_else(|| TranslateError::Structural("unresolved typebounds index".into()))?;
                emitter.line(ctx.indent, &format!("(typebounds {bounds_name} {name})"))?;
            }
        }
    }

    Ok(())
}

pub fn lower_user<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: &UserDatum,
    scope: Scope,
    in_optional: bool,
) -> Result<(), TranslateError> {
    if scope != Scope::Decl {
        return Ok(());
    }

    emitter.line(ctx.indent, &format!("(user {name})"))?;
    emitter.line(ctx.indent, &format!("(userrole {name} {DEFAULT_OBJECT})"))?;

    for role_name in names_for_bitmap(resolver, &datum.roles, |r, bit| r.role_name(RoleIndex(bit)))? {
        emitter.line(ctx.indent, &format!("(userrole {name} {role_name})"))?;
    }

    let (level_str, low_str, high_str) = if ctx.mls_enabled {
        let apply_offset = !in_optional;
        let level = render_semantic_level(resolver, &datum.level, apply_offset)
            .ok_or_else(|| TranslateError::Structural("unresolved user level".into()))?;
        let low = render_semantic_level(resolver, &datum.range.0, apply_offset)
            .ok_or_else(|| TranslateError::Structural("unresolved user range low".into()))?;
        let high = render_semantic_level(resolver, &datum.range.1, apply_offset)
            .ok_or_else(|| TranslateError::Structural("unresolved user range high".into()))?;
        (level, low, high)
    } else {
        (DEFAULT_LEVEL.to_string(), DEFAULT_LEVEL.to_string(), DEFAULT_LEVEL.to_string())
    };

    emitter.line(ctx.indent, &format!("(userlevel {name} {level_str})"))?;
    emitter.line(ctx.indent, &format!("(userrange {name} ({low_str} {high_str}))"))
}

pub fn lower_bool<W: Write>(
    ctx: &LowerCtx<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: BoolDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if scope != Scope::Decl {
        return Ok(());
    }
    let kw = if datum.tunable { "tunable" } else { "boolean" };
    let state = if datum.state { "true" } else { "false" };
    emitter.line(ctx.indent, &format!("({kw} {name} {state})"))
}

pub fn lower_sens<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: &SensDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if scope != Scope::Decl {
        return Ok(());
    }

    if let Some(alias_of) = datum.alias_of {
        let actual = resolver
            .sens_name(alias_of)
            .ok_or_else(|| TranslateError::Structural("sensitivity alias missing actual".into()))?;
        emitter.line(ctx.indent, &format!("(sensitivityalias {name})"))?;
        emitter.line(ctx.indent, &format!("(sensitivityaliasactual {name} {actual})"))?;
    } else {
        emitter.line(ctx.indent, &format!("(sensitivity {name})"))?;
    }

    if !datum.categories.is_empty() {
        let cat_names = names_for_bitmap(resolver, &datum.categories, |r, bit| {
            r.cat_name(crate::policydb::CatIndex(bit))
        })?;
        emitter.line(ctx.indent, &format!("(sensitivitycategory {name} ({}))", join_names(cat_names)))?;
    }

    Ok(())
}

pub fn lower_cat<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    name: &str,
    datum: &CatDatum,
    scope: Scope,
) -> Result<(), TranslateError> {
    if scope == Scope::Req {
        return Ok(());
    }

    if let Some(alias_of) = datum.alias_of {
        let actual = resolver
            .cat_name(alias_of)
            .ok_or_else(|| TranslateError::Structural("category alias missing actual".into()))?;
        emitter.line(ctx.indent, &format!("(categoryalias {name})"))?;
        emitter.line(ctx.indent, &format!("(categoryaliasactual {name} {actual})"))
    } else {
        emitter.line(ctx.indent, &format!("(category {name})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policydb::*;

    struct StubPerms;
    impl PermissionDecoder for StubPerms {
        fn permission_names(&self, _class: ClassIndex, _bits: PermissionBits) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn req_scope_class_emits_nothing() {
        let db = PolicyDatabase::new();
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        lower_class(&mut ctx, &resolver, &StubPerms, &mut emitter, ClassIndex(0), "file", &ClassDatum::default(), Scope::Req).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn module_role_decl_emits_bare_role_and_returns() {
        let mut db = PolicyDatabase::new();
        db.is_base = false;
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let datum = RoleDatum { flavor: Some(RoleFlavor::Role), ..Default::default() };
        lower_role(&ctx, &resolver, &db, &mut emitter, "staff_r", &datum, Scope::Decl).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "(role staff_r)\n");
    }

    #[test]
    fn base_role_expands_types_and_bounds() {
        let mut db = PolicyDatabase::new();
        db.is_base = true;
        let t1 = db.types.push("t1", TypeDatum::default());
        let bound_role = db.roles.push("staff_r", RoleDatum::default());
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut types = Bitmap::new();
        types.set(t1);
        let datum = RoleDatum { flavor: Some(RoleFlavor::Role), types, bounds: Some(RoleIndex(bound_role)), ..Default::default() };
        lower_role(&ctx, &resolver, &db, &mut emitter, "sysadm_r", &datum, Scope::Decl).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(roletype sysadm_r t1)"));
        assert!(out.contains("(rolebounds sysadm_r staff_r)"));
    }

    #[test]
    fn primary_type_emits_type_and_default_roletype() {
        let db = PolicyDatabase::new();
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let datum = TypeDatum { flavor: Some(TypeFlavor::Type), primary: true, ..Default::default() };
        lower_type(&ctx, &resolver, &mut emitter, "sshd_t", &datum, Scope::Decl).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(type sshd_t)\n(roletype object_r sshd_t)\n");
    }

    #[test]
    fn non_mls_user_uses_literal_default_level() {
        let db = PolicyDatabase::new();
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let datum = UserDatum {
            roles: Bitmap::new(),
            level: SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() },
            range: (
                SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() },
                SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() },
            ),
        };
        lower_user(&ctx, &resolver, &mut emitter, "staff_u", &datum, Scope::Decl, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(userlevel staff_u systemlow)"));
        assert!(out.contains("(userrange staff_u (systemlow systemlow))"));
    }

    #[test]
    fn bool_emits_tunable_or_boolean_by_flag() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_bool(&ctx, &mut emitter, "allow_ssh", BoolDatum { tunable: true, state: false }, Scope::Decl).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "(tunable allow_ssh false)\n");
    }
}
