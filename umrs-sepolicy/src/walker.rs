//! Block Walker (§4.11–§4.15): the top-level driver. Threads the
//! optional-block stack discipline, dispatches the declared/required/
//! additive scope passes per decl, then the rule lists, then object
//! contexts and the text side-cars.

use std::io::Write;

use crate::decoder::{CapabilityNameLookup, DecodedPackage};
use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::lower::{
    decl_is_optional, lower_avrule, lower_bool, lower_cat, lower_class, lower_cond,
    lower_filename_transition, lower_object_contexts, lower_range_transition, lower_role,
    lower_role_transition, lower_sens, lower_type, lower_user,
};
use crate::names::{sanitize_module_name, DEFAULT_LEVEL, DEFAULT_OBJECT};
use crate::policydb::{AvRuleDecl, ClassIndex, PolicyDatabase, Scope, ScopeIndex, SymbolKind, TypeSet};
use crate::resolve::{join_names, NameResolver};
use crate::setexpand::{expand_set, LowerCtx};
use crate::sidecar::{lower_file_contexts, lower_netfilter_contexts, lower_seusers, lower_user_extra};

/// Translates one fully-decoded package to the target text form.
pub fn translate_package<W: Write>(
    emitter: &mut Emitter<W>,
    package: &DecodedPackage,
    capabilities: &impl CapabilityNameLookup,
) -> Result<(), TranslateError> {
    let db = &package.database;
    let resolver = NameResolver::new(db);
    let module_name = sanitize_module_name(&db.module_name);
    let mut ctx = LowerCtx::new(&module_name, db.mls_enabled);

    if db.is_base {
        emitter.line(ctx.indent, &format!("(role {DEFAULT_OBJECT})"))?;
        emitter.line(ctx.indent, &format!("(handleunknown {})", db.handle_unknown.keyword()))?;
        emitter.line(ctx.indent, &format!("(mls {})", db.mls_enabled))?;

        if !db.mls_enabled {
            emitter.line(ctx.indent, "(sensitivity s0)")?;
            emitter.line(ctx.indent, "(sensitivityorder (s0))")?;
            emitter.line(ctx.indent, &format!("(level {DEFAULT_LEVEL} (s0))"))?;
        }
    }

    for cap_id in db.policycaps.iter() {
        let name = capabilities
            .capability_name(cap_id)
            .ok_or(TranslateError::UnknownCapability(cap_id))?;
        emitter.line(ctx.indent, &format!("(policycap {name})"))?;
    }

    run_blocks(&mut ctx, &resolver, db, emitter)?;
    lower_object_contexts(&ctx, &resolver, db, emitter)?;

    lower_file_contexts(&ctx, emitter, &package.file_contexts)?;
    lower_seusers(&ctx, emitter, &package.seusers)?;
    lower_user_extra(&ctx, emitter, &package.user_extra)?;
    lower_netfilter_contexts(&package.netfilter_contexts);

    Ok(())
}

fn run_blocks<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    let mut stack: Vec<&ScopeIndex> = Vec::new();
    let mut global_prelude_emitted = false;

    for block in &db.blocks {
        let Some(decl) = block.decls.first() else {
            continue;
        };
        if block.decls.len() > 1 {
            log::warn!("block has {} decls; optional else-branches are unsupported, dropping alternatives", block.decls.len());
        }

        if block.is_optional() {
            while let Some(top) = stack.last() {
                if decl.required.is_subset_of(*top) {
                    break;
                }
                stack.pop();
                ctx.indent -= 1;
                emitter.line(ctx.indent, ")")?;
            }

            emitter.line(ctx.indent, &format!("(optional {}_optional_{}", ctx.module_name, decl.decl_id))?;
            stack.push(&decl.required);
            ctx.indent += 1;
        }

        if stack.len() <= 1 && !global_prelude_emitted {
            global_prelude_emitted = true;
            lower_type_aliases(ctx, resolver, db, emitter)?;
            lower_commons(ctx, db, emitter)?;
        }

        lower_decl_roles(ctx, resolver, db, emitter, decl)?;
        lower_declared_scope(ctx, resolver, db, emitter, decl, block.is_optional())?;
        lower_required_scope(ctx, resolver, db, emitter, decl)?;
        lower_additive_scope(ctx, resolver, db, emitter, decl)?;

        for rule in &decl.avrules {
            lower_avrule(ctx, resolver, db, emitter, rule)?;
        }
        for transition in &decl.role_transitions {
            lower_role_transition(ctx, resolver, emitter, transition)?;
        }
        for allow in &decl.role_allows {
            let from = resolver
                .role_name(allow.from)
                .ok_or_else(|| TranslateError::Structural("unresolved role in roleallow".into()))?;
            let to = resolver
                .role_name(allow.to)
                .ok_or_else(|| TranslateError::Structural("unresolved role in roleallow".into()))?;
            emitter.line(ctx.indent, &format!("(roleallow {from} {to})"))?;
        }
        for transition in &decl.range_transitions {
            if db.mls_enabled {
                lower_range_transition(ctx, resolver, emitter, transition)?;
            }
        }
        for transition in &decl.filename_transitions {
            lower_filename_transition(ctx, resolver, emitter, transition)?;
        }
        for cond in &decl.conditionals {
            lower_cond(ctx, resolver, db, emitter, cond)?;
        }
    }

    while !stack.is_empty() {
        stack.pop();
        ctx.indent -= 1;
        emitter.line(ctx.indent, ")")?;
    }

    Ok(())
}

fn lower_type_aliases<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for (_, name, datum) in db.types.iter() {
        if !datum.primary {
            lower_type(ctx, resolver, emitter, name, datum, Scope::Decl)?;
        }
    }
    Ok(())
}

fn lower_commons<W: Write>(
    ctx: &LowerCtx<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for (_, name, datum) in db.commons.iter() {
        let perm_names = join_names(datum.perms.iter().map(String::as_str));
        emitter.line(ctx.indent, &format!("(common {name} ({perm_names}))"))?;
    }
    Ok(())
}

/// §4.12: reconciles global role-to-type associations with the decl that
/// actually declared each type, since the binary form merges them.
fn lower_decl_roles<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
    decl: &AvRuleDecl,
) -> Result<(), TranslateError> {
    for (role_idx, role_name, role_datum) in db.roles.iter() {
        if role_name == DEFAULT_OBJECT {
            continue;
        }
        if db.scope_of(SymbolKind::Role, role_idx).map(|s| s.scope) != Some(Scope::Decl) {
            continue;
        }

        let mut set = TypeSet::new();
        set.positive = role_datum.types.clone();
        let type_names = expand_set(ctx, resolver, emitter, &set, true)?;

        for type_name in &type_names {
            let Some(type_idx) = db.types.index_of(type_name) else {
                continue;
            };
            let Some(type_scope) = db.scope_of(SymbolKind::Type, type_idx) else {
                continue;
            };
            if type_scope.decl_ids.contains(&decl.decl_id) {
                emitter.line(ctx.indent, &format!("(roletype {role_name} {type_name})"))?;
            }
        }
    }

    Ok(())
}

fn lower_declared_scope<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
    decl: &AvRuleDecl,
    in_optional: bool,
) -> Result<(), TranslateError> {
    for idx in decl.declared.class.iter() {
        let name = db
            .classes
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared class".into()))?;
        let datum = db
            .classes
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared class datum".into()))?;
        lower_class(ctx, resolver, db, emitter, ClassIndex(idx), name, datum, Scope::Decl)?;
    }

    for idx in decl.declared.role.iter() {
        let name = db
            .roles
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared role".into()))?;
        let datum = db
            .roles
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared role datum".into()))?;
        lower_role(ctx, resolver, db, emitter, name, datum, Scope::Decl)?;
    }

    for idx in decl.declared.type_.iter() {
        let name = db
            .types
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared type".into()))?;
        let datum = db
            .types
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared type datum".into()))?;
        lower_type(ctx, resolver, emitter, name, datum, Scope::Decl)?;
    }

    for idx in decl.declared.user.iter() {
        let name = db
            .users
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared user".into()))?;
        let datum = db
            .users
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared user datum".into()))?;
        lower_user(ctx, resolver, emitter, name, datum, Scope::Decl, in_optional)?;
    }

    for idx in decl.declared.bool_.iter() {
        let name = db
            .bools
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared bool".into()))?;
        let datum = *db
            .bools
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared bool datum".into()))?;
        lower_bool(ctx, emitter, name, datum, Scope::Decl)?;
    }

    let mut sens_names = Vec::new();
    for idx in decl.declared.sens.iter() {
        let name = db
            .sensitivities
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared sensitivity".into()))?;
        let datum = db
            .sensitivities
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared sensitivity datum".into()))?;
        lower_sens(ctx, resolver, emitter, name, datum, Scope::Decl)?;
        sens_names.push(name);
    }
    if !sens_names.is_empty() {
        emitter.line(ctx.indent, &format!("(sensitivityorder ({}))", sens_names.join(" ")))?;
    }

    let mut cat_names = Vec::new();
    for idx in decl.declared.cat.iter() {
        let name = db
            .categories
            .name_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared category".into()))?;
        let datum = db
            .categories
            .datum_at(idx)
            .ok_or_else(|| TranslateError::Structural("unresolved declared category datum".into()))?;
        lower_cat(ctx, resolver, emitter, name, datum, Scope::Decl)?;
        cat_names.push(name);
    }
    if !cat_names.is_empty() {
        emitter.line(ctx.indent, &format!("(categoryorder ({}))", cat_names.join(" ")))?;
    }

    Ok(())
}

fn lower_required_scope<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
    decl: &AvRuleDecl,
) -> Result<(), TranslateError> {
    let in_optional = decl_is_optional(db, &[decl.decl_id]);

    for idx in decl.required.class.iter() {
        if let (Some(name), Some(datum)) = (db.classes.name_at(idx), db.classes.datum_at(idx)) {
            lower_class(ctx, resolver, db, emitter, ClassIndex(idx), name, datum, Scope::Req)?;
        }
    }
    for idx in decl.required.role.iter() {
        if let (Some(name), Some(datum)) = (db.roles.name_at(idx), db.roles.datum_at(idx)) {
            lower_role(ctx, resolver, db, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.required.type_.iter() {
        if let (Some(name), Some(datum)) = (db.types.name_at(idx), db.types.datum_at(idx)) {
            lower_type(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.required.user.iter() {
        if let (Some(name), Some(datum)) = (db.users.name_at(idx), db.users.datum_at(idx)) {
            lower_user(ctx, resolver, emitter, name, datum, Scope::Req, in_optional)?;
        }
    }
    for idx in decl.required.bool_.iter() {
        if let (Some(name), Some(datum)) = (db.bools.name_at(idx), db.bools.datum_at(idx)) {
            lower_bool(ctx, emitter, name, *datum, Scope::Req)?;
        }
    }
    for idx in decl.required.sens.iter() {
        if let (Some(name), Some(datum)) = (db.sensitivities.name_at(idx), db.sensitivities.datum_at(idx)) {
            lower_sens(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.required.cat.iter() {
        if let (Some(name), Some(datum)) = (db.categories.name_at(idx), db.categories.datum_at(idx)) {
            lower_cat(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }

    Ok(())
}

fn lower_additive_scope<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
    decl: &AvRuleDecl,
) -> Result<(), TranslateError> {
    let in_optional = decl_is_optional(db, &[decl.decl_id]);

    for idx in decl.additive.class.iter() {
        if let (Some(name), Some(datum)) = (db.classes.name_at(idx), db.classes.datum_at(idx)) {
            lower_class(ctx, resolver, db, emitter, ClassIndex(idx), name, datum, Scope::Req)?;
        }
    }
    for idx in decl.additive.role.iter() {
        if let (Some(name), Some(datum)) = (db.roles.name_at(idx), db.roles.datum_at(idx)) {
            lower_role(ctx, resolver, db, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.additive.type_.iter() {
        if let (Some(name), Some(datum)) = (db.types.name_at(idx), db.types.datum_at(idx)) {
            lower_type(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.additive.user.iter() {
        if let (Some(name), Some(datum)) = (db.users.name_at(idx), db.users.datum_at(idx)) {
            lower_user(ctx, resolver, emitter, name, datum, Scope::Req, in_optional)?;
        }
    }
    for idx in decl.additive.bool_.iter() {
        if let (Some(name), Some(datum)) = (db.bools.name_at(idx), db.bools.datum_at(idx)) {
            lower_bool(ctx, emitter, name, *datum, Scope::Req)?;
        }
    }
    for idx in decl.additive.sens.iter() {
        if let (Some(name), Some(datum)) = (db.sensitivities.name_at(idx), db.sensitivities.datum_at(idx)) {
            lower_sens(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }
    for idx in decl.additive.cat.iter() {
        if let (Some(name), Some(datum)) = (db.categories.name_at(idx), db.categories.datum_at(idx)) {
            lower_cat(ctx, resolver, emitter, name, datum, Scope::Req)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::StaticCapabilityTable;
    use crate::decoder::fixture;

    #[test]
    fn scenario_one_emits_prelude_and_rule() {
        let package = fixture::scenario_one_type_one_rule();
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        translate_package(&mut emitter, &package, &StaticCapabilityTable).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("(role object_r)"));
        assert!(out.contains("(mls false)"));
        assert!(out.contains("(type alpha)"));
        assert!(out.contains("(roletype object_r alpha)"));
        assert!(out.contains("(allow alpha alpha (file (read)))"));
    }

    #[test]
    fn scenario_self_flag_emits_only_self_targeted_rules() {
        let package = fixture::scenario_self_flag_empty_target();
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        translate_package(&mut emitter, &package, &StaticCapabilityTable).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("(allow s1 self (file (read)))"));
        assert!(out.contains("(allow s2 self (file (read)))"));
        assert!(!out.contains("(allow s1 s2"));
    }

    #[test]
    fn scenario_role_transition_emits_four_lines() {
        let package = fixture::scenario_role_transition();
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        translate_package(&mut emitter, &package, &StaticCapabilityTable).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let count = out.lines().filter(|l| l.starts_with("(roletransition")).count();
        assert_eq!(count, 4);
    }
}
