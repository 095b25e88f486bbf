//! Set Expander: turns a `TypeSet`/`RoleSet` into either a plain name list
//! or a synthesized attribute declaration.
//!
//! The monotonic synthesized-attribute counter is shared across both type
//! and role synthesis (a single process-wide `N`), and lives on
//! [`LowerCtx`] rather than as a hidden global, per the design's
//! "pass the counter explicitly" note.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::policydb::{RoleSet, SymbolKind, TypeSet};
use crate::resolve::{join_names, NameResolver};

/// Threaded explicitly through every lowerer: current indent level, the
/// sanitized module name (prefix for every synthesized name), and the
/// next-attribute-id counter.
pub struct LowerCtx<'a> {
    pub module_name: &'a str,
    pub mls_enabled: bool,
    pub indent: usize,
    next_attr_id: u32,
}

impl<'a> LowerCtx<'a> {
    #[must_use]
    pub const fn new(module_name: &'a str, mls_enabled: bool) -> Self {
        Self {
            module_name,
            mls_enabled,
            indent: 0,
            next_attr_id: 0,
        }
    }

    fn next_id(&mut self) -> Result<u32, TranslateError> {
        self.next_attr_id = self
            .next_attr_id
            .checked_add(1)
            .ok_or_else(|| TranslateError::Structural("synthesized attribute counter overflow".into()))?;
        Ok(self.next_attr_id)
    }
}

fn resolve_bitmap_names<'r>(
    resolver: &NameResolver<'r>,
    is_type: bool,
    set: &crate::policydb::Bitmap,
) -> Vec<&'r str> {
    set.iter()
        .filter_map(|bit| {
            if is_type {
                resolver.type_name(crate::policydb::TypeIndex(bit))
            } else {
                resolver.role_name(crate::policydb::RoleIndex(bit))
            }
        })
        .collect()
}

/// Expands a set to a name list, emitting a synthesized attribute
/// declaration first when the set isn't plain. Returns the name list to
/// use as the rule's resolved source/target.
pub fn expand_set<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    set: &TypeSet,
    is_type: bool,
) -> Result<Vec<String>, TranslateError> {
    if set.is_plain() {
        return Ok(resolve_bitmap_names(resolver, is_type, &set.positive)
            .into_iter()
            .map(str::to_string)
            .collect());
    }

    let id = ctx.next_id()?;
    let infix = if is_type { "_typeattr_" } else { "_roleattr_" };
    let name = format!("{}{infix}{id}", ctx.module_name);

    let decl_kw = if is_type { "typeattribute" } else { "roleattribute" };
    emitter.line(ctx.indent, &format!("({decl_kw} {name})"))?;

    let pos_names = resolve_bitmap_names(resolver, is_type, &set.positive);
    let pos_part = (!pos_names.is_empty()).then(|| format!("({})", join_names(pos_names)));

    let neg_part = if is_type {
        let neg_names = resolve_bitmap_names(resolver, is_type, &set.negative);
        (!neg_names.is_empty()).then(|| format!("({})", join_names(neg_names)))
    } else {
        None
    };

    let core = if set.flags.contains(crate::policydb::SetFlags::STAR) {
        "(all)".to_string()
    } else {
        match (pos_part, neg_part) {
            (Some(p), Some(n)) => format!("(and {p} (not {n}))"),
            (Some(p), None) => p,
            (None, Some(n)) => format!("(not {n})"),
            (None, None) => "()".to_string(),
        }
    };

    let body = if set.flags.contains(crate::policydb::SetFlags::COMP) {
        format!("(not {core})")
    } else {
        core
    };

    let set_kw = if is_type {
        "typeattributeset"
    } else {
        "roleattributeset"
    };
    emitter.line(ctx.indent, &format!("({set_kw} {name} {body})"))?;

    Ok(vec![name])
}

/// `RoleSet` goes through the identical routine, distinguished only by the
/// `is_type = false` tag.
pub fn expand_role_set<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    set: &RoleSet,
) -> Result<Vec<String>, TranslateError> {
    expand_set(ctx, resolver, emitter, set, false)
}

#[must_use]
pub fn symbol_kind_for_type_flag(is_type: bool) -> SymbolKind {
    if is_type {
        SymbolKind::Type
    } else {
        SymbolKind::Role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policydb::{PolicyDatabase, SetFlags, TypeDatum, TypeIndex};

    fn db_with_types(names: &[&str]) -> PolicyDatabase {
        let mut db = PolicyDatabase::new();
        for name in names {
            db.types.push(*name, TypeDatum::default());
        }
        db
    }

    #[test]
    fn plain_set_expands_without_synthesis() {
        let db = db_with_types(&["alpha", "beta"]);
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut set = TypeSet::new();
        set.positive.set(0);
        set.positive.set(1);

        let names = expand_set(&mut ctx, &resolver, &mut emitter, &set, true).unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn star_and_comp_synthesize_not_all() {
        let db = db_with_types(&["alpha"]);
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut set = TypeSet::new();
        set.flags = SetFlags::STAR | SetFlags::COMP;

        let names = expand_set(&mut ctx, &resolver, &mut emitter, &set, true).unwrap();
        assert_eq!(names, vec!["base_typeattr_1".to_string()]);

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(typeattribute base_typeattr_1)"));
        assert!(out.contains("(typeattributeset base_typeattr_1 (not (all)))"));
    }

    #[test]
    fn negative_bitmap_only_meaningful_for_types() {
        let db = db_with_types(&["alpha", "beta"]);
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut set = TypeSet::new();
        set.positive.set(0);
        set.negative.set(1);
        let _ = TypeIndex(1);

        expand_set(&mut ctx, &resolver, &mut emitter, &set, true).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(and (alpha) (not (beta)))"));
    }
}
