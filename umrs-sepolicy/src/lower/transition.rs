//! Transition Lowerers (§4.7): role, range, and filename transitions.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::policydb::{Bitmap, FilenameTransition, RangeTransition, RoleTransition};
use crate::resolve::{render_semantic_level, NameResolver};
use crate::setexpand::LowerCtx;

fn resolved_bitmap_names<'r>(
    resolver: &NameResolver<'r>,
    bitmap: &Bitmap,
    lookup: impl Fn(&NameResolver<'r>, u32) -> Option<&'r str>,
) -> Result<Vec<&'r str>, TranslateError> {
    bitmap
        .iter()
        .map(|bit| {
            lookup(resolver, bit)
                .ok_or_else(|| TranslateError::Structural("unresolved index in transition bitmap".into()))
        })
        .collect()
}

/// `(roletransition <role> <type> <class> <new-role>)` for each
/// (role × type) pair crossed with each class bit.
pub fn lower_role_transition<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    transition: &RoleTransition,
) -> Result<(), TranslateError> {
    let roles = resolved_bitmap_names(resolver, &transition.roles, |r, bit| {
        r.role_name(crate::policydb::RoleIndex(bit))
    })?;
    let types = resolved_bitmap_names(resolver, &transition.types, |r, bit| {
        r.type_name(crate::policydb::TypeIndex(bit))
    })?;
    let classes = resolved_bitmap_names(resolver, &transition.classes, |r, bit| {
        r.class_name(crate::policydb::ClassIndex(bit))
    })?;
    let new_role = resolver
        .role_name(transition.new_role)
        .ok_or_else(|| TranslateError::Structural("unresolved new-role in role transition".into()))?;

    for role in &roles {
        for ty in &types {
            for class in &classes {
                emitter.line(
                    ctx.indent,
                    &format!("(roletransition {role} {ty} {class} {new_role})"),
                )?;
            }
        }
    }

    Ok(())
}

/// `(rangetransition <s> <t> <class> (<low> <high>))`, only meaningful
/// under MLS; the caller is responsible for skipping this when MLS is off.
pub fn lower_range_transition<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    transition: &RangeTransition,
) -> Result<(), TranslateError> {
    let stypes = resolved_bitmap_names(resolver, &transition.source_types, |r, bit| {
        r.type_name(crate::policydb::TypeIndex(bit))
    })?;
    let ttypes = resolved_bitmap_names(resolver, &transition.target_types, |r, bit| {
        r.type_name(crate::policydb::TypeIndex(bit))
    })?;
    let tclasses = resolved_bitmap_names(resolver, &transition.classes, |r, bit| {
        r.class_name(crate::policydb::ClassIndex(bit))
    })?;

    let (low, high) = &transition.range;
    let low_name = render_semantic_level(resolver, low, true)
        .ok_or_else(|| TranslateError::Structural("unresolved low level in range transition".into()))?;
    let high_name = render_semantic_level(resolver, high, true)
        .ok_or_else(|| TranslateError::Structural("unresolved high level in range transition".into()))?;

    for s in &stypes {
        for t in &ttypes {
            for class in &tclasses {
                emitter.line(
                    ctx.indent,
                    &format!("(rangetransition {s} {t} {class} ({low_name} {high_name}))"),
                )?;
            }
        }
    }

    Ok(())
}

/// `(typetransition <s> <t> <class> "<filename>" <new-type>)` for each
/// (source-type × target-type) pair.
pub fn lower_filename_transition<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    transition: &FilenameTransition,
) -> Result<(), TranslateError> {
    let stypes = resolved_bitmap_names(resolver, &transition.source_types, |r, bit| {
        r.type_name(crate::policydb::TypeIndex(bit))
    })?;
    let ttypes = resolved_bitmap_names(resolver, &transition.target_types, |r, bit| {
        r.type_name(crate::policydb::TypeIndex(bit))
    })?;
    let class_name = resolver
        .class_name(transition.class)
        .ok_or_else(|| TranslateError::Structural("unresolved class in filename transition".into()))?;
    let new_type_name = resolver
        .type_name(transition.new_type)
        .ok_or_else(|| TranslateError::Structural("unresolved new-type in filename transition".into()))?;

    for s in &stypes {
        for t in &ttypes {
            emitter.line(
                ctx.indent,
                &format!("(typetransition {s} {t} {class_name} \"{}\" {new_type_name})", transition.filename),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policydb::*;

    #[test]
    fn role_transition_covers_full_cross_product() {
        let mut db = PolicyDatabase::new();
        db.roles.push("r1", RoleDatum::default());
        let new_role = db.roles.push("r2", RoleDatum::default());
        let t1 = db.types.push("t1", TypeDatum::default());
        let t2 = db.types.push("t2", TypeDatum::default());
        db.classes.push("process", ClassDatum::default());
        db.classes.push("file", ClassDatum::default());
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut roles = Bitmap::new();
        roles.set(0);
        let mut types = Bitmap::new();
        types.set(t1);
        types.set(t2);
        let mut classes = Bitmap::new();
        classes.set(0);
        classes.set(1);

        let transition = RoleTransition { roles, types, classes, new_role: RoleIndex(new_role) };
        lower_role_transition(&ctx, &resolver, &mut emitter, &transition).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("(roletransition r1 t1 process r2)"));
        assert!(out.contains("(roletransition r1 t2 file r2)"));
    }

    #[test]
    fn filename_transition_quotes_the_filename() {
        let mut db = PolicyDatabase::new();
        let s1 = db.types.push("s1", TypeDatum::default());
        let t1 = db.types.push("t1", TypeDatum::default());
        let derived = db.types.push("derived_t", TypeDatum::default());
        let process_class = db.classes.push("process", ClassDatum::default());
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut source_types = Bitmap::new();
        source_types.set(s1);
        let mut target_types = Bitmap::new();
        target_types.set(t1);

        let transition = FilenameTransition {
            source_types,
            target_types,
            class: ClassIndex(process_class),
            filename: "passwd".to_string(),
            new_type: TypeIndex(derived),
        };

        lower_filename_transition(&ctx, &resolver, &mut emitter, &transition).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(typetransition s1 t1 process \"passwd\" derived_t)\n");
    }

    #[test]
    fn range_transition_renders_offset_one_levels() {
        let mut db = PolicyDatabase::new();
        let s1 = db.types.push("s1", TypeDatum::default());
        let t1 = db.types.push("t1", TypeDatum::default());
        db.classes.push("process", ClassDatum::default());
        db.sensitivities.push("s0", SensDatum::default());
        let resolver = NameResolver::new(&db);
        let ctx = LowerCtx::new("base", true);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut source_types = Bitmap::new();
        source_types.set(s1);
        let mut target_types = Bitmap::new();
        target_types.set(t1);
        let mut classes = Bitmap::new();
        classes.set(0);

        let level = SemanticMlsLevel { sensitivity: SensIndex(1), categories: Vec::new() };
        let transition = RangeTransition {
            source_types,
            target_types,
            classes,
            range: (level.clone(), level),
        };

        lower_range_transition(&ctx, &resolver, &mut emitter, &transition).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(rangetransition s1 t1 process (s0 s0))\n");
    }
}
