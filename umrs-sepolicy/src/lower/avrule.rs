//! AV-Rule Lowerer (§4.4): allow/auditallow/auditdeny/dontaudit/
//! neverallow/type_transition/type_member/type_change.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::policydb::{AvRule, AvRuleKind, RulePayload};
use crate::resolve::{join_names, NameResolver, PermissionDecoder};
use crate::setexpand::{expand_set, LowerCtx};

pub fn lower_avrule<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &impl PermissionDecoder,
    emitter: &mut Emitter<W>,
    rule: &AvRule,
) -> Result<(), TranslateError> {
    let src_names = expand_set(ctx, resolver, emitter, &rule.source, true)?;
    let tgt_names = expand_set(ctx, resolver, emitter, &rule.target, true)?;

    for node in &rule.nodes {
        let class_name = resolver
            .class_name(node.class())
            .ok_or_else(|| TranslateError::Structural("unresolved class index in av-rule".into()))?
            .to_string();

        for src in &src_names {
            for tgt in &tgt_names {
                emit_one(ctx, resolver, emitter, rule.kind, db, node, src, tgt, &class_name)?;
            }
            if rule.self_flag {
                emit_one(ctx, resolver, emitter, rule.kind, db, node, src, "self", &class_name)?;
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn emit_one<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    kind: AvRuleKind,
    db: &impl PermissionDecoder,
    node: &RulePayload,
    src: &str,
    tgt: &str,
    class_name: &str,
) -> Result<(), TranslateError> {
    let keyword = kind.keyword();

    match node {
        RulePayload::AccessVector { class, perms } => {
            if !kind.is_access_vector() {
                return Err(TranslateError::Structural(format!(
                    "access-vector payload on non-access-vector rule kind {keyword}"
                )));
            }
            let perm_names = join_names(db.permission_names(*class, *perms));
            emitter.line(
                ctx.indent,
                &format!("({keyword} {src} {tgt} ({class_name} ({perm_names})))"),
            )
        }
        RulePayload::NewType { new_type, .. } => {
            if kind.is_access_vector() {
                return Err(TranslateError::Structural(format!(
                    "new-type payload on access-vector rule kind {keyword}"
                )));
            }
            let new_type_name = resolver.type_name(*new_type).ok_or_else(|| {
                TranslateError::Structural("unresolved new-type index in av-rule".into())
            })?;
            emitter.line(
                ctx.indent,
                &format!("({keyword} {src} {tgt} {class_name} {new_type_name})"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policydb::*;

    struct StubPerms;
    impl PermissionDecoder for StubPerms {
        fn permission_names(&self, _class: ClassIndex, _bits: PermissionBits) -> Vec<String> {
            vec!["read".to_string()]
        }
    }

    #[test]
    fn cross_product_coverage_with_self_flag() {
        let mut db = PolicyDatabase::new();
        let file_class = db.classes.push("file", ClassDatum::default());
        let s1 = db.types.push("s1", TypeDatum::default());
        let s2 = db.types.push("s2", TypeDatum::default());
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut source = TypeSet::new();
        source.positive.set(s1);
        source.positive.set(s2);

        let rule = AvRule {
            kind: AvRuleKind::Allow,
            source,
            target: TypeSet::new(),
            self_flag: true,
            nodes: vec![RulePayload::AccessVector {
                class: ClassIndex(file_class),
                perms: PermissionBits(1),
            }],
        };

        lower_avrule(&mut ctx, &resolver, &StubPerms, &mut emitter, &rule).unwrap();
        let out = String::from_utf8(buf).unwrap();
        // n=2, m=0, c=1, self=true => n*(m+1)*c = 2 lines
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("(allow s1 self (file (read)))"));
        assert!(out.contains("(allow s2 self (file (read)))"));
    }

    #[test]
    fn type_transition_emits_resolved_new_type_name() {
        let mut db = PolicyDatabase::new();
        let process_class = db.classes.push("process", ClassDatum::default());
        let src = db.types.push("src_t", TypeDatum::default());
        let tgt = db.types.push("tgt_t", TypeDatum::default());
        let derived = db.types.push("derived_t", TypeDatum::default());
        let resolver = NameResolver::new(&db);
        let mut ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        let mut source = TypeSet::new();
        source.positive.set(src);
        let mut target = TypeSet::new();
        target.positive.set(tgt);

        let rule = AvRule {
            kind: AvRuleKind::Transition,
            source,
            target,
            self_flag: false,
            nodes: vec![RulePayload::NewType {
                class: ClassIndex(process_class),
                new_type: TypeIndex(derived),
            }],
        };

        lower_avrule(&mut ctx, &resolver, &StubPerms, &mut emitter, &rule).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(typetransition src_t tgt_t process derived_t)\n");
    }
}
