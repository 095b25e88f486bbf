//! Conditional Lowerer (§4.5): `tunableif`/`booleanif` blocks gating a
//! true- and false-branch rule list.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::policydb::{AvRule, CondAtom, CondFlags, CondNode};
use crate::resolve::{NameResolver, PermissionDecoder};
use crate::setexpand::LowerCtx;

use super::avrule::lower_avrule;

/// Walks the postfix atom list with an operand stack of owned strings, then
/// emits the `(tunableif|booleanif E (true ...) (false ...))` block.
pub fn lower_cond<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &impl PermissionDecoder,
    emitter: &mut Emitter<W>,
    node: &CondNode,
) -> Result<(), TranslateError> {
    let expr = eval_postfix(resolver, &node.postfix)?;

    let kind = if node.flags.contains(CondFlags::TUNABLE) {
        "tunableif"
    } else {
        "booleanif"
    };

    emitter.line(ctx.indent, &format!("({kind} {expr}"))?;
    ctx.indent += 1;

    lower_branch(ctx, resolver, db, emitter, "true", &node.true_rules)?;
    lower_branch(ctx, resolver, db, emitter, "false", &node.false_rules)?;

    ctx.indent -= 1;
    emitter.line(ctx.indent, ")")
}

fn lower_branch<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &impl PermissionDecoder,
    emitter: &mut Emitter<W>,
    branch_kw: &str,
    rules: &[AvRule],
) -> Result<(), TranslateError> {
    if rules.is_empty() {
        return Ok(());
    }

    emitter.line(ctx.indent, &format!("({branch_kw}"))?;
    ctx.indent += 1;
    for rule in rules {
        lower_avrule(ctx, resolver, db, emitter, rule)?;
    }
    ctx.indent -= 1;
    emitter.line(ctx.indent, ")")
}

/// Evaluates the postfix boolean-expression atoms into a single
/// fully-parenthesized string. Exactly one entry must remain on the stack
/// after traversal; any other count is a structural error.
fn eval_postfix(resolver: &NameResolver<'_>, postfix: &[CondAtom]) -> Result<String, TranslateError> {
    let mut stack: Vec<String> = Vec::new();

    for atom in postfix {
        match atom {
            CondAtom::Bool(idx) => {
                let name = resolver
                    .bool_name(*idx)
                    .ok_or_else(|| TranslateError::Structural("unresolved boolean index in conditional".into()))?;
                stack.push(format!("({name})"));
            }
            CondAtom::Op(op) => {
                if op.is_unary() {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("conditional operand stack underflow".into()))?;
                    stack.push(format!("({} {operand})", op.keyword()));
                } else {
                    let rhs = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("conditional operand stack underflow".into()))?;
                    let lhs = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("conditional operand stack underflow".into()))?;
                    stack.push(format!("({} {lhs} {rhs})", op.keyword()));
                }
            }
        }
    }

    if stack.len() != 1 {
        return Err(TranslateError::Structural(format!(
            "conditional expression left {} entries on the stack, expected 1",
            stack.len()
        )));
    }

    Ok(stack.pop().unwrap())
}
