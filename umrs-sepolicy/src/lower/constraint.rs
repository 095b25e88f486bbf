//! Constraint Lowerer (§4.6): the richer postfix vocabulary used by
//! `constrain`/`validatetrans`, wrapped per-class in `[mls]constrain` or
//! `[mls]validatetrans`.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::policydb::{
    AttrCode, ConstraintAtom, ConstraintExpr, ConstraintNames, ConstraintOp, RoleIndex, UserIndex,
};
use crate::resolve::{join_names, NameResolver, PermissionDecoder};
use crate::setexpand::{expand_set, LowerCtx};

/// Lowers one class's `constrain` entries: `([mls]constrain (C (<perms>)) E)`.
pub fn lower_class_constraint<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &impl PermissionDecoder,
    emitter: &mut Emitter<W>,
    class_name: &str,
    class: crate::policydb::ClassIndex,
    constraint: &crate::policydb::ClassConstraint,
) -> Result<(), TranslateError> {
    let perm_names = join_names(db.permission_names(class, constraint.perms));
    let expr = eval_postfix(ctx, resolver, emitter, &constraint.expr)?;
    let kw = if ctx.mls_enabled { "mlsconstrain" } else { "constrain" };
    emitter.line(
        ctx.indent,
        &format!("({kw} ({class_name} ({perm_names})) {expr})"),
    )
}

/// Lowers one class's `validatetrans` entries: `([mls]validatetrans C E)`.
pub fn lower_class_validatetrans<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    class_name: &str,
    validatetrans: &crate::policydb::ClassValidateTrans,
) -> Result<(), TranslateError> {
    let expr = eval_postfix(ctx, resolver, emitter, &validatetrans.expr)?;
    let kw = if ctx.mls_enabled { "mlsvalidatetrans" } else { "validatetrans" };
    emitter.line(ctx.indent, &format!("({kw} {class_name} {expr})"))
}

/// Same stack algorithm as the conditional lowerer, generalized to the
/// constraint atom vocabulary. `Names` leaves resolve through the Set
/// Expander when the attr carries the TYPE bit, else directly off the
/// role/user bitmap (chosen by whether the attr is in the R or U family).
fn eval_postfix<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    expr: &ConstraintExpr,
) -> Result<String, TranslateError> {
    let mut stack: Vec<String> = Vec::new();

    for atom in &expr.postfix {
        match atom {
            ConstraintAtom::Attr { op, attr1, attr2 } => {
                stack.push(format!("({} {} {})", op.keyword(), attr1.as_str(), attr2.as_str()));
            }
            ConstraintAtom::Names { op, attr, names } => {
                stack.push(lower_names_atom(ctx, resolver, emitter, *op, *attr, names)?);
            }
            ConstraintAtom::Combinator(comb) => {
                if comb.is_unary() {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("constraint operand stack underflow".into()))?;
                    stack.push(format!("({} {operand})", comb.keyword()));
                } else {
                    let rhs = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("constraint operand stack underflow".into()))?;
                    let lhs = stack
                        .pop()
                        .ok_or_else(|| TranslateError::Structural("constraint operand stack underflow".into()))?;
                    stack.push(format!("({} {lhs} {rhs})", comb.keyword()));
                }
            }
        }
    }

    if stack.len() != 1 {
        return Err(TranslateError::Structural(format!(
            "constraint expression left {} entries on the stack, expected 1",
            stack.len()
        )));
    }

    Ok(stack.pop().unwrap())
}

fn lower_names_atom<W: Write>(
    ctx: &mut LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    emitter: &mut Emitter<W>,
    op: ConstraintOp,
    attr: AttrCode,
    names: &ConstraintNames,
) -> Result<String, TranslateError> {
    let name_list = match names {
        ConstraintNames::Type(set) => {
            if !attr.is_type() {
                return Err(TranslateError::Structural(
                    "NAMES atom carries a TypeSet but attr lacks the TYPE bit".into(),
                ));
            }
            join_names(expand_set(ctx, resolver, emitter, set, true)?)
        }
        ConstraintNames::Plain(bitmap) => {
            let resolved: Vec<&str> = bitmap
                .iter()
                .filter_map(|bit| {
                    if matches!(attr, AttrCode::U1 | AttrCode::U2 | AttrCode::U3) {
                        resolver.user_name(UserIndex(bit))
                    } else {
                        resolver.role_name(RoleIndex(bit))
                    }
                })
                .collect();
            join_names(resolved)
        }
    };

    Ok(format!("({} {} ({name_list}))", op.keyword(), attr.as_str()))
}
