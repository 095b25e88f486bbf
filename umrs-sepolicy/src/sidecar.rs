//! Text Side-Car Lowerers (§4.10): the four embedded text blobs attached
//! to a module package, line-oriented and independent of the decoded
//! symbol tables — every name inside them is already a literal string,
//! not an index needing resolution.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::names::DEFAULT_LEVEL;
use crate::setexpand::LowerCtx;

fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn file_mode_keyword(token: &str) -> Result<&'static str, TranslateError> {
    match token {
        "--" => Ok("file"),
        "-d" => Ok("dir"),
        "-c" => Ok("char"),
        "-b" => Ok("block"),
        "-s" => Ok("socket"),
        "-p" => Ok("pipe"),
        "-l" => Ok("symlink"),
        other => Err(TranslateError::InvalidSideCarLine {
            kind: "file_contexts",
            line: format!("unknown mode token {other:?}"),
        }),
    }
}

/// Renders one `sens[:cats]` level, passed through verbatim since the
/// side-car's category-list text already matches the target language's
/// comma/`lo.hi` atom syntax.
fn render_level_text(level: &str) -> String {
    level.to_string()
}

fn render_range_nested(range: Option<&str>) -> (String, String) {
    match range {
        None => (DEFAULT_LEVEL.to_string(), DEFAULT_LEVEL.to_string()),
        Some(r) => match r.split_once('-') {
            Some((low, high)) => (render_level_text(low), render_level_text(high)),
            None => (render_level_text(r), render_level_text(r)),
        },
    }
}

/// `<regex> [<mode>] <context>`. Context `<<none>>` yields an empty
/// `()`; otherwise `u:r:t[:mls-range]`.
pub fn lower_file_contexts<W: Write>(
    ctx: &LowerCtx<'_>,
    emitter: &mut Emitter<W>,
    text: &str,
) -> Result<(), TranslateError> {
    for line in significant_lines(text) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (regex, mode_kw, context) = match tokens.as_slice() {
            [regex, context] => (*regex, "any", *context),
            [regex, mode, context] => (*regex, file_mode_keyword(mode)?, *context),
            _ => {
                return Err(TranslateError::InvalidSideCarLine {
                    kind: "file_contexts",
                    line: line.to_string(),
                })
            }
        };

        let rendered_context = if context == "<<none>>" {
            "()".to_string()
        } else {
            let mut parts = context.splitn(4, ':');
            let user = parts.next();
            let role = parts.next();
            let type_ = parts.next();
            let (Some(user), Some(role), Some(type_)) = (user, role, type_) else {
                return Err(TranslateError::InvalidSideCarLine {
                    kind: "file_contexts",
                    line: line.to_string(),
                });
            };
            let (low, high) = render_range_nested(parts.next());
            format!("({user} {role} {type_} (({low})({high})))")
        };

        emitter.line(ctx.indent, &format!("(filecon \"{regex}\" \"\" {mode_kw} {rendered_context})"))?;
    }

    Ok(())
}

/// `<linux-user>:<selinux-user>[:<mls-range>]`.
pub fn lower_seusers<W: Write>(
    ctx: &LowerCtx<'_>,
    emitter: &mut Emitter<W>,
    text: &str,
) -> Result<(), TranslateError> {
    for line in significant_lines(text) {
        let mut parts = line.splitn(3, ':');
        let linux_user = parts.next();
        let seuser = parts.next();
        let (Some(linux_user), Some(seuser)) = (linux_user, seuser) else {
            return Err(TranslateError::InvalidSideCarLine { kind: "seusers", line: line.to_string() });
        };
        let (low, high) = match parts.next() {
            None => (DEFAULT_LEVEL.to_string(), DEFAULT_LEVEL.to_string()),
            Some(r) => match r.split_once('-') {
                Some((l, h)) => (l.to_string(), h.to_string()),
                None => (r.to_string(), r.to_string()),
            },
        };

        if linux_user == "__default__" {
            emitter.line(ctx.indent, &format!("(selinuxuserdefault {seuser} ({low} {high}))"))?;
        } else {
            emitter.line(ctx.indent, &format!("(selinuxuser {linux_user} {seuser} ({low} {high}))"))?;
        }
    }

    Ok(())
}

/// `user <name> prefix <p>;`.
pub fn lower_user_extra<W: Write>(
    ctx: &LowerCtx<'_>,
    emitter: &mut Emitter<W>,
    text: &str,
) -> Result<(), TranslateError> {
    for line in significant_lines(text) {
        let trimmed = line.strip_suffix(';').unwrap_or(line);
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let ["user", name, "prefix", prefix] = tokens.as_slice() else {
            return Err(TranslateError::InvalidSideCarLine { kind: "user_extra", line: line.to_string() });
        };
        emitter.line(ctx.indent, &format!("(userprefix {name} {prefix})"))?;
    }

    Ok(())
}

/// A non-empty blob is unsupported; warn and drop it entirely.
pub fn lower_netfilter_contexts(text: &str) {
    if !text.trim().is_empty() {
        log::warn!("netfilter_contexts is unsupported; dropping non-empty blob");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_file_contexts(&ctx, &mut emitter, "\n# comment\n   \n").unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn file_contexts_single_level_collapses_to_nested_pair() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_file_contexts(&ctx, &mut emitter, "/bin(/.*)? -- system_u:object_r:bin_t:s0\n").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(filecon \"/bin(/.*)?\" \"\" file (system_u object_r bin_t ((s0)(s0))))\n");
    }

    #[test]
    fn file_contexts_none_context_emits_empty_group() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_file_contexts(&ctx, &mut emitter, "/proc <<none>>\n").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(filecon \"/proc\" \"\" any ())\n");
    }

    #[test]
    fn seusers_default_marker_emits_selinuxuserdefault() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_seusers(&ctx, &mut emitter, "__default__:user_u\n").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(selinuxuserdefault user_u (systemlow systemlow))\n");
    }

    #[test]
    fn user_extra_prefix_line_parses() {
        let ctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);
        lower_user_extra(&ctx, &mut emitter, "user staff_u prefix staff;\n").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "(userprefix staff_u staff)\n");
    }
}
