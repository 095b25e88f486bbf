//! Object-Context Lowerer (§4.9): initial sids, network/Xen endpoint
//! labels, fsuse, and genfs — dispatched on the policy's target platform.

use std::io::Write;

use crate::emit::Emitter;
use crate::error::TranslateError;
use crate::names::initial_sid_name;
use crate::policydb::{OContext, Platform, PolicyDatabase};
use crate::resolve::{render_context, NameResolver};
use crate::setexpand::LowerCtx;

fn ipv4_dotted(bytes: [u8; 4]) -> String {
    bytes.iter().map(u8::to_string).collect::<Vec<_>>().join(".")
}

fn ipv6_colon_hex(groups: [u16; 8]) -> String {
    groups.iter().map(|g| format!("{g:x}")).collect::<Vec<_>>().join(":")
}

fn lower_initial_sids<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    let mut names = Vec::with_capacity(db.initial_sids.len());

    for entry in &db.initial_sids {
        let OContext::InitialSid { id, context } = entry else {
            return Err(TranslateError::Structural("non-initial-sid entry in initial_sids list".into()));
        };
        let name = initial_sid_name(db.platform, *id)
            .ok_or_else(|| TranslateError::Structural(format!("unknown initial sid id {id}")))?;
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(sid {name})"))?;
        emitter.line(ctx.indent, &format!("(sidcontext {name} {rendered})"))?;
        names.push(name);
    }

    names.reverse();
    emitter.line(ctx.indent, &format!("(sidorder ({}))", names.join(" ")))
}

fn lower_ports<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.ports {
        let OContext::Port { protocol, low, high, context } = entry else {
            return Err(TranslateError::Structural("non-port entry in ports list".into()));
        };
        let port = if low == high { low.to_string() } else { format!("({low} {high})") };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(portcon {} {port} {rendered})", protocol.keyword()))?;
    }
    Ok(())
}

fn lower_netifs<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.netifs {
        let OContext::Netif { name, if_context, msg_context } = entry else {
            return Err(TranslateError::Structural("non-netif entry in netifs list".into()));
        };
        let if_rendered = render_context(resolver, if_context, db.mls_enabled)?;
        let msg_rendered = render_context(resolver, msg_context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(netifcon {name} {if_rendered} {msg_rendered})"))?;
    }
    Ok(())
}

fn lower_nodes_v4<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.nodes_v4 {
        let OContext::NodeV4 { addr, mask, context } = entry else {
            return Err(TranslateError::Structural("non-node-v4 entry in nodes_v4 list".into()));
        };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(
            ctx.indent,
            &format!("(nodecon {} {} {rendered})", ipv4_dotted(*addr), ipv4_dotted(*mask)),
        )?;
    }
    Ok(())
}

fn lower_nodes_v6<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.nodes_v6 {
        let OContext::NodeV6 { addr, mask, context } = entry else {
            return Err(TranslateError::Structural("non-node-v6 entry in nodes_v6 list".into()));
        };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(
            ctx.indent,
            &format!("(nodecon {} {} {rendered})", ipv6_colon_hex(*addr), ipv6_colon_hex(*mask)),
        )?;
    }
    Ok(())
}

fn lower_fs_uses<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.fs_uses {
        let OContext::FsUse { behavior, fstype, context } = entry else {
            return Err(TranslateError::Structural("non-fsuse entry in fs_uses list".into()));
        };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(fsuse {} {fstype} {rendered})", behavior.keyword()))?;
    }
    Ok(())
}

fn lower_genfs<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.genfs {
        let rendered = render_context(resolver, &entry.context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(genfscon {} {} {rendered})", entry.fstype, entry.path))?;
    }
    Ok(())
}

fn lower_xen_pirqs<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.xen_pirqs {
        let OContext::XenPirq { pirq, context } = entry else {
            return Err(TranslateError::Structural("non-pirq entry in xen_pirqs list".into()));
        };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(pirqcon {pirq} {rendered})"))?;
    }
    Ok(())
}

fn lower_xen_ioports<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.xen_ioports {
        let OContext::XenIoport { low, high, context } = entry else {
            return Err(TranslateError::Structural("non-ioport entry in xen_ioports list".into()));
        };
        let range = if low == high { low.to_string() } else { format!("({low} {high})") };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(ioportcon {range} {rendered})"))?;
    }
    Ok(())
}

fn lower_xen_iomems<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.xen_iomems {
        let OContext::XenIomem { low, high, context } = entry else {
            return Err(TranslateError::Structural("non-iomem entry in xen_iomems list".into()));
        };
        let range = if low == high { format!("0x{low:X}") } else { format!("(0x{low:X} 0x{high:X})") };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(iomemcon {range} {rendered})"))?;
    }
    Ok(())
}

fn lower_xen_pcidevs<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    for entry in &db.xen_pcidevs {
        let OContext::XenPcidev { device, context } = entry else {
            return Err(TranslateError::Structural("non-pcidev entry in xen_pcidevs list".into()));
        };
        let rendered = render_context(resolver, context, db.mls_enabled)?;
        emitter.line(ctx.indent, &format!("(pcidevicecon 0x{device:x} {rendered})"))?;
    }
    Ok(())
}

/// Dispatches the seven SELinux slots or the five Xen slots, in the fixed
/// order §4.9 specifies, plus genfs (which both platforms carry).
pub fn lower_object_contexts<W: Write>(
    ctx: &LowerCtx<'_>,
    resolver: &NameResolver<'_>,
    db: &PolicyDatabase,
    emitter: &mut Emitter<W>,
) -> Result<(), TranslateError> {
    lower_initial_sids(ctx, resolver, db, emitter)?;

    match db.platform {
        Platform::Selinux => {
            if db.filesystems_present {
                log::warn!("SELinux fscon contexts are unsupported; dropping");
            }
            lower_ports(ctx, resolver, db, emitter)?;
            lower_netifs(ctx, resolver, db, emitter)?;
            lower_nodes_v4(ctx, resolver, db, emitter)?;
            lower_fs_uses(ctx, resolver, db, emitter)?;
            lower_nodes_v6(ctx, resolver, db, emitter)?;
        }
        Platform::Xen => {
            lower_xen_pirqs(ctx, resolver, db, emitter)?;
            lower_xen_ioports(ctx, resolver, db, emitter)?;
            lower_xen_iomems(ctx, resolver, db, emitter)?;
            lower_xen_pcidevs(ctx, resolver, db, emitter)?;
        }
    }

    lower_genfs(ctx, resolver, db, emitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policydb::*;

    fn stub_context(db: &mut PolicyDatabase) -> RawSecurityContext {
        let user = db.users.push(
            "system_u",
            UserDatum { roles: Bitmap::new(), level: SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() }, range: (SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() }, SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() }) },
        );
        let role = db.roles.push("object_r", RoleDatum::default());
        let type_ = db.types.push("node_t", TypeDatum::default());
        RawSecurityContext {
            user: UserIndex(user + 1),
            role: RoleIndex(role + 1),
            type_: TypeIndex(type_ + 1),
            range: (
                SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() },
                SemanticMlsLevel { sensitivity: SensIndex(0), categories: Vec::new() },
            ),
        }
    }

    #[test]
    fn sidorder_lists_names_in_reverse_arrival_order() {
        let mut db = PolicyDatabase::new();
        let ctx1 = stub_context(&mut db);
        let ctx2 = stub_context(&mut db);
        db.initial_sids.push(OContext::InitialSid { id: 1, context: ctx1 });
        db.initial_sids.push(OContext::InitialSid { id: 2, context: ctx2 });
        let resolver = NameResolver::new(&db);
        let lctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        lower_initial_sids(&lctx, &resolver, &db, &mut emitter).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(sid kernel)"));
        assert!(out.contains("(sid security)"));
        assert!(out.contains("(sidorder (security kernel))"));
    }

    #[test]
    fn port_renders_single_value_when_low_equals_high() {
        let mut db = PolicyDatabase::new();
        let port_ctx = stub_context(&mut db);
        db.ports.push(OContext::Port { protocol: PortProtocol::Tcp, low: 80, high: 80, context: port_ctx });
        let resolver = NameResolver::new(&db);
        let lctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        lower_ports(&lctx, &resolver, &db, &mut emitter).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(portcon tcp 80"));
    }

    #[test]
    fn iomem_range_renders_hex_with_prefix() {
        let mut db = PolicyDatabase::new();
        let iomem_ctx = stub_context(&mut db);
        db.xen_iomems.push(OContext::XenIomem { low: 0xabcd, high: 0xbeef, context: iomem_ctx });
        let resolver = NameResolver::new(&db);
        let lctx = LowerCtx::new("base", false);
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf);

        lower_xen_iomems(&lctx, &resolver, &db, &mut emitter).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("(iomemcon (0xABCD 0xBEEF)"));
    }
}
