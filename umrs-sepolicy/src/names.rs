//! Fixed name tables, literal defaults, and module-name sanitization.
//!
//! These are the constants the lowering engine treats as given rather than
//! derived — the initial-sid name tables are positional (indexed by the
//! sid's numeric id), not derived from any symbol table the decoder hands
//! us, since initial sids exist before any user-space label does.

use crate::policydb::Platform;

pub const DEFAULT_LEVEL: &str = "systemlow";
pub const DEFAULT_OBJECT: &str = "object_r";

pub const SELINUX_INITIAL_SIDS: &[&str] = &[
    "null",
    "kernel",
    "security",
    "unlabeled",
    "fs",
    "file",
    "file_labels",
    "init",
    "any_socket",
    "port",
    "netif",
    "netmsg",
    "node",
    "igmp_packet",
    "icmp_socket",
    "tcp_socket",
    "sysctl_modprobe",
    "sysctl",
    "sysctl_fs",
    "sysctl_kernel",
    "sysctl_net",
    "sysctl_net_unix",
    "sysctl_vm",
    "sysctl_dev",
    "kmod",
    "policy",
    "scmp_packet",
    "devnull",
];

pub const XEN_INITIAL_SIDS: &[&str] = &[
    "null", "xen", "dom0", "domio", "domxen", "unlabeled", "security", "ioport", "iomem", "irq",
    "device",
];

/// Looks up the fixed initial-sid name for a platform and numeric id.
#[must_use]
pub fn initial_sid_name(platform: Platform, id: u32) -> Option<&'static str> {
    let table = match platform {
        Platform::Selinux => SELINUX_INITIAL_SIDS,
        Platform::Xen => XEN_INITIAL_SIDS,
    };
    table.get(id as usize).copied()
}

/// Renames a module to `base` (null/empty decoded name) and rewrites every
/// non-alphanumeric character to `_`, matching what the prefix of every
/// synthesized attribute and optional-block name must look like.
#[must_use]
pub fn sanitize_module_name(raw: &str) -> String {
    if raw.is_empty() {
        return "base".to_string();
    }
    raw.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_becomes_base() {
        assert_eq!(sanitize_module_name(""), "base");
    }

    #[test]
    fn non_alphanumeric_becomes_underscore() {
        assert_eq!(sanitize_module_name("my-module v2"), "my_module_v2");
    }

    #[test]
    fn selinux_sid_table_has_28_entries_in_order() {
        assert_eq!(SELINUX_INITIAL_SIDS.len(), 28);
        assert_eq!(initial_sid_name(Platform::Selinux, 0), Some("null"));
        assert_eq!(initial_sid_name(Platform::Selinux, 27), Some("devnull"));
    }

    #[test]
    fn xen_sid_table_has_11_entries_in_order() {
        assert_eq!(XEN_INITIAL_SIDS.len(), 11);
        assert_eq!(initial_sid_name(Platform::Xen, 0), Some("null"));
        assert_eq!(initial_sid_name(Platform::Xen, 10), Some("device"));
    }
}
