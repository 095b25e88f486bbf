//! The external collaborator boundary: parsing a binary policy package
//! into a [`PolicyDatabase`] is explicitly out of scope for this crate.
//! This module defines the trait contract the core depends on and, under
//! `fixture`, a hand-built [`DecodedPackage`] used by the scenario tests.

use std::fs::File;
use std::io::Read;

use crate::error::TranslateError;
use crate::policydb::PolicyDatabase;

/// Either a seekable file handle or an already-slurped in-memory buffer —
/// the CLI wrapper resolves a pipe/socket into the latter before handing
/// it to the decoder (§6: growable-buffer slurp for non-seekable sources).
pub enum PolicySource {
    File(File),
    Buffer(Vec<u8>),
}

impl PolicySource {
    /// Reads the entire source into memory. A read error is fatal.
    pub fn into_bytes(self) -> Result<Vec<u8>, TranslateError> {
        match self {
            Self::Buffer(bytes) => Ok(bytes),
            Self::File(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

/// The four text side-cars embedded in a policy package, alongside the
/// decoded database.
pub struct DecodedPackage {
    pub database: PolicyDatabase,
    pub file_contexts: String,
    pub seusers: String,
    pub user_extra: String,
    pub netfilter_contexts: String,
}

pub trait PolicyDecoder {
    /// # Errors
    /// Returns `TranslateError` on any I/O or structural decode failure.
    fn decode(src: PolicySource) -> Result<DecodedPackage, TranslateError>;
}

/// Stand-in `PolicyDecoder` so `pp2cil` has a concrete type to link
/// against. Binary policy package parsing is not implemented here — see
/// the module doc — a real deployment substitutes its own decoder for
/// this one.
pub struct UnimplementedDecoder;

impl PolicyDecoder for UnimplementedDecoder {
    fn decode(_src: PolicySource) -> Result<DecodedPackage, TranslateError> {
        Err(TranslateError::Structural(
            "no PolicyDecoder is linked into this build; binary policy package parsing is \
             supplied by an external component"
                .to_string(),
        ))
    }
}

/// Resolves a numeric policy-capability id to its name. Implemented
/// against a fixed table here rather than supplied by the decoder, since
/// policy capability names are a kernel-wide constant, not something a
/// particular policy module defines.
pub trait CapabilityNameLookup {
    fn capability_name(&self, id: u32) -> Option<&str>;
}

/// The fixed policy-capability name table (libsepol `polcaps.c` order).
pub struct StaticCapabilityTable;

const POLICY_CAP_NAMES: &[&str] = &[
    "network_peer_controls",
    "open_perms",
    "extended_socket_class",
    "always_check_network",
    "cgroup_seclabel",
    "nnp_nosuid_transition",
    "genfs_seclabel_symlinks",
];

impl CapabilityNameLookup for StaticCapabilityTable {
    fn capability_name(&self, id: u32) -> Option<&str> {
        POLICY_CAP_NAMES.get(id as usize).copied()
    }
}

/// Hand-built `DecodedPackage` values for the scenario suite. Each
/// function name matches the scenario it backs in `tests/scenarios.rs`.
/// Not covered by any stability guarantee — test-only by convention, kept
/// unconditionally compiled so `tests/scenarios.rs` can link against it.
pub mod fixture {

    use super::DecodedPackage;
    use crate::policydb::*;

    fn base_db(module_name: &str, mls_enabled: bool) -> PolicyDatabase {
        let mut db = PolicyDatabase::new();
        db.module_name = module_name.to_string();
        db.platform = Platform::Selinux;
        db.mls_enabled = mls_enabled;
        db.is_base = true;
        db.handle_unknown = HandleUnknown::Deny;
        db
    }

    fn empty_package(db: PolicyDatabase) -> DecodedPackage {
        DecodedPackage {
            database: db,
            file_contexts: String::new(),
            seusers: String::new(),
            user_extra: String::new(),
            netfilter_contexts: String::new(),
        }
    }

    /// Scenario 1: one type `alpha`, one AV rule
    /// `allow alpha alpha : file { read }`.
    #[must_use]
    pub fn scenario_one_type_one_rule() -> DecodedPackage {
        let mut db = base_db("base", false);

        let file_class = db.classes.push(
            "file",
            ClassDatum {
                perms: vec!["read".into()],
                ..Default::default()
            },
        );
        let alpha = db.types.push(
            "alpha",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );

        let mut decl = AvRuleDecl::default();
        decl.declared.type_.set(alpha);

        let mut source = TypeSet::new();
        source.positive.set(alpha);
        let mut target = TypeSet::new();
        target.positive.set(alpha);

        decl.avrules.push(AvRule {
            kind: AvRuleKind::Allow,
            source,
            target,
            self_flag: false,
            nodes: vec![RulePayload::AccessVector {
                class: ClassIndex(file_class),
                perms: PermissionBits(0b1),
            }],
        });

        db.blocks.push(AvRuleBlock {
            flags: BlockFlags::empty(),
            decls: vec![decl],
        });

        empty_package(db)
    }

    /// Scenario 2: `self_flag=true`, source={s1,s2}, target={}.
    #[must_use]
    pub fn scenario_self_flag_empty_target() -> DecodedPackage {
        let mut db = base_db("base", false);

        let file_class = db.classes.push(
            "file",
            ClassDatum {
                perms: vec!["read".into()],
                ..Default::default()
            },
        );
        let s1 = db.types.push(
            "s1",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );
        let s2 = db.types.push(
            "s2",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );

        let mut decl = AvRuleDecl::default();
        decl.declared.type_.set(s1);
        decl.declared.type_.set(s2);

        let mut source = TypeSet::new();
        source.positive.set(s1);
        source.positive.set(s2);

        decl.avrules.push(AvRule {
            kind: AvRuleKind::Allow,
            source,
            target: TypeSet::new(),
            self_flag: true,
            nodes: vec![RulePayload::AccessVector {
                class: ClassIndex(file_class),
                perms: PermissionBits(0b1),
            }],
        });

        db.blocks.push(AvRuleBlock {
            flags: BlockFlags::empty(),
            decls: vec![decl],
        });

        empty_package(db)
    }

    /// Scenario 3: conditional `b1 b2 and` with a true-branch rule.
    #[must_use]
    pub fn scenario_conditional_and() -> DecodedPackage {
        let mut db = base_db("base", false);

        let file_class = db.classes.push(
            "file",
            ClassDatum {
                perms: vec!["read".into()],
                ..Default::default()
            },
        );
        let alpha = db.types.push(
            "alpha",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );
        let b1 = db.bools.push(
            "b1",
            BoolDatum {
                tunable: false,
                state: true,
            },
        );
        let b2 = db.bools.push(
            "b2",
            BoolDatum {
                tunable: false,
                state: true,
            },
        );

        let mut source = TypeSet::new();
        source.positive.set(alpha);
        let mut target = TypeSet::new();
        target.positive.set(alpha);

        let rule = AvRule {
            kind: AvRuleKind::Allow,
            source,
            target,
            self_flag: false,
            nodes: vec![RulePayload::AccessVector {
                class: ClassIndex(file_class),
                perms: PermissionBits(0b1),
            }],
        };

        let mut decl = AvRuleDecl::default();
        decl.declared.type_.set(alpha);
        decl.conditionals.push(CondNode {
            postfix: vec![
                CondAtom::Bool(BoolIndex(b1)),
                CondAtom::Bool(BoolIndex(b2)),
                CondAtom::Op(CondOp::And),
            ],
            flags: CondFlags::empty(),
            true_rules: vec![rule],
            false_rules: Vec::new(),
        });

        db.blocks.push(AvRuleBlock {
            flags: BlockFlags::empty(),
            decls: vec![decl],
        });

        empty_package(db)
    }

    /// Scenario 4: a TypeSet with STAR and COMP.
    #[must_use]
    pub fn scenario_star_comp_set() -> TypeSet {
        let mut set = TypeSet::new();
        set.flags = SetFlags::STAR | SetFlags::COMP;
        set
    }

    /// Scenario 5: role transition over roles={r1}, types={t1,t2},
    /// classes={process,file}, new=r2.
    #[must_use]
    pub fn scenario_role_transition() -> DecodedPackage {
        let mut db = base_db("base", false);

        db.roles.push("r1", RoleDatum::default());
        let r2 = db.roles.push("r2", RoleDatum::default());
        let t1 = db.types.push(
            "t1",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );
        let t2 = db.types.push(
            "t2",
            TypeDatum {
                flavor: Some(TypeFlavor::Type),
                primary: true,
                ..Default::default()
            },
        );
        db.classes.push("process", ClassDatum::default());
        db.classes.push("file", ClassDatum::default());

        let mut roles = Bitmap::new();
        roles.set(0);
        let mut types = Bitmap::new();
        types.set(t1);
        types.set(t2);
        let mut classes = Bitmap::new();
        classes.set(0);
        classes.set(1);

        let mut decl = AvRuleDecl::default();
        decl.role_transitions.push(RoleTransition {
            roles,
            types,
            classes,
            new_role: RoleIndex(r2),
        });

        db.blocks.push(AvRuleBlock {
            flags: BlockFlags::empty(),
            decls: vec![decl],
        });

        empty_package(db)
    }

    /// Scenario 6: file_contexts line `"/bin(/.*)?" -- system_u:object_r:bin_t:s0`.
    #[must_use]
    pub fn scenario_file_contexts_line() -> DecodedPackage {
        let db = base_db("base", true);
        let mut pkg = empty_package(db);
        pkg.file_contexts = "/bin(/.*)? -- system_u:object_r:bin_t:s0\n".to_string();
        pkg
    }
}
