//! Symbol tables, symbol-kind indices, and decl scope bookkeeping.

use std::collections::HashMap;

use super::bitmap::Bitmap;

macro_rules! index_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }
    };
}

index_type!(CommonIndex);
index_type!(ClassIndex);
index_type!(RoleIndex);
index_type!(TypeIndex);
index_type!(UserIndex);
index_type!(BoolIndex);
index_type!(SensIndex);
index_type!(CatIndex);

/// The eight symbol kinds a policy database indexes by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Common,
    Class,
    Role,
    Type,
    User,
    Bool,
    Sens,
    Cat,
}

impl SymbolKind {
    pub const ALL: [Self; 8] = [
        Self::Common,
        Self::Class,
        Self::Role,
        Self::Type,
        Self::User,
        Self::Bool,
        Self::Sens,
        Self::Cat,
    ];
}

/// A generic, index-addressable symbol table: the i-th slot has a name and
/// an associated datum. Lookups by name return a datum; lookups by index
/// return a name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable<T> {
    entries: Vec<(String, T)>,
    by_name: HashMap<String, u32>,
}

impl<T> SymbolTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, datum: T) -> u32 {
        let name = name.into();
        let idx = self.entries.len() as u32;
        self.by_name.insert(name.clone(), idx);
        self.entries.push((name, datum));
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name at a zero-based index.
    #[must_use]
    pub fn name_at(&self, index: u32) -> Option<&str> {
        self.entries.get(index as usize).map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn datum_at(&self, index: u32) -> Option<&T> {
        self.entries.get(index as usize).map(|(_, d)| d)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (n, d))| (i as u32, n.as_str(), d))
    }
}

/// Whether a name is declared by, or merely required by, a decl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Decl,
    Req,
}

/// Per-name metadata: which decls declared this name.
#[derive(Debug, Clone, Default)]
pub struct ScopeDatum {
    pub scope: Scope,
    pub decl_ids: Vec<u32>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::Req
    }
}

/// Per-decl bitmaps over each of the eight symbol kinds, plus the
/// class-permissions bitmap array used by the scope-subset predicate.
#[derive(Debug, Clone, Default)]
pub struct ScopeIndex {
    pub common: Bitmap,
    pub class: Bitmap,
    pub role: Bitmap,
    pub type_: Bitmap,
    pub user: Bitmap,
    pub bool_: Bitmap,
    pub sens: Bitmap,
    pub cat: Bitmap,
    pub class_perms: Vec<Bitmap>,
}

impl ScopeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn by_kind(&self, kind: SymbolKind) -> &Bitmap {
        match kind {
            SymbolKind::Common => &self.common,
            SymbolKind::Class => &self.class,
            SymbolKind::Role => &self.role,
            SymbolKind::Type => &self.type_,
            SymbolKind::User => &self.user,
            SymbolKind::Bool => &self.bool_,
            SymbolKind::Sens => &self.sens,
            SymbolKind::Cat => &self.cat,
        }
    }

    pub fn by_kind_mut(&mut self, kind: SymbolKind) -> &mut Bitmap {
        match kind {
            SymbolKind::Common => &mut self.common,
            SymbolKind::Class => &mut self.class,
            SymbolKind::Role => &mut self.role,
            SymbolKind::Type => &mut self.type_,
            SymbolKind::User => &mut self.user,
            SymbolKind::Bool => &mut self.bool_,
            SymbolKind::Sens => &mut self.sens,
            SymbolKind::Cat => &mut self.cat,
        }
    }

    /// The scope-subset predicate used by the block walker when deciding
    /// how many enclosing optionals to close: every bit set in `self` must
    /// also be set in `other`, across all eight kinds and the class-perm
    /// bitmap array (which additionally requires `other` to have at least
    /// as many class entries as `self`).
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        for kind in SymbolKind::ALL {
            if !self.by_kind(kind).is_subset_of(other.by_kind(kind)) {
                return false;
            }
        }

        if self.class_perms.len() > other.class_perms.len() {
            return false;
        }

        self.class_perms
            .iter()
            .zip(other.class_perms.iter())
            .all(|(a, b)| a.is_subset_of(b))
    }
}
