//! Per-construct lowerers (§4.4–§4.9). The Block Walker (`crate::walker`)
//! is the only caller; each submodule here stays ignorant of the decl/
//! scope/optional-block bookkeeping that decides *when* it runs.

pub mod avrule;
pub mod cond;
pub mod constraint;
pub mod octx;
pub mod symbols;
pub mod transition;

pub use avrule::lower_avrule;
pub use cond::lower_cond;
pub use constraint::{lower_class_constraint, lower_class_validatetrans};
pub use octx::lower_object_contexts;
pub use symbols::{decl_is_optional, lower_bool, lower_cat, lower_class, lower_role, lower_sens, lower_type, lower_user};
pub use transition::{lower_filename_transition, lower_range_transition, lower_role_transition};
