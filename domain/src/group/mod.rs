//! Task group domain.
//!
//! - [`status::GroupStatus`]: the per-group state machine and its
//!   allowed-transition table
//! - [`entities::TaskGroup`]: one unit of schedulable work
//! - [`policy::RevisionPolicy`]: the retry ceiling

pub mod entities;
pub mod policy;
pub mod status;
