//! In-memory stores shared by the coordinator and its callers.
//!
//! - [`SessionStore`]: session identity, original scope, lifecycle status
//! - [`TaskGroupRegistry`]: authoritative status of every task group
//! - [`InvocationLog`]: append-only audit trail of agent invocations
//!
//! Each store guards its state with a single mutex and is shared through
//! `Arc`. Lock guards never cross an `.await`.

pub mod group_registry;
pub mod invocation_log;
pub mod session_store;

pub use group_registry::TaskGroupRegistry;
pub use invocation_log::InvocationLog;
pub use session_store::SessionStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every mutation validates before it writes, so a panic can never leave a
/// half-applied change behind.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
