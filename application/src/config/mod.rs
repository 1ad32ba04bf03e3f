//! Application-level configuration.
//!
//! - [`CoordinatorParams`]: dispatch, revision and completion knobs for the
//!   [`Coordinator`](crate::use_cases::coordinator::Coordinator)

pub mod coordinator_params;

pub use coordinator_params::CoordinatorParams;
