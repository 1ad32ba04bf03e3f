//! Session domain.
//!
//! - [`entities::Session`]: one orchestration run and its lifecycle status
//! - [`scope::Scope`]: the original requested scope, validated once

pub mod entities;
pub mod scope;
