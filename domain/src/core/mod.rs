//! Core domain concepts shared across all subdomains.
//!
//! - [`ids::SessionId`] / [`ids::GroupId`]: identifiers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
