//! State persistence adapters.

mod json_repository;

pub use json_repository::JsonStateRepository;
