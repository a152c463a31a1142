//! Governance program domain model.
//!
//! # Responsibility
//! - Define canonical element and relationship records shared by every
//!   service.
//! - Hold the appointment window resolver, which is pure and storage-free.
//!
//! # Invariants
//! - Every element and relationship is identified by a stable UUID.
//! - Element deletion is a soft-delete tombstone, not a hard delete.

pub mod appointment;
pub mod element;
pub mod governance;
pub mod relationship;
