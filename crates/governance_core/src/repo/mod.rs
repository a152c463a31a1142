//! Metadata repository abstractions and the SQLite implementation.
//!
//! # Responsibility
//! - Define the store contract consumed by handlers: create/update/remove
//!   elements, add/update/remove relationships, find relationships by kind.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`,
//!   `DuplicateQualifiedName`) in addition to storage errors.

pub mod element_repo;
pub mod relationship_repo;

use element_repo::ElementRepository;
use relationship_repo::RelationshipRepository;

/// Full metadata store contract: elements plus relationships.
pub trait MetadataRepository: ElementRepository + RelationshipRepository {}

impl<T: ElementRepository + RelationshipRepository> MetadataRepository for T {}
