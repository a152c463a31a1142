//! Governance program use-case services.
//!
//! # Responsibility
//! - Validate caller input, authorize, and orchestrate repository calls.
//! - Translate store failures into [`error::GovernanceError`].

pub mod domain_service;
pub mod error;
pub mod handler;
pub mod metric_service;
pub mod related_element_service;
pub mod role_service;
pub mod subject_area_service;
