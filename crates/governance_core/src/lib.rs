//! Core of the governance program metadata access layer.
//! This crate is the single source of truth for governance invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod security;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ServerConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, init_from_config, init_logging, log_service_failure, logging_status,
    LoggingError,
};
pub use model::appointment::{
    classify, partition, Appointment, AppointmentPartition, DuplicateCurrentAppointment,
    WindowPosition,
};
pub use model::element::{Element, ElementId, ElementKind};
pub use model::governance::{
    ElementProperties, GovernanceDomainProperties, GovernanceMetricProperties,
    GovernanceRoleProperties, PersonProperties, ReferenceableProperties, SubjectAreaProperties,
    TypedElement,
};
pub use model::relationship::{
    Relationship, RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
};
pub use repo::element_repo::{
    ElementListQuery, ElementRepository, RepoError, RepoResult, SqliteMetadataRepository,
};
pub use repo::relationship_repo::RelationshipRepository;
pub use repo::MetadataRepository;
pub use security::{AccessAction, AccessPolicy, AllowListPolicy, OpenAccessPolicy};
pub use service::domain_service::GovernanceDomainService;
pub use service::error::{GovernanceError, GovernanceResult};
pub use service::handler::{Paging, ServiceContext, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use service::metric_service::GovernanceMetricService;
pub use service::related_element_service::{RelatedElementService, RelatedElementSummary};
pub use service::role_service::{Appointee, Appointees, GovernanceRoleService};
pub use service::subject_area_service::SubjectAreaService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
