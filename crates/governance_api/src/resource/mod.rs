//! Governance program resource: one method per service operation.
//!
//! # Responsibility
//! - Open the metadata store for each call and build the service context
//!   from [`ServerConfig`].
//! - Parse path identifiers and unwrap request bodies before delegating.
//!
//! # Invariants
//! - No state survives a call apart from configuration and the clock.

mod domains;
mod metrics;
mod related_elements;
mod roles;
mod subject_areas;

use crate::responses::GovernanceResponse;
use governance_core::{
    open_db, Clock, ElementId, GovernanceError, GovernanceResult, Paging, ServerConfig,
    ServiceContext, SqliteMetadataRepository, SystemClock,
};
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for every governance program operation.
pub struct GovernanceProgramResource {
    config: ServerConfig,
    clock: Arc<dyn Clock>,
}

impl GovernanceProgramResource {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs `operation` against a freshly opened store and wraps the outcome.
    fn run<T>(
        &self,
        operation: &str,
        f: impl FnOnce(SqliteMetadataRepository<'_>, ServiceContext) -> GovernanceResult<T>,
    ) -> GovernanceResponse<T> {
        debug!(
            "event=operation_start module=api status=ok operation={}",
            operation
        );
        let result = open_db(&self.config.db_path)
            .map_err(|err| GovernanceError::from(governance_core::RepoError::Db(err)))
            .and_then(|conn| {
                let repo = SqliteMetadataRepository::try_new(&conn)?;
                let context =
                    ServiceContext::new(self.config.access_policy(), Arc::clone(&self.clock));
                f(repo, context)
            });
        GovernanceResponse::from_result(operation, result)
    }
}

/// Parses a guid path parameter.
fn parse_guid(value: &str, parameter: &str) -> GovernanceResult<ElementId> {
    Uuid::parse_str(value.trim()).map_err(|err| {
        GovernanceError::invalid_parameter(parameter, format!("`{value}` is not a guid: {err}"))
    })
}

fn paging(start_from: u32, page_size: u32) -> Paging {
    Paging::new(start_from, page_size)
}


#[cfg(test)]
mod tests {
    use super::parse_guid;
    use super::test_support::{resource, USER};
    use governance_core::{GovernanceDomainProperties, ReferenceableProperties};

    #[test]
    fn malformed_guid_is_an_invalid_parameter() {
        let err = parse_guid("not-a-guid", "domainGUID").unwrap_err();
        assert_eq!(err.kind_name(), "invalid_parameter");
        assert_eq!(err.identifiers(), vec!["domainGUID".to_string()]);
    }

    #[test]
    fn unopenable_store_is_reported_as_unavailable() {
        let (dir, _clock, _) = resource(0);
        let config = governance_core::ServerConfig {
            db_path: dir.path().join("missing").join("nested").join("db.sqlite3"),
            ..governance_core::ServerConfig::default()
        };
        let resource = super::GovernanceProgramResource::new(config);
        let properties = GovernanceDomainProperties {
            base: ReferenceableProperties::named("Domain:Privacy"),
        };
        let response = resource.create_governance_domain(USER, Some(&properties));
        assert_eq!(response.related_http_code, 503);
    }
}
