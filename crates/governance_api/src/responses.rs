//! Response envelopes returned by every governance program operation.
//!
//! # Invariants
//! - `related_http_code` is 200 exactly when `exception` is absent.
//! - Failures are logged once, when the envelope is built.

use governance_core::service::metric_service::DefinitionMetric;
use governance_core::{
    log_service_failure, Appointee, Appointees, ElementId, GovernanceError, GovernanceResult,
    RelatedElementSummary, RelationshipId, TypedElement,
};
use serde::Serialize;

pub const HTTP_OK: u16 = 200;

/// Failure details carried by an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetail {
    /// Stable error category, e.g. `invalid_parameter`.
    pub error_kind: String,
    pub message: String,
    pub identifiers: Vec<String>,
}

impl From<&GovernanceError> for ExceptionDetail {
    fn from(value: &GovernanceError) -> Self {
        Self {
            error_kind: value.kind_name().to_string(),
            message: value.to_string(),
            identifiers: value.identifiers(),
        }
    }
}

/// Status code reported for an error category.
pub fn http_code(err: &GovernanceError) -> u16 {
    match err {
        GovernanceError::InvalidParameter { .. } => 400,
        GovernanceError::NotAuthorized { .. } => 403,
        GovernanceError::UnrecognizedIdentifier { .. } => 404,
        GovernanceError::DuplicateCurrentAppointment { .. } => 409,
        GovernanceError::PropertyServerUnavailable(_) => 503,
    }
}

/// Generic response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceResponse<T> {
    pub related_http_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionDetail>,
}

impl<T> GovernanceResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            related_http_code: HTTP_OK,
            result: Some(result),
            exception: None,
        }
    }

    pub fn failure(operation: &str, err: &GovernanceError) -> Self {
        log_service_failure(operation, err);
        Self {
            related_http_code: http_code(err),
            result: None,
            exception: Some(ExceptionDetail::from(err)),
        }
    }

    pub fn from_result(operation: &str, result: GovernanceResult<T>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(operation, &err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exception.is_none()
    }
}

pub type VoidResponse = GovernanceResponse<()>;
pub type GuidResponse = GovernanceResponse<ElementId>;
pub type RelationshipGuidResponse = GovernanceResponse<RelationshipId>;
pub type ElementResponse<P> = GovernanceResponse<TypedElement<P>>;
pub type ElementsResponse<P> = GovernanceResponse<Vec<TypedElement<P>>>;
pub type RelatedElementsResponse = GovernanceResponse<Vec<RelatedElementSummary>>;
pub type MetricsResponse = GovernanceResponse<Vec<DefinitionMetric>>;
pub type AppointeesResponse = GovernanceResponse<Appointees>;
pub type IncumbentResponse = GovernanceResponse<Option<Appointee>>;
