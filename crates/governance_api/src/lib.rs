//! Request/response layer of the governance program services.
//!
//! # Responsibility
//! - Validate request bodies and path identifiers.
//! - Delegate to `governance_core` services over a per-call store connection.
//! - Translate every outcome into a response envelope with an HTTP-style code.
//!
//! # Invariants
//! - Operations never panic and never return `Err`; failures travel in the
//!   envelope's `exception` field.

pub mod requests;
pub mod resource;
pub mod responses;

pub use requests::{
    AppointmentRequestBody, MetricLinkRequestBody, NameRequestBody, RelatedElementRequestBody,
    UpdateRequestBody,
};
pub use resource::GovernanceProgramResource;
pub use responses::{
    AppointeesResponse, ElementResponse, ElementsResponse, ExceptionDetail, GovernanceResponse,
    GuidResponse, IncumbentResponse, MetricsResponse, RelatedElementsResponse,
    RelationshipGuidResponse, VoidResponse,
};

/// Health check passthrough.
pub fn ping() -> String {
    governance_core::ping().to_owned()
}

/// Core crate version passthrough.
pub fn core_version() -> String {
    governance_core::core_version().to_owned()
}
