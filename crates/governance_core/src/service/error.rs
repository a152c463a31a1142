//! Error taxonomy shared by every governance program service.
//!
//! # Invariants
//! - Every failure carries the identifiers needed to diagnose it.
//! - Store failures are wrapped, never swallowed or retried.

use crate::model::appointment::{AppointmentError, DuplicateCurrentAppointment};
use crate::model::element::{ElementId, ElementValidationError};
use crate::model::relationship::{RelationshipId, RelationshipValidationError};
use crate::repo::element_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Service-level failure categories.
#[derive(Debug)]
pub enum GovernanceError {
    /// Missing or malformed caller input.
    InvalidParameter { parameter: String, reason: String },
    /// Referenced element is unknown, deleted or of another kind.
    UnrecognizedIdentifier {
        identifier: String,
        expected: &'static str,
    },
    NotAuthorized {
        user_id: String,
        action: &'static str,
    },
    /// The metadata store failed.
    PropertyServerUnavailable(RepoError),
    /// Stored appointments violate the single-incumbent rule.
    DuplicateCurrentAppointment {
        role_id: ElementId,
        appointment_ids: Vec<RelationshipId>,
    },
}

impl GovernanceError {
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn unrecognized(identifier: impl ToString, expected: &'static str) -> Self {
        Self::UnrecognizedIdentifier {
            identifier: identifier.to_string(),
            expected,
        }
    }

    /// Stable name of the error category.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::UnrecognizedIdentifier { .. } => "unrecognized_identifier",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::PropertyServerUnavailable(_) => "property_server_unavailable",
            Self::DuplicateCurrentAppointment { .. } => "duplicate_current_appointment",
        }
    }

    /// Identifiers involved in the failure, for diagnostics.
    pub fn identifiers(&self) -> Vec<String> {
        match self {
            Self::InvalidParameter { parameter, .. } => vec![parameter.clone()],
            Self::UnrecognizedIdentifier { identifier, .. } => vec![identifier.clone()],
            Self::NotAuthorized { user_id, .. } => vec![user_id.clone()],
            Self::PropertyServerUnavailable(RepoError::NotFound(id)) => vec![id.to_string()],
            Self::PropertyServerUnavailable(_) => Vec::new(),
            Self::DuplicateCurrentAppointment {
                role_id,
                appointment_ids,
            } => std::iter::once(role_id.to_string())
                .chain(appointment_ids.iter().map(ToString::to_string))
                .collect(),
        }
    }
}

impl Display for GovernanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter { parameter, reason } => {
                write!(f, "invalid parameter `{parameter}`: {reason}")
            }
            Self::UnrecognizedIdentifier {
                identifier,
                expected,
            } => write!(f, "unrecognized {expected} identifier: {identifier}"),
            Self::NotAuthorized { user_id, action } => {
                write!(f, "user `{user_id}` is not authorized to {action}")
            }
            Self::PropertyServerUnavailable(err) => {
                write!(f, "metadata store unavailable: {err}")
            }
            Self::DuplicateCurrentAppointment {
                role_id,
                appointment_ids,
            } => write!(
                f,
                "role {role_id} has {} current appointments",
                appointment_ids.len()
            ),
        }
    }
}

impl Error for GovernanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PropertyServerUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GovernanceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::RelationshipValidation(err) => err.into(),
            RepoError::NotFound(id) => Self::unrecognized(id, "metadata instance"),
            RepoError::DuplicateQualifiedName(name) => Self::invalid_parameter(
                "qualifiedName",
                format!("qualified name `{name}` is already in use"),
            ),
            other => Self::PropertyServerUnavailable(other),
        }
    }
}

impl From<ElementValidationError> for GovernanceError {
    fn from(value: ElementValidationError) -> Self {
        let parameter = match &value {
            ElementValidationError::BlankQualifiedName => "qualifiedName",
            ElementValidationError::NegativeDomainIdentifier(_) => "domainIdentifier",
            ElementValidationError::InvalidPropertyKey(_) => "properties",
        };
        Self::invalid_parameter(parameter, value.to_string())
    }
}

impl From<RelationshipValidationError> for GovernanceError {
    fn from(value: RelationshipValidationError) -> Self {
        let parameter = match &value {
            RelationshipValidationError::ReversedWindow { .. } => "effectiveTo",
            RelationshipValidationError::UnknownAttribute { .. } => "properties",
        };
        Self::invalid_parameter(parameter, value.to_string())
    }
}

impl From<DuplicateCurrentAppointment> for GovernanceError {
    fn from(value: DuplicateCurrentAppointment) -> Self {
        Self::DuplicateCurrentAppointment {
            role_id: value.role_id,
            appointment_ids: value.appointment_ids,
        }
    }
}

impl From<AppointmentError> for GovernanceError {
    fn from(value: AppointmentError) -> Self {
        let reason = value.to_string();
        match value {
            AppointmentError::DuplicateCurrent(err) => err.into(),
            AppointmentError::AlreadyIncumbent { .. } | AppointmentError::NoAppointment { .. } => {
                Self::invalid_parameter("personGUID", reason)
            }
            AppointmentError::StartPrecedesIncumbent { .. }
            | AppointmentError::EndPrecedesStart { .. }
            | AppointmentError::EndExtendsAppointment { .. } => {
                Self::invalid_parameter("effectiveTime", reason)
            }
        }
    }
}
