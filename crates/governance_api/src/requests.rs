//! Request bodies accepted by the governance program operations.

use governance_core::{GovernanceError, GovernanceResult, RelationshipProperties};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Exact-name search body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRequestBody {
    pub name: String,
}

/// Element update body; `is_merge_update` keeps unset fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestBody<P> {
    #[serde(default)]
    pub is_merge_update: bool,
    pub properties: P,
}

/// Appoint/relieve body; a missing time means now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequestBody {
    pub effective_time: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
}

/// Body for setting up a related-element link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedElementRequestBody {
    pub effective_from: Option<i64>,
    pub effective_to: Option<i64>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RelatedElementRequestBody {
    pub fn to_relationship_properties(&self) -> RelationshipProperties {
        RelationshipProperties {
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            attributes: self.properties.clone(),
        }
    }
}

/// Body for attaching a metric to a governance definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLinkRequestBody {
    pub rationale: Option<String>,
}

/// Unwraps a mandatory request body.
pub(crate) fn require_body<T>(body: Option<T>) -> GovernanceResult<T> {
    body.ok_or_else(|| GovernanceError::invalid_parameter("requestBody", "request body is required"))
}

#[cfg(test)]
mod tests {
    use super::{require_body, RelatedElementRequestBody, UpdateRequestBody};
    use governance_core::GovernanceDomainProperties;

    #[test]
    fn update_body_defaults_to_replace() {
        let body: UpdateRequestBody<GovernanceDomainProperties> = serde_json::from_str(
            r#"{"properties":{"qualifiedName":"Domain:Privacy","domainIdentifier":2}}"#,
        )
        .unwrap();
        assert!(!body.is_merge_update);
        assert_eq!(body.properties.base.domain_identifier, Some(2));
    }

    #[test]
    fn related_element_body_maps_window_and_attributes() {
        let body: RelatedElementRequestBody = serde_json::from_str(
            r#"{"effectiveFrom":10,"properties":{"stakeholder_role":"sponsor"}}"#,
        )
        .unwrap();
        let properties = body.to_relationship_properties();
        assert_eq!(properties.effective_from, Some(10));
        assert_eq!(properties.effective_to, None);
        assert_eq!(properties.attribute("stakeholder_role"), Some("sponsor"));
    }

    #[test]
    fn missing_body_is_an_invalid_parameter() {
        let err = require_body::<()>(None).unwrap_err();
        assert_eq!(err.kind_name(), "invalid_parameter");
        assert_eq!(err.identifiers(), vec!["requestBody".to_string()]);
    }
}
