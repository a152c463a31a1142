//! Typed property projections over [`Element`].
//!
//! Each governance kind exposes its own property struct. The struct knows how
//! to write itself onto an element (full replacement or merge) and how to read
//! itself back, so handlers can stay generic over the kind.

use crate::model::element::{Element, ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) const ROLE_ID: &str = "role_id";
const TITLE: &str = "title";
const SCOPE: &str = "scope";
const HEADCOUNT: &str = "headcount";
const MEASUREMENT: &str = "measurement";
const TARGET: &str = "target";
const SUBJECT_AREA_NAME: &str = "subject_area_name";
const USAGE: &str = "usage";
const USER_ID: &str = "user_id";
const FULL_NAME: &str = "full_name";

/// Property projection for one element kind.
pub trait ElementProperties: Sized {
    /// Kind of the elements this projection reads and writes.
    const KIND: ElementKind;

    /// Writes the properties onto `element`.
    ///
    /// With `is_merge_update`, `None` fields keep the stored value; otherwise
    /// they clear it.
    fn apply_to(&self, element: &mut Element, is_merge_update: bool);

    /// Reads the properties back from a stored element.
    fn from_element(element: &Element) -> Self;
}

/// An element guid paired with its typed properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedElement<P> {
    pub guid: ElementId,
    pub properties: P,
}

impl<P: ElementProperties> TypedElement<P> {
    pub fn from_element(element: &Element) -> Self {
        Self {
            guid: element.guid,
            properties: P::from_element(element),
        }
    }
}

/// Properties shared by every governance element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceableProperties {
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub domain_identifier: Option<i32>,
    #[serde(default)]
    pub additional_properties: BTreeMap<String, String>,
}

impl ReferenceableProperties {
    pub fn named(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
            ..Self::default()
        }
    }

    fn apply_common(&self, element: &mut Element, is_merge_update: bool) {
        if is_merge_update {
            if let Some(value) = &self.qualified_name {
                element.qualified_name = value.clone();
            }
            if self.display_name.is_some() {
                element.display_name = self.display_name.clone();
            }
            if self.description.is_some() {
                element.description = self.description.clone();
            }
            if let Some(value) = self.domain_identifier {
                element.domain_identifier = value;
            }
            element
                .additional_properties
                .extend(self.additional_properties.clone());
        } else {
            element.qualified_name = self.qualified_name.clone().unwrap_or_default();
            element.display_name = self.display_name.clone();
            element.description = self.description.clone();
            element.domain_identifier = self.domain_identifier.unwrap_or(0);
            element.additional_properties = self.additional_properties.clone();
        }
    }

    fn read_common(element: &Element) -> Self {
        Self {
            qualified_name: Some(element.qualified_name.clone()),
            display_name: element.display_name.clone(),
            description: element.description.clone(),
            domain_identifier: Some(element.domain_identifier),
            additional_properties: element.additional_properties.clone(),
        }
    }
}

impl ElementProperties for ReferenceableProperties {
    const KIND: ElementKind = ElementKind::Referenceable;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.apply_common(element, is_merge_update);
    }

    fn from_element(element: &Element) -> Self {
        Self::read_common(element)
    }
}

fn apply_extended(
    element: &mut Element,
    key: &str,
    value: Option<String>,
    is_merge_update: bool,
) {
    if is_merge_update && value.is_none() {
        return;
    }
    element.set_extended(key, value);
}

fn read_extended(element: &Element, key: &str) -> Option<String> {
    element.extended(key).map(str::to_string)
}

/// Governance domain, e.g. privacy, security or data quality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceDomainProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,
}

impl ElementProperties for GovernanceDomainProperties {
    const KIND: ElementKind = ElementKind::GovernanceDomain;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.base.apply_common(element, is_merge_update);
    }

    fn from_element(element: &Element) -> Self {
        Self {
            base: ReferenceableProperties::read_common(element),
        }
    }
}

/// Governance role (post) such as a governance officer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRoleProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,
    /// Business identifier of the role, e.g. `CDO`.
    pub role_id: Option<String>,
    pub title: Option<String>,
    pub scope: Option<String>,
    /// Number of people expected to hold the role.
    pub headcount: Option<u32>,
}

impl ElementProperties for GovernanceRoleProperties {
    const KIND: ElementKind = ElementKind::GovernanceRole;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.base.apply_common(element, is_merge_update);
        apply_extended(element, ROLE_ID, self.role_id.clone(), is_merge_update);
        apply_extended(element, TITLE, self.title.clone(), is_merge_update);
        apply_extended(element, SCOPE, self.scope.clone(), is_merge_update);
        apply_extended(
            element,
            HEADCOUNT,
            self.headcount.map(|value| value.to_string()),
            is_merge_update,
        );
    }

    fn from_element(element: &Element) -> Self {
        Self {
            base: ReferenceableProperties::read_common(element),
            role_id: read_extended(element, ROLE_ID),
            title: read_extended(element, TITLE),
            scope: read_extended(element, SCOPE),
            headcount: element
                .extended(HEADCOUNT)
                .and_then(|value| value.parse().ok()),
        }
    }
}

/// Governance metric measuring how well a definition is followed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceMetricProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,
    pub measurement: Option<String>,
    pub target: Option<String>,
}

impl ElementProperties for GovernanceMetricProperties {
    const KIND: ElementKind = ElementKind::GovernanceMetric;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.base.apply_common(element, is_merge_update);
        apply_extended(element, MEASUREMENT, self.measurement.clone(), is_merge_update);
        apply_extended(element, TARGET, self.target.clone(), is_merge_update);
    }

    fn from_element(element: &Element) -> Self {
        Self {
            base: ReferenceableProperties::read_common(element),
            measurement: read_extended(element, MEASUREMENT),
            target: read_extended(element, TARGET),
        }
    }
}

/// Subject area grouping related data definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAreaProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,
    pub subject_area_name: Option<String>,
    pub usage: Option<String>,
}

impl ElementProperties for SubjectAreaProperties {
    const KIND: ElementKind = ElementKind::SubjectArea;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.base.apply_common(element, is_merge_update);
        apply_extended(
            element,
            SUBJECT_AREA_NAME,
            self.subject_area_name.clone(),
            is_merge_update,
        );
        apply_extended(element, USAGE, self.usage.clone(), is_merge_update);
    }

    fn from_element(element: &Element) -> Self {
        Self {
            base: ReferenceableProperties::read_common(element),
            subject_area_name: read_extended(element, SUBJECT_AREA_NAME),
            usage: read_extended(element, USAGE),
        }
    }
}

/// Person profile that can be appointed to governance roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
}

impl ElementProperties for PersonProperties {
    const KIND: ElementKind = ElementKind::Person;

    fn apply_to(&self, element: &mut Element, is_merge_update: bool) {
        self.base.apply_common(element, is_merge_update);
        apply_extended(element, USER_ID, self.user_id.clone(), is_merge_update);
        apply_extended(element, FULL_NAME, self.full_name.clone(), is_merge_update);
    }

    fn from_element(element: &Element) -> Self {
        Self {
            base: ReferenceableProperties::read_common(element),
            user_id: read_extended(element, USER_ID),
            full_name: read_extended(element, FULL_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ElementProperties, GovernanceRoleProperties, ReferenceableProperties,
        SubjectAreaProperties,
    };
    use crate::model::element::{Element, ElementKind};

    fn role_properties() -> GovernanceRoleProperties {
        GovernanceRoleProperties {
            base: ReferenceableProperties {
                display_name: Some("Chief Data Officer".to_string()),
                domain_identifier: Some(1),
                ..ReferenceableProperties::named("GovernanceRole:CDO")
            },
            role_id: Some("CDO".to_string()),
            title: Some("Chief Data Officer".to_string()),
            scope: Some("Enterprise".to_string()),
            headcount: Some(1),
        }
    }

    #[test]
    fn role_properties_survive_apply_and_read_back() {
        let properties = role_properties();
        let mut element = Element::new(ElementKind::GovernanceRole, "");
        properties.apply_to(&mut element, false);

        assert_eq!(element.qualified_name, "GovernanceRole:CDO");
        assert_eq!(element.domain_identifier, 1);
        assert_eq!(element.extended("headcount"), Some("1"));
        assert_eq!(GovernanceRoleProperties::from_element(&element), properties);
    }

    #[test]
    fn merge_keeps_unspecified_fields_and_replace_clears_them() {
        let mut element = Element::new(ElementKind::GovernanceRole, "");
        role_properties().apply_to(&mut element, false);

        let patch = GovernanceRoleProperties {
            title: Some("Data Governance Lead".to_string()),
            ..GovernanceRoleProperties::default()
        };
        patch.apply_to(&mut element, true);
        assert_eq!(element.qualified_name, "GovernanceRole:CDO");
        assert_eq!(element.extended("title"), Some("Data Governance Lead"));
        assert_eq!(element.extended("scope"), Some("Enterprise"));

        patch.apply_to(&mut element, false);
        assert!(element.qualified_name.is_empty());
        assert_eq!(element.extended("scope"), None);
        assert_eq!(element.domain_identifier, 0);
    }

    #[test]
    fn flattened_json_uses_camel_case() {
        let properties: SubjectAreaProperties = serde_json::from_str(
            r#"{"qualifiedName":"SubjectArea:Customer","subjectAreaName":"Customer","domainIdentifier":2}"#,
        )
        .expect("subject area json");
        assert_eq!(
            properties.base.qualified_name.as_deref(),
            Some("SubjectArea:Customer")
        );
        assert_eq!(properties.subject_area_name.as_deref(), Some("Customer"));
        assert_eq!(properties.base.domain_identifier, Some(2));
    }
}
