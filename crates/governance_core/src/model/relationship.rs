//! Relationship model linking two metadata elements.
//!
//! # Responsibility
//! - Define relationship kinds together with their allowed end kinds and
//!   attribute names.
//! - Carry effectivity windows used for temporal filtering.
//!
//! # Invariants
//! - `effective_from <= effective_to` whenever both bounds are set.
//! - Attribute keys must be declared by the relationship kind.

use crate::model::element::{Element, ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every relationship.
pub type RelationshipId = Uuid;

/// Relationship types understood by the governance program layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Person (end1) appointed to a governance role (end2).
    PersonRoleAppointment,
    /// Commissioned element (end1) and its stakeholder (end2).
    Stakeholder,
    /// Actor (end1) and the scope it is assigned to (end2).
    AssignmentScope,
    /// Anchor element (end1) and a supporting resource (end2).
    ResourceList,
    /// Governance definition (end1) and the element it governs (end2).
    GovernedBy,
    /// Described element (end1) and its descriptive element (end2).
    MoreInformation,
    /// Parent subject area (end1) and child subject area (end2).
    SubjectAreaHierarchy,
    /// Metric (end1) measuring a governance definition (end2).
    GovernanceDefinitionMetric,
    /// Domain set (end1) containing a governance domain (end2).
    GovernanceDomainSetMember,
}

impl RelationshipKind {
    /// Stable storage/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonRoleAppointment => "person_role_appointment",
            Self::Stakeholder => "stakeholder",
            Self::AssignmentScope => "assignment_scope",
            Self::ResourceList => "resource_list",
            Self::GovernedBy => "governed_by",
            Self::MoreInformation => "more_information",
            Self::SubjectAreaHierarchy => "subject_area_hierarchy",
            Self::GovernanceDefinitionMetric => "governance_definition_metric",
            Self::GovernanceDomainSetMember => "governance_domain_set_member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "person_role_appointment" => Some(Self::PersonRoleAppointment),
            "stakeholder" => Some(Self::Stakeholder),
            "assignment_scope" => Some(Self::AssignmentScope),
            "resource_list" => Some(Self::ResourceList),
            "governed_by" => Some(Self::GovernedBy),
            "more_information" => Some(Self::MoreInformation),
            "subject_area_hierarchy" => Some(Self::SubjectAreaHierarchy),
            "governance_definition_metric" => Some(Self::GovernanceDefinitionMetric),
            "governance_domain_set_member" => Some(Self::GovernanceDomainSetMember),
            _ => None,
        }
    }

    /// Kinds required at `(end1, end2)`.
    pub fn end_kinds(self) -> (ElementKind, ElementKind) {
        match self {
            Self::PersonRoleAppointment => (ElementKind::Person, ElementKind::GovernanceRole),
            Self::SubjectAreaHierarchy => (ElementKind::SubjectArea, ElementKind::SubjectArea),
            Self::GovernanceDefinitionMetric => {
                (ElementKind::GovernanceMetric, ElementKind::Referenceable)
            }
            Self::GovernanceDomainSetMember => {
                (ElementKind::Referenceable, ElementKind::GovernanceDomain)
            }
            Self::Stakeholder
            | Self::AssignmentScope
            | Self::ResourceList
            | Self::GovernedBy
            | Self::MoreInformation => (ElementKind::Referenceable, ElementKind::Referenceable),
        }
    }

    /// Attribute names this kind may carry.
    pub fn allowed_attributes(self) -> &'static [&'static str] {
        match self {
            Self::PersonRoleAppointment => &["is_public"],
            Self::Stakeholder => &["stakeholder_role"],
            Self::AssignmentScope => &["assignment_type", "description"],
            Self::ResourceList => &["resource_use", "watch_resource"],
            Self::GovernedBy => &["label", "description"],
            Self::GovernanceDefinitionMetric => &["rationale"],
            Self::MoreInformation | Self::SubjectAreaHierarchy | Self::GovernanceDomainSetMember => {
                &[]
            }
        }
    }
}

impl Display for RelationshipKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for relationship properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipValidationError {
    ReversedWindow { effective_from: i64, effective_to: i64 },
    UnknownAttribute {
        kind: RelationshipKind,
        attribute: String,
    },
}

impl Display for RelationshipValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReversedWindow {
                effective_from,
                effective_to,
            } => write!(
                f,
                "effective_to {effective_to} must not be earlier than effective_from {effective_from}"
            ),
            Self::UnknownAttribute { kind, attribute } => {
                write!(f, "relationship {kind} does not support attribute `{attribute}`")
            }
        }
    }
}

impl Error for RelationshipValidationError {}

/// Effectivity window and attributes of one relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipProperties {
    /// Epoch ms. `None` means effective since forever.
    pub effective_from: Option<i64>,
    /// Epoch ms. `None` means effective forever.
    pub effective_to: Option<i64>,
    pub attributes: BTreeMap<String, String>,
}

impl RelationshipProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(effective_from: Option<i64>, effective_to: Option<i64>) -> Self {
        Self {
            effective_from,
            effective_to,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Checks the window ordering and the attribute names for `kind`.
    pub fn validate_for(&self, kind: RelationshipKind) -> Result<(), RelationshipValidationError> {
        if let (Some(effective_from), Some(effective_to)) = (self.effective_from, self.effective_to)
        {
            if effective_from > effective_to {
                return Err(RelationshipValidationError::ReversedWindow {
                    effective_from,
                    effective_to,
                });
            }
        }

        let allowed = kind.allowed_attributes();
        if let Some(attribute) = self
            .attributes
            .keys()
            .find(|key| !allowed.contains(&key.as_str()))
        {
            return Err(RelationshipValidationError::UnknownAttribute {
                kind,
                attribute: attribute.clone(),
            });
        }
        Ok(())
    }

    /// Returns whether `now` falls inside the closed window, null bounds open.
    pub fn is_effective_at(&self, now: i64) -> bool {
        self.effective_from.map_or(true, |from| from <= now)
            && self.effective_to.map_or(true, |to| to >= now)
    }
}

/// Stored relationship between two elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub guid: RelationshipId,
    pub kind: RelationshipKind,
    pub end1_guid: ElementId,
    pub end2_guid: ElementId,
    pub properties: RelationshipProperties,
}

impl Relationship {
    /// Returns the element at the other end, or `None` when `element` is not an end.
    pub fn other_end(&self, element: ElementId) -> Option<ElementId> {
        if self.end1_guid == element {
            Some(self.end2_guid)
        } else if self.end2_guid == element {
            Some(self.end1_guid)
        } else {
            None
        }
    }
}

/// Which end of a relationship a query starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipEnd {
    End1,
    End2,
}

/// One related element together with the relationship that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedElement {
    pub relationship: Relationship,
    pub element: Element,
}
