//! Metadata element model.
//!
//! # Responsibility
//! - Define the canonical record shared by every governance element kind.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `guid` is stable and never reused for another element.
//! - `qualified_name` is non-blank; uniqueness among active elements is
//!   enforced by the repository.
//! - `domain_identifier` is never negative (`0` means "all domains").

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static PROPERTY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").expect("valid property key regex"));

/// Stable identifier for every metadata element.
pub type ElementId = Uuid;

/// Type of a metadata element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    GovernanceDomain,
    /// Governance officer or any other governance post.
    GovernanceRole,
    GovernanceMetric,
    SubjectArea,
    /// Actor profile that can be appointed to a governance role.
    Person,
    /// Any other element that can sit at the end of a link.
    Referenceable,
}

impl ElementKind {
    /// Stable storage/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GovernanceDomain => "governance_domain",
            Self::GovernanceRole => "governance_role",
            Self::GovernanceMetric => "governance_metric",
            Self::SubjectArea => "subject_area",
            Self::Person => "person",
            Self::Referenceable => "referenceable",
        }
    }

    /// Parses a stable label back into a kind.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "governance_domain" => Some(Self::GovernanceDomain),
            "governance_role" => Some(Self::GovernanceRole),
            "governance_metric" => Some(Self::GovernanceMetric),
            "subject_area" => Some(Self::SubjectArea),
            "person" => Some(Self::Person),
            "referenceable" => Some(Self::Referenceable),
            _ => None,
        }
    }

    /// Returns whether an element of `actual` kind satisfies this kind.
    ///
    /// `Referenceable` is the supertype of every element kind.
    pub fn accepts(self, actual: ElementKind) -> bool {
        self == Self::Referenceable || self == actual
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for element records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValidationError {
    BlankQualifiedName,
    NegativeDomainIdentifier(i32),
    InvalidPropertyKey(String),
}

impl Display for ElementValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankQualifiedName => write!(f, "qualified_name must not be blank"),
            Self::NegativeDomainIdentifier(value) => {
                write!(f, "domain_identifier must not be negative, got {value}")
            }
            Self::InvalidPropertyKey(key) => write!(f, "invalid property key `{key}`"),
        }
    }
}

impl Error for ElementValidationError {}

/// Canonical metadata record.
///
/// Kind-specific values live in `extended_properties` and are projected
/// through the typed property structs in [`crate::model::governance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub guid: ElementId,
    pub kind: ElementKind,
    /// Unique name among active elements.
    pub qualified_name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Governance domain this element belongs to. `0` means all domains.
    pub domain_identifier: i32,
    /// Free-form caller supplied properties.
    pub additional_properties: BTreeMap<String, String>,
    /// Kind-specific properties keyed by stable snake_case names.
    pub extended_properties: BTreeMap<String, String>,
    /// Soft delete tombstone.
    pub is_deleted: bool,
}

impl Element {
    /// Creates a new element with a generated stable ID.
    pub fn new(kind: ElementKind, qualified_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, qualified_name)
    }

    /// Creates a new element with a caller-provided stable ID.
    pub fn with_id(guid: ElementId, kind: ElementKind, qualified_name: impl Into<String>) -> Self {
        Self {
            guid,
            kind,
            qualified_name: qualified_name.into(),
            display_name: None,
            description: None,
            domain_identifier: 0,
            additional_properties: BTreeMap::new(),
            extended_properties: BTreeMap::new(),
            is_deleted: false,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ElementValidationError> {
        if self.qualified_name.trim().is_empty() {
            return Err(ElementValidationError::BlankQualifiedName);
        }
        if self.domain_identifier < 0 {
            return Err(ElementValidationError::NegativeDomainIdentifier(
                self.domain_identifier,
            ));
        }
        for key in self
            .additional_properties
            .keys()
            .chain(self.extended_properties.keys())
        {
            if !PROPERTY_KEY_RE.is_match(key) {
                return Err(ElementValidationError::InvalidPropertyKey(key.clone()));
            }
        }
        Ok(())
    }

    /// Reads one kind-specific property.
    pub fn extended(&self, key: &str) -> Option<&str> {
        self.extended_properties.get(key).map(String::as_str)
    }

    /// Writes or clears one kind-specific property.
    pub fn set_extended(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.extended_properties.insert(key.to_string(), value);
            }
            None => {
                self.extended_properties.remove(key);
            }
        }
    }

    /// Returns true when `name` matches the qualified or display name exactly.
    pub fn matches_name(&self, name: &str) -> bool {
        self.qualified_name == name || self.display_name.as_deref() == Some(name)
    }

    /// Marks this element as softly deleted.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementKind, ElementValidationError};

    #[test]
    fn kind_labels_roundtrip() {
        for kind in [
            ElementKind::GovernanceDomain,
            ElementKind::GovernanceRole,
            ElementKind::GovernanceMetric,
            ElementKind::SubjectArea,
            ElementKind::Person,
            ElementKind::Referenceable,
        ] {
            assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ElementKind::parse("glossary"), None);
    }

    #[test]
    fn referenceable_accepts_every_kind() {
        assert!(ElementKind::Referenceable.accepts(ElementKind::Person));
        assert!(ElementKind::Person.accepts(ElementKind::Person));
        assert!(!ElementKind::Person.accepts(ElementKind::GovernanceRole));
    }

    #[test]
    fn validate_rejects_blank_name_and_negative_domain() {
        let element = Element::new(ElementKind::SubjectArea, "  ");
        assert_eq!(
            element.validate(),
            Err(ElementValidationError::BlankQualifiedName)
        );

        let mut element = Element::new(ElementKind::SubjectArea, "SubjectArea:Finance");
        element.domain_identifier = -1;
        assert_eq!(
            element.validate(),
            Err(ElementValidationError::NegativeDomainIdentifier(-1))
        );
    }

    #[test]
    fn validate_rejects_malformed_property_keys() {
        let mut element = Element::new(ElementKind::Referenceable, "Asset:1");
        element
            .additional_properties
            .insert("has space".to_string(), "x".to_string());
        assert_eq!(
            element.validate(),
            Err(ElementValidationError::InvalidPropertyKey(
                "has space".to_string()
            ))
        );
    }

    #[test]
    fn set_extended_inserts_and_clears() {
        let mut element = Element::new(ElementKind::GovernanceRole, "Role:CDO");
        element.set_extended("title", Some("Chief Data Officer".to_string()));
        assert_eq!(element.extended("title"), Some("Chief Data Officer"));
        element.set_extended("title", None);
        assert_eq!(element.extended("title"), None);
    }
}
