//! Generic "related element" links between governance and other elements.
//!
//! # Responsibility
//! - Set up, clear and list stakeholder, assignment scope, resource list,
//!   governed-by and more-information links.
//!
//! End conventions (end1 -> end2):
//! - stakeholder: commissioned element -> stakeholder
//! - assignment scope: assigned actor -> scope element
//! - resource list: anchor element -> resource
//! - governed by: governance definition -> governed element
//! - more information: described element -> descriptive element

use crate::model::element::{ElementId, ElementKind};
use crate::model::governance::{ReferenceableProperties, TypedElement};
use crate::model::relationship::{
    RelatedElement, RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
};
use crate::repo::MetadataRepository;
use crate::service::error::GovernanceResult;
use crate::service::handler::{ElementHandler, Paging, ServiceContext};
use serde::Serialize;
use std::collections::BTreeMap;

/// Link kinds managed by this service.
const RELATED_ELEMENT_KINDS: [RelationshipKind; 5] = [
    RelationshipKind::Stakeholder,
    RelationshipKind::AssignmentScope,
    RelationshipKind::ResourceList,
    RelationshipKind::GovernedBy,
    RelationshipKind::MoreInformation,
];

/// Header of an element reached through a related-element link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedElementSummary {
    pub relationship_guid: RelationshipId,
    pub effective_from: Option<i64>,
    pub effective_to: Option<i64>,
    pub attributes: BTreeMap<String, String>,
    pub element_kind: ElementKind,
    pub element: TypedElement<ReferenceableProperties>,
}

impl From<RelatedElement> for RelatedElementSummary {
    fn from(value: RelatedElement) -> Self {
        let RelatedElement {
            relationship,
            element,
        } = value;
        Self {
            relationship_guid: relationship.guid,
            effective_from: relationship.properties.effective_from,
            effective_to: relationship.properties.effective_to,
            attributes: relationship.properties.attributes,
            element_kind: element.kind,
            element: TypedElement::from_element(&element),
        }
    }
}

/// Related element service facade.
pub struct RelatedElementService<R: MetadataRepository> {
    handler: ElementHandler<R>,
}

impl<R: MetadataRepository> RelatedElementService<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self {
            handler: ElementHandler::new(repo, context),
        }
    }

    pub fn setup_stakeholder(
        &self,
        user_id: &str,
        element_guid: ElementId,
        stakeholder_guid: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.link(
            user_id,
            RelationshipKind::Stakeholder,
            element_guid,
            stakeholder_guid,
            properties,
        )
    }

    pub fn clear_stakeholder(
        &self,
        user_id: &str,
        element_guid: ElementId,
        stakeholder_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::Stakeholder,
            element_guid,
            stakeholder_guid,
        )
    }

    pub fn get_stakeholders(
        &self,
        user_id: &str,
        element_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            element_guid,
            RelationshipKind::Stakeholder,
            RelationshipEnd::End1,
            paging,
        )
    }

    pub fn get_stakeholder_commissioned_elements(
        &self,
        user_id: &str,
        stakeholder_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            stakeholder_guid,
            RelationshipKind::Stakeholder,
            RelationshipEnd::End2,
            paging,
        )
    }

    pub fn setup_assignment_scope(
        &self,
        user_id: &str,
        actor_guid: ElementId,
        scope_guid: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.link(
            user_id,
            RelationshipKind::AssignmentScope,
            actor_guid,
            scope_guid,
            properties,
        )
    }

    pub fn clear_assignment_scope(
        &self,
        user_id: &str,
        actor_guid: ElementId,
        scope_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::AssignmentScope,
            actor_guid,
            scope_guid,
        )
    }

    pub fn get_assigned_scopes(
        &self,
        user_id: &str,
        actor_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            actor_guid,
            RelationshipKind::AssignmentScope,
            RelationshipEnd::End1,
            paging,
        )
    }

    pub fn get_assigned_actors(
        &self,
        user_id: &str,
        scope_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            scope_guid,
            RelationshipKind::AssignmentScope,
            RelationshipEnd::End2,
            paging,
        )
    }

    pub fn setup_resource(
        &self,
        user_id: &str,
        element_guid: ElementId,
        resource_guid: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.link(
            user_id,
            RelationshipKind::ResourceList,
            element_guid,
            resource_guid,
            properties,
        )
    }

    pub fn clear_resource(
        &self,
        user_id: &str,
        element_guid: ElementId,
        resource_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::ResourceList,
            element_guid,
            resource_guid,
        )
    }

    pub fn get_resource_list(
        &self,
        user_id: &str,
        element_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            element_guid,
            RelationshipKind::ResourceList,
            RelationshipEnd::End1,
            paging,
        )
    }

    pub fn get_supported_by_resource(
        &self,
        user_id: &str,
        resource_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            resource_guid,
            RelationshipKind::ResourceList,
            RelationshipEnd::End2,
            paging,
        )
    }

    pub fn setup_governed_by(
        &self,
        user_id: &str,
        definition_guid: ElementId,
        element_guid: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.link(
            user_id,
            RelationshipKind::GovernedBy,
            definition_guid,
            element_guid,
            properties,
        )
    }

    pub fn clear_governed_by(
        &self,
        user_id: &str,
        definition_guid: ElementId,
        element_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::GovernedBy,
            definition_guid,
            element_guid,
        )
    }

    /// Definitions governing `element_guid`.
    pub fn get_governed_by_definitions(
        &self,
        user_id: &str,
        element_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            element_guid,
            RelationshipKind::GovernedBy,
            RelationshipEnd::End2,
            paging,
        )
    }

    pub fn get_governed_elements(
        &self,
        user_id: &str,
        definition_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            definition_guid,
            RelationshipKind::GovernedBy,
            RelationshipEnd::End1,
            paging,
        )
    }

    pub fn setup_more_information(
        &self,
        user_id: &str,
        element_guid: ElementId,
        descriptor_guid: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.link(
            user_id,
            RelationshipKind::MoreInformation,
            element_guid,
            descriptor_guid,
            properties,
        )
    }

    pub fn clear_more_information(
        &self,
        user_id: &str,
        element_guid: ElementId,
        descriptor_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::MoreInformation,
            element_guid,
            descriptor_guid,
        )
    }

    pub fn get_more_information(
        &self,
        user_id: &str,
        element_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            element_guid,
            RelationshipKind::MoreInformation,
            RelationshipEnd::End1,
            paging,
        )
    }

    pub fn get_descriptive_elements(
        &self,
        user_id: &str,
        descriptor_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        self.list(
            user_id,
            descriptor_guid,
            RelationshipKind::MoreInformation,
            RelationshipEnd::End2,
            paging,
        )
    }

    /// Replaces window and attributes of a related-element link.
    ///
    /// Appointments and subject area hierarchy links are rejected; they change
    /// only through their own protocols.
    pub fn update_related_element_link(
        &self,
        user_id: &str,
        relationship_guid: RelationshipId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<()> {
        self.handler
            .update_link(user_id, relationship_guid, &RELATED_ELEMENT_KINDS, properties)
    }

    fn list(
        &self,
        user_id: &str,
        anchor: ElementId,
        kind: RelationshipKind,
        from: RelationshipEnd,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElementSummary>> {
        Ok(self
            .handler
            .related(user_id, anchor, kind, from, paging)?
            .into_iter()
            .map(RelatedElementSummary::from)
            .collect())
    }
}
