//! Governance metric use-case service.
//!
//! # Responsibility
//! - CRUD over governance metrics.
//! - Attach metrics to the governance definitions they measure.

use crate::model::element::{ElementId, ElementKind};
use crate::model::governance::{GovernanceMetricProperties, TypedElement};
use crate::model::relationship::{
    RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
};
use crate::repo::MetadataRepository;
use crate::service::error::GovernanceResult;
use crate::service::handler::{ElementHandler, Paging, ServiceContext};
use serde::Serialize;

const RATIONALE: &str = "rationale";

pub type GovernanceMetricElement = TypedElement<GovernanceMetricProperties>;

/// A metric attached to a governance definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionMetric {
    pub relationship_guid: RelationshipId,
    pub rationale: Option<String>,
    pub metric: GovernanceMetricElement,
}

/// Governance metric service facade.
pub struct GovernanceMetricService<R: MetadataRepository> {
    handler: ElementHandler<R>,
}

impl<R: MetadataRepository> GovernanceMetricService<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self {
            handler: ElementHandler::new(repo, context),
        }
    }

    pub fn create_governance_metric(
        &self,
        user_id: &str,
        properties: &GovernanceMetricProperties,
    ) -> GovernanceResult<ElementId> {
        self.handler.create(user_id, properties)
    }

    pub fn update_governance_metric(
        &self,
        user_id: &str,
        metric_guid: ElementId,
        properties: &GovernanceMetricProperties,
        is_merge_update: bool,
    ) -> GovernanceResult<()> {
        self.handler
            .update(user_id, metric_guid, properties, is_merge_update)
    }

    pub fn delete_governance_metric(
        &self,
        user_id: &str,
        metric_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler
            .delete(user_id, metric_guid, ElementKind::GovernanceMetric)
    }

    pub fn get_governance_metric_by_guid(
        &self,
        user_id: &str,
        metric_guid: ElementId,
    ) -> GovernanceResult<GovernanceMetricElement> {
        self.handler.get(user_id, metric_guid)
    }

    pub fn get_governance_metrics_by_name(
        &self,
        user_id: &str,
        name: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceMetricElement>> {
        self.handler.find_by_name(user_id, name, paging)
    }

    pub fn get_governance_metrics(
        &self,
        user_id: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceMetricElement>> {
        self.handler.list(user_id, None, paging)
    }

    /// Records that `metric_guid` measures `definition_guid`.
    pub fn setup_governance_definition_metric(
        &self,
        user_id: &str,
        metric_guid: ElementId,
        definition_guid: ElementId,
        rationale: Option<String>,
    ) -> GovernanceResult<RelationshipId> {
        let mut properties = RelationshipProperties::new();
        if let Some(rationale) = rationale {
            properties = properties.with_attribute(RATIONALE, rationale);
        }
        self.handler.link(
            user_id,
            RelationshipKind::GovernanceDefinitionMetric,
            metric_guid,
            definition_guid,
            &properties,
        )
    }

    pub fn clear_governance_definition_metric(
        &self,
        user_id: &str,
        metric_guid: ElementId,
        definition_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::GovernanceDefinitionMetric,
            metric_guid,
            definition_guid,
        )
    }

    /// Metrics measuring `definition_guid`, in link order.
    pub fn get_metrics_for_definition(
        &self,
        user_id: &str,
        definition_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<DefinitionMetric>> {
        let related = self.handler.related(
            user_id,
            definition_guid,
            RelationshipKind::GovernanceDefinitionMetric,
            RelationshipEnd::End2,
            paging,
        )?;
        Ok(related
            .into_iter()
            .map(|item| DefinitionMetric {
                relationship_guid: item.relationship.guid,
                rationale: item
                    .relationship
                    .properties
                    .attribute(RATIONALE)
                    .map(str::to_string),
                metric: TypedElement::from_element(&item.element),
            })
            .collect())
    }
}
