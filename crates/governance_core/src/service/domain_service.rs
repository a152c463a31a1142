//! Governance domain use-case service.
//!
//! # Responsibility
//! - CRUD over governance domains.
//! - Maintain domain set membership.

use crate::model::element::{ElementId, ElementKind};
use crate::model::governance::{GovernanceDomainProperties, TypedElement};
use crate::model::relationship::{RelationshipEnd, RelationshipKind, RelationshipProperties};
use crate::repo::MetadataRepository;
use crate::service::error::GovernanceResult;
use crate::service::handler::{ElementHandler, Paging, ServiceContext, MAX_PAGE_SIZE};

pub type GovernanceDomainElement = TypedElement<GovernanceDomainProperties>;

/// Governance domain service facade.
pub struct GovernanceDomainService<R: MetadataRepository> {
    handler: ElementHandler<R>,
}

impl<R: MetadataRepository> GovernanceDomainService<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self {
            handler: ElementHandler::new(repo, context),
        }
    }

    pub fn create_governance_domain(
        &self,
        user_id: &str,
        properties: &GovernanceDomainProperties,
    ) -> GovernanceResult<ElementId> {
        self.handler.create(user_id, properties)
    }

    pub fn update_governance_domain(
        &self,
        user_id: &str,
        domain_guid: ElementId,
        properties: &GovernanceDomainProperties,
        is_merge_update: bool,
    ) -> GovernanceResult<()> {
        self.handler
            .update(user_id, domain_guid, properties, is_merge_update)
    }

    pub fn delete_governance_domain(
        &self,
        user_id: &str,
        domain_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler
            .delete(user_id, domain_guid, ElementKind::GovernanceDomain)
    }

    pub fn get_governance_domain_by_guid(
        &self,
        user_id: &str,
        domain_guid: ElementId,
    ) -> GovernanceResult<GovernanceDomainElement> {
        self.handler.get(user_id, domain_guid)
    }

    pub fn get_governance_domains_by_name(
        &self,
        user_id: &str,
        name: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceDomainElement>> {
        self.handler.find_by_name(user_id, name, paging)
    }

    pub fn get_governance_domains(
        &self,
        user_id: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceDomainElement>> {
        self.handler.list(user_id, None, paging)
    }

    /// Domains carrying `domain_identifier`; `0` matches only the catch-all domain.
    pub fn get_governance_domain_by_identifier(
        &self,
        user_id: &str,
        domain_identifier: i32,
    ) -> GovernanceResult<Vec<GovernanceDomainElement>> {
        let domains: Vec<GovernanceDomainElement> = self.handler.list(
            user_id,
            Some(domain_identifier),
            Paging::new(0, MAX_PAGE_SIZE),
        )?;
        Ok(domains
            .into_iter()
            .filter(|domain| domain.properties.base.domain_identifier == Some(domain_identifier))
            .collect())
    }

    pub fn add_domain_to_domain_set(
        &self,
        user_id: &str,
        domain_set_guid: ElementId,
        domain_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler
            .link(
                user_id,
                RelationshipKind::GovernanceDomainSetMember,
                domain_set_guid,
                domain_guid,
                &RelationshipProperties::new(),
            )
            .map(|_| ())
    }

    pub fn remove_domain_from_domain_set(
        &self,
        user_id: &str,
        domain_set_guid: ElementId,
        domain_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::GovernanceDomainSetMember,
            domain_set_guid,
            domain_guid,
        )
    }

    pub fn get_governance_domains_in_set(
        &self,
        user_id: &str,
        domain_set_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceDomainElement>> {
        let related = self.handler.related(
            user_id,
            domain_set_guid,
            RelationshipKind::GovernanceDomainSetMember,
            RelationshipEnd::End1,
            paging,
        )?;
        Ok(related
            .iter()
            .map(|item| TypedElement::from_element(&item.element))
            .collect())
    }
}
