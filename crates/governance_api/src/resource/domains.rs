use super::{paging, parse_guid, GovernanceProgramResource};
use crate::requests::{require_body, NameRequestBody, UpdateRequestBody};
use crate::responses::{ElementResponse, ElementsResponse, GuidResponse, VoidResponse};
use governance_core::{GovernanceDomainProperties, GovernanceDomainService};

impl GovernanceProgramResource {
    pub fn create_governance_domain(
        &self,
        user_id: &str,
        body: Option<&GovernanceDomainProperties>,
    ) -> GuidResponse {
        self.run("create_governance_domain", |repo, context| {
            let properties = require_body(body)?;
            GovernanceDomainService::new(repo, context).create_governance_domain(user_id, properties)
        })
    }

    pub fn update_governance_domain(
        &self,
        user_id: &str,
        domain_guid: &str,
        body: Option<&UpdateRequestBody<GovernanceDomainProperties>>,
    ) -> VoidResponse {
        self.run("update_governance_domain", |repo, context| {
            let domain_guid = parse_guid(domain_guid, "governanceDomainGUID")?;
            let body = require_body(body)?;
            GovernanceDomainService::new(repo, context).update_governance_domain(
                user_id,
                domain_guid,
                &body.properties,
                body.is_merge_update,
            )
        })
    }

    pub fn delete_governance_domain(&self, user_id: &str, domain_guid: &str) -> VoidResponse {
        self.run("delete_governance_domain", |repo, context| {
            let domain_guid = parse_guid(domain_guid, "governanceDomainGUID")?;
            GovernanceDomainService::new(repo, context).delete_governance_domain(user_id, domain_guid)
        })
    }

    pub fn get_governance_domain_by_guid(
        &self,
        user_id: &str,
        domain_guid: &str,
    ) -> ElementResponse<GovernanceDomainProperties> {
        self.run("get_governance_domain_by_guid", |repo, context| {
            let domain_guid = parse_guid(domain_guid, "governanceDomainGUID")?;
            GovernanceDomainService::new(repo, context)
                .get_governance_domain_by_guid(user_id, domain_guid)
        })
    }

    pub fn get_governance_domains_by_name(
        &self,
        user_id: &str,
        body: Option<&NameRequestBody>,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceDomainProperties> {
        self.run("get_governance_domains_by_name", |repo, context| {
            let body = require_body(body)?;
            GovernanceDomainService::new(repo, context).get_governance_domains_by_name(
                user_id,
                &body.name,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_governance_domains(
        &self,
        user_id: &str,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceDomainProperties> {
        self.run("get_governance_domains", |repo, context| {
            GovernanceDomainService::new(repo, context)
                .get_governance_domains(user_id, paging(start_from, page_size))
        })
    }

    pub fn get_governance_domain_by_identifier(
        &self,
        user_id: &str,
        domain_identifier: i32,
    ) -> ElementsResponse<GovernanceDomainProperties> {
        self.run("get_governance_domain_by_identifier", |repo, context| {
            GovernanceDomainService::new(repo, context)
                .get_governance_domain_by_identifier(user_id, domain_identifier)
        })
    }

    pub fn add_domain_to_domain_set(
        &self,
        user_id: &str,
        domain_set_guid: &str,
        domain_guid: &str,
    ) -> VoidResponse {
        self.run("add_domain_to_domain_set", |repo, context| {
            let domain_set_guid = parse_guid(domain_set_guid, "domainSetGUID")?;
            let domain_guid = parse_guid(domain_guid, "governanceDomainGUID")?;
            GovernanceDomainService::new(repo, context).add_domain_to_domain_set(
                user_id,
                domain_set_guid,
                domain_guid,
            )
        })
    }

    pub fn remove_domain_from_domain_set(
        &self,
        user_id: &str,
        domain_set_guid: &str,
        domain_guid: &str,
    ) -> VoidResponse {
        self.run("remove_domain_from_domain_set", |repo, context| {
            let domain_set_guid = parse_guid(domain_set_guid, "domainSetGUID")?;
            let domain_guid = parse_guid(domain_guid, "governanceDomainGUID")?;
            GovernanceDomainService::new(repo, context).remove_domain_from_domain_set(
                user_id,
                domain_set_guid,
                domain_guid,
            )
        })
    }

    pub fn get_governance_domains_in_set(
        &self,
        user_id: &str,
        domain_set_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceDomainProperties> {
        self.run("get_governance_domains_in_set", |repo, context| {
            let domain_set_guid = parse_guid(domain_set_guid, "domainSetGUID")?;
            GovernanceDomainService::new(repo, context).get_governance_domains_in_set(
                user_id,
                domain_set_guid,
                paging(start_from, page_size),
            )
        })
    }
}
