use super::{paging, parse_guid, GovernanceProgramResource};
use crate::requests::{require_body, AppointmentRequestBody, NameRequestBody, UpdateRequestBody};
use crate::responses::{
    AppointeesResponse, ElementResponse, ElementsResponse, GuidResponse, IncumbentResponse,
    RelationshipGuidResponse, VoidResponse,
};
use governance_core::{GovernanceRoleProperties, GovernanceRoleService, PersonProperties};

impl GovernanceProgramResource {
    pub fn create_governance_role(
        &self,
        user_id: &str,
        body: Option<&GovernanceRoleProperties>,
    ) -> GuidResponse {
        self.run("create_governance_role", |repo, context| {
            let properties = require_body(body)?;
            GovernanceRoleService::new(repo, context).create_governance_role(user_id, properties)
        })
    }

    pub fn update_governance_role(
        &self,
        user_id: &str,
        role_guid: &str,
        body: Option<&UpdateRequestBody<GovernanceRoleProperties>>,
    ) -> VoidResponse {
        self.run("update_governance_role", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            let body = require_body(body)?;
            GovernanceRoleService::new(repo, context).update_governance_role(
                user_id,
                role_guid,
                &body.properties,
                body.is_merge_update,
            )
        })
    }

    pub fn delete_governance_role(&self, user_id: &str, role_guid: &str) -> VoidResponse {
        self.run("delete_governance_role", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            GovernanceRoleService::new(repo, context).delete_governance_role(user_id, role_guid)
        })
    }

    pub fn get_governance_role_by_guid(
        &self,
        user_id: &str,
        role_guid: &str,
    ) -> ElementResponse<GovernanceRoleProperties> {
        self.run("get_governance_role_by_guid", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            GovernanceRoleService::new(repo, context).get_governance_role_by_guid(user_id, role_guid)
        })
    }

    pub fn get_governance_roles_by_name(
        &self,
        user_id: &str,
        body: Option<&NameRequestBody>,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceRoleProperties> {
        self.run("get_governance_roles_by_name", |repo, context| {
            let body = require_body(body)?;
            GovernanceRoleService::new(repo, context).get_governance_roles_by_name(
                user_id,
                &body.name,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_governance_roles_by_domain(
        &self,
        user_id: &str,
        domain_identifier: i32,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceRoleProperties> {
        self.run("get_governance_roles_by_domain", |repo, context| {
            GovernanceRoleService::new(repo, context).get_governance_roles_by_domain(
                user_id,
                domain_identifier,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_governance_role_by_role_id(
        &self,
        user_id: &str,
        role_id: &str,
    ) -> ElementResponse<GovernanceRoleProperties> {
        self.run("get_governance_role_by_role_id", |repo, context| {
            GovernanceRoleService::new(repo, context).get_governance_role_by_role_id(user_id, role_id)
        })
    }

    pub fn create_person(&self, user_id: &str, body: Option<&PersonProperties>) -> GuidResponse {
        self.run("create_person", |repo, context| {
            let properties = require_body(body)?;
            GovernanceRoleService::new(repo, context).create_person(user_id, properties)
        })
    }

    pub fn get_person_by_guid(
        &self,
        user_id: &str,
        person_guid: &str,
    ) -> ElementResponse<PersonProperties> {
        self.run("get_person_by_guid", |repo, context| {
            let person_guid = parse_guid(person_guid, "personGUID")?;
            GovernanceRoleService::new(repo, context).get_person_by_guid(user_id, person_guid)
        })
    }

    /// Appoints a person; a missing body appoints from now, not public.
    pub fn appoint_governance_role(
        &self,
        user_id: &str,
        role_guid: &str,
        person_guid: &str,
        body: Option<&AppointmentRequestBody>,
    ) -> RelationshipGuidResponse {
        self.run("appoint_governance_role", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            let person_guid = parse_guid(person_guid, "personGUID")?;
            let body = body.cloned().unwrap_or_default();
            GovernanceRoleService::new(repo, context).appoint(
                user_id,
                role_guid,
                person_guid,
                body.effective_time,
                body.is_public,
            )
        })
    }

    pub fn relieve_governance_role(
        &self,
        user_id: &str,
        role_guid: &str,
        person_guid: &str,
        body: Option<&AppointmentRequestBody>,
    ) -> RelationshipGuidResponse {
        self.run("relieve_governance_role", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            let person_guid = parse_guid(person_guid, "personGUID")?;
            let effective_time = body.and_then(|body| body.effective_time);
            GovernanceRoleService::new(repo, context).relieve(
                user_id,
                role_guid,
                person_guid,
                effective_time,
            )
        })
    }

    pub fn get_appointees(
        &self,
        user_id: &str,
        role_guid: &str,
        effective_time: Option<i64>,
    ) -> AppointeesResponse {
        self.run("get_appointees", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            GovernanceRoleService::new(repo, context).get_appointees(
                user_id,
                role_guid,
                effective_time,
            )
        })
    }

    pub fn get_current_incumbent(&self, user_id: &str, role_guid: &str) -> IncumbentResponse {
        self.run("get_current_incumbent", |repo, context| {
            let role_guid = parse_guid(role_guid, "governanceRoleGUID")?;
            GovernanceRoleService::new(repo, context).get_current_incumbent(user_id, role_guid)
        })
    }
}
