use super::{paging, parse_guid, GovernanceProgramResource};
use crate::requests::{require_body, NameRequestBody, UpdateRequestBody};
use crate::responses::{ElementResponse, ElementsResponse, GovernanceResponse, GuidResponse, VoidResponse};
use governance_core::{SubjectAreaProperties, SubjectAreaService, TypedElement};

impl GovernanceProgramResource {
    pub fn create_subject_area(
        &self,
        user_id: &str,
        body: Option<&SubjectAreaProperties>,
    ) -> GuidResponse {
        self.run("create_subject_area", |repo, context| {
            let properties = require_body(body)?;
            SubjectAreaService::new(repo, context).create_subject_area(user_id, properties)
        })
    }

    pub fn update_subject_area(
        &self,
        user_id: &str,
        subject_area_guid: &str,
        body: Option<&UpdateRequestBody<SubjectAreaProperties>>,
    ) -> VoidResponse {
        self.run("update_subject_area", |repo, context| {
            let subject_area_guid = parse_guid(subject_area_guid, "subjectAreaGUID")?;
            let body = require_body(body)?;
            SubjectAreaService::new(repo, context).update_subject_area(
                user_id,
                subject_area_guid,
                &body.properties,
                body.is_merge_update,
            )
        })
    }

    pub fn delete_subject_area(&self, user_id: &str, subject_area_guid: &str) -> VoidResponse {
        self.run("delete_subject_area", |repo, context| {
            let subject_area_guid = parse_guid(subject_area_guid, "subjectAreaGUID")?;
            SubjectAreaService::new(repo, context).delete_subject_area(user_id, subject_area_guid)
        })
    }

    pub fn get_subject_area_by_guid(
        &self,
        user_id: &str,
        subject_area_guid: &str,
    ) -> ElementResponse<SubjectAreaProperties> {
        self.run("get_subject_area_by_guid", |repo, context| {
            let subject_area_guid = parse_guid(subject_area_guid, "subjectAreaGUID")?;
            SubjectAreaService::new(repo, context).get_subject_area_by_guid(user_id, subject_area_guid)
        })
    }

    pub fn get_subject_areas_by_name(
        &self,
        user_id: &str,
        body: Option<&NameRequestBody>,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<SubjectAreaProperties> {
        self.run("get_subject_areas_by_name", |repo, context| {
            let body = require_body(body)?;
            SubjectAreaService::new(repo, context).get_subject_areas_by_name(
                user_id,
                &body.name,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_subject_areas_by_domain(
        &self,
        user_id: &str,
        domain_identifier: i32,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<SubjectAreaProperties> {
        self.run("get_subject_areas_by_domain", |repo, context| {
            SubjectAreaService::new(repo, context).get_subject_areas_by_domain(
                user_id,
                domain_identifier,
                paging(start_from, page_size),
            )
        })
    }

    pub fn link_subject_areas_in_hierarchy(
        &self,
        user_id: &str,
        parent_guid: &str,
        child_guid: &str,
    ) -> VoidResponse {
        self.run("link_subject_areas_in_hierarchy", |repo, context| {
            let parent_guid = parse_guid(parent_guid, "parentSubjectAreaGUID")?;
            let child_guid = parse_guid(child_guid, "childSubjectAreaGUID")?;
            SubjectAreaService::new(repo, context).link_subject_areas_in_hierarchy(
                user_id,
                parent_guid,
                child_guid,
            )
        })
    }

    pub fn remove_subject_area_from_hierarchy(
        &self,
        user_id: &str,
        parent_guid: &str,
        child_guid: &str,
    ) -> VoidResponse {
        self.run("remove_subject_area_from_hierarchy", |repo, context| {
            let parent_guid = parse_guid(parent_guid, "parentSubjectAreaGUID")?;
            let child_guid = parse_guid(child_guid, "childSubjectAreaGUID")?;
            SubjectAreaService::new(repo, context).remove_subject_area_from_hierarchy(
                user_id,
                parent_guid,
                child_guid,
            )
        })
    }

    pub fn get_subject_area_children(
        &self,
        user_id: &str,
        parent_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<SubjectAreaProperties> {
        self.run("get_subject_area_children", |repo, context| {
            let parent_guid = parse_guid(parent_guid, "parentSubjectAreaGUID")?;
            SubjectAreaService::new(repo, context).get_subject_area_children(
                user_id,
                parent_guid,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_subject_area_parent(
        &self,
        user_id: &str,
        child_guid: &str,
    ) -> GovernanceResponse<Option<TypedElement<SubjectAreaProperties>>> {
        self.run("get_subject_area_parent", |repo, context| {
            let child_guid = parse_guid(child_guid, "childSubjectAreaGUID")?;
            SubjectAreaService::new(repo, context).get_subject_area_parent(user_id, child_guid)
        })
    }
}
