use super::{paging, parse_guid, GovernanceProgramResource};
use crate::requests::RelatedElementRequestBody;
use crate::responses::{RelatedElementsResponse, RelationshipGuidResponse, VoidResponse};
use governance_core::{
    ElementId, GovernanceResult, Paging, RelatedElementService, RelatedElementSummary,
    RelationshipId, RelationshipProperties, SqliteMetadataRepository,
};

type Service<'conn> = RelatedElementService<SqliteMetadataRepository<'conn>>;

/// Path parameter names of one link type, end1 then end2.
struct LinkParameters(&'static str, &'static str);

const STAKEHOLDER: LinkParameters = LinkParameters("elementGUID", "stakeholderGUID");
const ASSIGNMENT_SCOPE: LinkParameters = LinkParameters("elementGUID", "scopeGUID");
const RESOURCE_LIST: LinkParameters = LinkParameters("elementGUID", "resourceGUID");
const GOVERNED_BY: LinkParameters = LinkParameters("governanceDefinitionGUID", "elementGUID");
const MORE_INFORMATION: LinkParameters = LinkParameters("elementGUID", "detailGUID");

impl GovernanceProgramResource {
    pub fn setup_stakeholder(
        &self,
        user_id: &str,
        element_guid: &str,
        stakeholder_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.setup_link(
            "setup_stakeholder",
            &STAKEHOLDER,
            |service, user_id, end1, end2, properties| {
                service.setup_stakeholder(user_id, end1, end2, properties)
            },
            user_id,
            element_guid,
            stakeholder_guid,
            body,
        )
    }

    pub fn clear_stakeholder(
        &self,
        user_id: &str,
        element_guid: &str,
        stakeholder_guid: &str,
    ) -> VoidResponse {
        self.clear_link(
            "clear_stakeholder",
            &STAKEHOLDER,
            |service, user_id, end1, end2| service.clear_stakeholder(user_id, end1, end2),
            user_id,
            element_guid,
            stakeholder_guid,
        )
    }

    pub fn get_stakeholders(
        &self,
        user_id: &str,
        element_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_stakeholders",
            STAKEHOLDER.0,
            |service, user_id, anchor, paging| {
                service.get_stakeholders(user_id, anchor, paging)
            },
            user_id,
            element_guid,
            paging(start_from, page_size),
        )
    }

    pub fn get_stakeholder_commissioned_elements(
        &self,
        user_id: &str,
        stakeholder_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_stakeholder_commissioned_elements",
            STAKEHOLDER.1,
            |service, user_id, anchor, paging| {
                service.get_stakeholder_commissioned_elements(user_id, anchor, paging)
            },
            user_id,
            stakeholder_guid,
            paging(start_from, page_size),
        )
    }

    pub fn setup_assignment_scope(
        &self,
        user_id: &str,
        element_guid: &str,
        scope_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.setup_link(
            "setup_assignment_scope",
            &ASSIGNMENT_SCOPE,
            |service, user_id, end1, end2, properties| {
                service.setup_assignment_scope(user_id, end1, end2, properties)
            },
            user_id,
            element_guid,
            scope_guid,
            body,
        )
    }

    pub fn clear_assignment_scope(
        &self,
        user_id: &str,
        element_guid: &str,
        scope_guid: &str,
    ) -> VoidResponse {
        self.clear_link(
            "clear_assignment_scope",
            &ASSIGNMENT_SCOPE,
            |service, user_id, end1, end2| service.clear_assignment_scope(user_id, end1, end2),
            user_id,
            element_guid,
            scope_guid,
        )
    }

    pub fn get_assigned_scopes(
        &self,
        user_id: &str,
        element_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_assigned_scopes",
            ASSIGNMENT_SCOPE.0,
            |service, user_id, anchor, paging| {
                service.get_assigned_scopes(user_id, anchor, paging)
            },
            user_id,
            element_guid,
            paging(start_from, page_size),
        )
    }

    pub fn get_assigned_actors(
        &self,
        user_id: &str,
        scope_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_assigned_actors",
            ASSIGNMENT_SCOPE.1,
            |service, user_id, anchor, paging| {
                service.get_assigned_actors(user_id, anchor, paging)
            },
            user_id,
            scope_guid,
            paging(start_from, page_size),
        )
    }

    pub fn setup_resource(
        &self,
        user_id: &str,
        element_guid: &str,
        resource_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.setup_link(
            "setup_resource",
            &RESOURCE_LIST,
            |service, user_id, end1, end2, properties| {
                service.setup_resource(user_id, end1, end2, properties)
            },
            user_id,
            element_guid,
            resource_guid,
            body,
        )
    }

    pub fn clear_resource(
        &self,
        user_id: &str,
        element_guid: &str,
        resource_guid: &str,
    ) -> VoidResponse {
        self.clear_link(
            "clear_resource",
            &RESOURCE_LIST,
            |service, user_id, end1, end2| service.clear_resource(user_id, end1, end2),
            user_id,
            element_guid,
            resource_guid,
        )
    }

    pub fn get_resource_list(
        &self,
        user_id: &str,
        element_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_resource_list",
            RESOURCE_LIST.0,
            |service, user_id, anchor, paging| {
                service.get_resource_list(user_id, anchor, paging)
            },
            user_id,
            element_guid,
            paging(start_from, page_size),
        )
    }

    pub fn get_supported_by_resource(
        &self,
        user_id: &str,
        resource_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_supported_by_resource",
            RESOURCE_LIST.1,
            |service, user_id, anchor, paging| {
                service.get_supported_by_resource(user_id, anchor, paging)
            },
            user_id,
            resource_guid,
            paging(start_from, page_size),
        )
    }

    pub fn setup_governed_by(
        &self,
        user_id: &str,
        definition_guid: &str,
        element_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.setup_link(
            "setup_governed_by",
            &GOVERNED_BY,
            |service, user_id, end1, end2, properties| {
                service.setup_governed_by(user_id, end1, end2, properties)
            },
            user_id,
            definition_guid,
            element_guid,
            body,
        )
    }

    pub fn clear_governed_by(
        &self,
        user_id: &str,
        definition_guid: &str,
        element_guid: &str,
    ) -> VoidResponse {
        self.clear_link(
            "clear_governed_by",
            &GOVERNED_BY,
            |service, user_id, end1, end2| service.clear_governed_by(user_id, end1, end2),
            user_id,
            definition_guid,
            element_guid,
        )
    }

    pub fn get_governed_by_definitions(
        &self,
        user_id: &str,
        element_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_governed_by_definitions",
            GOVERNED_BY.1,
            |service, user_id, anchor, paging| {
                service.get_governed_by_definitions(user_id, anchor, paging)
            },
            user_id,
            element_guid,
            paging(start_from, page_size),
        )
    }

    pub fn get_governed_elements(
        &self,
        user_id: &str,
        definition_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_governed_elements",
            GOVERNED_BY.0,
            |service, user_id, anchor, paging| {
                service.get_governed_elements(user_id, anchor, paging)
            },
            user_id,
            definition_guid,
            paging(start_from, page_size),
        )
    }

    pub fn setup_more_information(
        &self,
        user_id: &str,
        element_guid: &str,
        detail_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.setup_link(
            "setup_more_information",
            &MORE_INFORMATION,
            |service, user_id, end1, end2, properties| {
                service.setup_more_information(user_id, end1, end2, properties)
            },
            user_id,
            element_guid,
            detail_guid,
            body,
        )
    }

    pub fn clear_more_information(
        &self,
        user_id: &str,
        element_guid: &str,
        detail_guid: &str,
    ) -> VoidResponse {
        self.clear_link(
            "clear_more_information",
            &MORE_INFORMATION,
            |service, user_id, end1, end2| service.clear_more_information(user_id, end1, end2),
            user_id,
            element_guid,
            detail_guid,
        )
    }

    pub fn get_more_information(
        &self,
        user_id: &str,
        element_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_more_information",
            MORE_INFORMATION.0,
            |service, user_id, anchor, paging| {
                service.get_more_information(user_id, anchor, paging)
            },
            user_id,
            element_guid,
            paging(start_from, page_size),
        )
    }

    pub fn get_descriptive_elements(
        &self,
        user_id: &str,
        detail_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> RelatedElementsResponse {
        self.lookup(
            "get_descriptive_elements",
            MORE_INFORMATION.1,
            |service, user_id, anchor, paging| {
                service.get_descriptive_elements(user_id, anchor, paging)
            },
            user_id,
            detail_guid,
            paging(start_from, page_size),
        )
    }

    /// Replaces window and attributes of an existing related-element link.
    pub fn update_related_element_link(
        &self,
        user_id: &str,
        relationship_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> VoidResponse {
        self.run("update_related_element_link", |repo, context| {
            let relationship_guid = parse_guid(relationship_guid, "relationshipGUID")?;
            let body = crate::requests::require_body(body)?;
            RelatedElementService::new(repo, context).update_related_element_link(
                user_id,
                relationship_guid,
                &body.to_relationship_properties(),
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn setup_link(
        &self,
        operation: &str,
        parameters: &LinkParameters,
        setup: impl FnOnce(
            &Service<'_>,
            &str,
            ElementId,
            ElementId,
            &RelationshipProperties,
        ) -> GovernanceResult<RelationshipId>,
        user_id: &str,
        end1_guid: &str,
        end2_guid: &str,
        body: Option<&RelatedElementRequestBody>,
    ) -> RelationshipGuidResponse {
        self.run(operation, |repo, context| {
            let end1 = parse_guid(end1_guid, parameters.0)?;
            let end2 = parse_guid(end2_guid, parameters.1)?;
            let properties = body
                .map(RelatedElementRequestBody::to_relationship_properties)
                .unwrap_or_default();
            setup(
                &RelatedElementService::new(repo, context),
                user_id,
                end1,
                end2,
                &properties,
            )
        })
    }

    fn clear_link(
        &self,
        operation: &str,
        parameters: &LinkParameters,
        clear: impl FnOnce(&Service<'_>, &str, ElementId, ElementId) -> GovernanceResult<()>,
        user_id: &str,
        end1_guid: &str,
        end2_guid: &str,
    ) -> VoidResponse {
        self.run(operation, |repo, context| {
            let end1 = parse_guid(end1_guid, parameters.0)?;
            let end2 = parse_guid(end2_guid, parameters.1)?;
            clear(&RelatedElementService::new(repo, context), user_id, end1, end2)
        })
    }

    fn lookup(
        &self,
        operation: &str,
        parameter: &str,
        lookup: impl FnOnce(
            &Service<'_>,
            &str,
            ElementId,
            Paging,
        ) -> GovernanceResult<Vec<RelatedElementSummary>>,
        user_id: &str,
        anchor_guid: &str,
        paging: Paging,
    ) -> RelatedElementsResponse {
        self.run(operation, |repo, context| {
            let anchor = parse_guid(anchor_guid, parameter)?;
            lookup(&RelatedElementService::new(repo, context), user_id, anchor, paging)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::requests::RelatedElementRequestBody;
    use crate::resource::test_support::{resource, USER};
    use governance_core::{
        GovernanceDomainProperties, GovernanceRoleProperties, ReferenceableProperties,
    };
    use std::collections::BTreeMap;

    #[test]
    fn stakeholder_links_are_listed_from_both_ends() {
        let (_dir, _clock, resource) = resource(1_000);
        let domain = resource
            .create_governance_domain(
                USER,
                Some(&GovernanceDomainProperties {
                    base: ReferenceableProperties::named("Domain:Privacy"),
                }),
            )
            .result
            .unwrap()
            .to_string();
        let role = resource
            .create_governance_role(
                USER,
                Some(&GovernanceRoleProperties {
                    base: ReferenceableProperties::named("Role:DataProtectionOfficer"),
                    ..GovernanceRoleProperties::default()
                }),
            )
            .result
            .unwrap()
            .to_string();

        let body = RelatedElementRequestBody {
            effective_from: Some(500),
            effective_to: None,
            properties: BTreeMap::from([("stakeholder_role".to_string(), "sponsor".to_string())]),
        };
        let linked = resource.setup_stakeholder(USER, &domain, &role, Some(&body));
        assert!(linked.is_success(), "{:?}", linked.exception);

        let stakeholders = resource.get_stakeholders(USER, &domain, 0, 0).result.unwrap();
        assert_eq!(stakeholders.len(), 1);
        assert_eq!(stakeholders[0].element.guid.to_string(), role);
        assert_eq!(
            stakeholders[0].attributes.get("stakeholder_role").map(String::as_str),
            Some("sponsor")
        );

        let commissioned = resource
            .get_stakeholder_commissioned_elements(USER, &role, 0, 0)
            .result
            .unwrap();
        assert_eq!(commissioned[0].element.guid.to_string(), domain);

        assert!(resource.clear_stakeholder(USER, &domain, &role).is_success());
        assert!(resource
            .get_stakeholders(USER, &domain, 0, 0)
            .result
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_attribute_and_reversed_window_are_rejected() {
        let (_dir, _clock, resource) = resource(1_000);
        let domain = resource
            .create_governance_domain(
                USER,
                Some(&GovernanceDomainProperties {
                    base: ReferenceableProperties::named("Domain:Security"),
                }),
            )
            .result
            .unwrap()
            .to_string();
        let detail = resource
            .create_governance_domain(
                USER,
                Some(&GovernanceDomainProperties {
                    base: ReferenceableProperties::named("Domain:SecurityDetail"),
                }),
            )
            .result
            .unwrap()
            .to_string();

        let reversed = RelatedElementRequestBody {
            effective_from: Some(2_000),
            effective_to: Some(1_000),
            ..RelatedElementRequestBody::default()
        };
        let response = resource.setup_more_information(USER, &domain, &detail, Some(&reversed));
        assert_eq!(response.related_http_code, 400);

        let unknown = RelatedElementRequestBody {
            properties: BTreeMap::from([("colour".to_string(), "blue".to_string())]),
            ..RelatedElementRequestBody::default()
        };
        let response = resource.setup_more_information(USER, &domain, &detail, Some(&unknown));
        assert_eq!(response.related_http_code, 400);
    }
}
