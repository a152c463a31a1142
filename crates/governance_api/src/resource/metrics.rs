use super::{paging, parse_guid, GovernanceProgramResource};
use crate::requests::{require_body, MetricLinkRequestBody, NameRequestBody, UpdateRequestBody};
use crate::responses::{
    ElementResponse, ElementsResponse, GuidResponse, MetricsResponse, RelationshipGuidResponse,
    VoidResponse,
};
use governance_core::{GovernanceMetricProperties, GovernanceMetricService};

impl GovernanceProgramResource {
    pub fn create_governance_metric(
        &self,
        user_id: &str,
        body: Option<&GovernanceMetricProperties>,
    ) -> GuidResponse {
        self.run("create_governance_metric", |repo, context| {
            let properties = require_body(body)?;
            GovernanceMetricService::new(repo, context).create_governance_metric(user_id, properties)
        })
    }

    pub fn update_governance_metric(
        &self,
        user_id: &str,
        metric_guid: &str,
        body: Option<&UpdateRequestBody<GovernanceMetricProperties>>,
    ) -> VoidResponse {
        self.run("update_governance_metric", |repo, context| {
            let metric_guid = parse_guid(metric_guid, "metricGUID")?;
            let body = require_body(body)?;
            GovernanceMetricService::new(repo, context).update_governance_metric(
                user_id,
                metric_guid,
                &body.properties,
                body.is_merge_update,
            )
        })
    }

    pub fn delete_governance_metric(&self, user_id: &str, metric_guid: &str) -> VoidResponse {
        self.run("delete_governance_metric", |repo, context| {
            let metric_guid = parse_guid(metric_guid, "metricGUID")?;
            GovernanceMetricService::new(repo, context).delete_governance_metric(user_id, metric_guid)
        })
    }

    pub fn get_governance_metric_by_guid(
        &self,
        user_id: &str,
        metric_guid: &str,
    ) -> ElementResponse<GovernanceMetricProperties> {
        self.run("get_governance_metric_by_guid", |repo, context| {
            let metric_guid = parse_guid(metric_guid, "metricGUID")?;
            GovernanceMetricService::new(repo, context)
                .get_governance_metric_by_guid(user_id, metric_guid)
        })
    }

    pub fn get_governance_metrics_by_name(
        &self,
        user_id: &str,
        body: Option<&NameRequestBody>,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceMetricProperties> {
        self.run("get_governance_metrics_by_name", |repo, context| {
            let body = require_body(body)?;
            GovernanceMetricService::new(repo, context).get_governance_metrics_by_name(
                user_id,
                &body.name,
                paging(start_from, page_size),
            )
        })
    }

    pub fn get_governance_metrics(
        &self,
        user_id: &str,
        start_from: u32,
        page_size: u32,
    ) -> ElementsResponse<GovernanceMetricProperties> {
        self.run("get_governance_metrics", |repo, context| {
            GovernanceMetricService::new(repo, context)
                .get_governance_metrics(user_id, paging(start_from, page_size))
        })
    }

    pub fn setup_governance_definition_metric(
        &self,
        user_id: &str,
        metric_guid: &str,
        definition_guid: &str,
        body: Option<&MetricLinkRequestBody>,
    ) -> RelationshipGuidResponse {
        self.run("setup_governance_definition_metric", |repo, context| {
            let metric_guid = parse_guid(metric_guid, "metricGUID")?;
            let definition_guid = parse_guid(definition_guid, "governanceDefinitionGUID")?;
            let rationale = body.and_then(|body| body.rationale.clone());
            GovernanceMetricService::new(repo, context).setup_governance_definition_metric(
                user_id,
                metric_guid,
                definition_guid,
                rationale,
            )
        })
    }

    pub fn clear_governance_definition_metric(
        &self,
        user_id: &str,
        metric_guid: &str,
        definition_guid: &str,
    ) -> VoidResponse {
        self.run("clear_governance_definition_metric", |repo, context| {
            let metric_guid = parse_guid(metric_guid, "metricGUID")?;
            let definition_guid = parse_guid(definition_guid, "governanceDefinitionGUID")?;
            GovernanceMetricService::new(repo, context).clear_governance_definition_metric(
                user_id,
                metric_guid,
                definition_guid,
            )
        })
    }

    pub fn get_metrics_for_definition(
        &self,
        user_id: &str,
        definition_guid: &str,
        start_from: u32,
        page_size: u32,
    ) -> MetricsResponse {
        self.run("get_metrics_for_definition", |repo, context| {
            let definition_guid = parse_guid(definition_guid, "governanceDefinitionGUID")?;
            GovernanceMetricService::new(repo, context).get_metrics_for_definition(
                user_id,
                definition_guid,
                paging(start_from, page_size),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::requests::MetricLinkRequestBody;
    use crate::resource::test_support::{resource, USER};
    use governance_core::{
        GovernanceDomainProperties, GovernanceMetricProperties, ReferenceableProperties,
    };

    #[test]
    fn metric_links_to_definition_with_rationale() {
        let (_dir, _clock, resource) = resource(1_000);
        let metric = resource
            .create_governance_metric(
                USER,
                Some(&GovernanceMetricProperties {
                    base: ReferenceableProperties::named("Metric:ConsentCoverage"),
                    measurement: Some("percent of records with consent".into()),
                    target: Some("99".into()),
                }),
            )
            .result
            .unwrap()
            .to_string();
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

        let linked = resource.setup_governance_definition_metric(
            USER,
            &metric,
            &domain,
            Some(&MetricLinkRequestBody {
                rationale: Some("regulatory".into()),
            }),
        );
        assert!(linked.is_success(), "{:?}", linked.exception);

        let metrics = resource
            .get_metrics_for_definition(USER, &domain, 0, 0)
            .result
            .unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].rationale.as_deref(), Some("regulatory"));
        assert_eq!(metrics[0].metric.properties.target.as_deref(), Some("99"));

        assert!(resource
            .clear_governance_definition_metric(USER, &metric, &domain)
            .is_success());
        let metrics = resource
            .get_metrics_for_definition(USER, &domain, 0, 0)
            .result
            .unwrap();
        assert!(metrics.is_empty());
    }
}
