use governance_core::db::open_db_in_memory;
use governance_core::{
    Element, ElementKind, ElementRepository, FixedClock, GovernanceDomainProperties,
    GovernanceDomainService, GovernanceMetricProperties, GovernanceMetricService, OpenAccessPolicy,
    Paging, ReferenceableProperties, ServiceContext, SqliteMetadataRepository,
    SubjectAreaProperties, SubjectAreaService,
};
use std::sync::Arc;

const USER: &str = "garygeeke";

fn context() -> ServiceContext {
    ServiceContext::new(Arc::new(OpenAccessPolicy), Arc::new(FixedClock::new(0)))
}

fn domain(name: &str, identifier: i32) -> GovernanceDomainProperties {
    GovernanceDomainProperties {
        base: ReferenceableProperties {
            domain_identifier: Some(identifier),
            ..ReferenceableProperties::named(format!("Domain:{name}"))
        },
    }
}

fn area(name: &str, identifier: i32) -> SubjectAreaProperties {
    SubjectAreaProperties {
        base: ReferenceableProperties {
            domain_identifier: Some(identifier),
            ..ReferenceableProperties::named(format!("SubjectArea:{name}"))
        },
        subject_area_name: Some(name.to_string()),
        usage: None,
    }
}

#[test]
fn domains_resolve_by_identifier_and_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let domains = GovernanceDomainService::new(repo, context());

    let all = domains.create_governance_domain(USER, &domain("All", 0)).unwrap();
    let privacy = domains
        .create_governance_domain(USER, &domain("Privacy", 2))
        .unwrap();
    domains
        .create_governance_domain(USER, &domain("Security", 3))
        .unwrap();

    let found = domains.get_governance_domain_by_identifier(USER, 2).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].guid, privacy);
    let catch_all = domains.get_governance_domain_by_identifier(USER, 0).unwrap();
    assert_eq!(catch_all.len(), 1);
    assert_eq!(catch_all[0].guid, all);

    let by_name = domains
        .get_governance_domains_by_name(USER, "Domain:Privacy", Paging::default())
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].guid, privacy);

    let paged = domains
        .get_governance_domains(USER, Paging::new(1, 1))
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].guid, privacy);

    let blank = domains
        .get_governance_domains_by_name(USER, "  ", Paging::default())
        .unwrap_err();
    assert_eq!(blank.kind_name(), "invalid_parameter");
}

#[test]
fn domain_set_membership_can_be_added_and_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let domains = GovernanceDomainService::new(repo, context());

    let set = repo
        .create_element(&Element::new(ElementKind::Referenceable, "DomainSet:Regulated"))
        .unwrap();
    let privacy = domains
        .create_governance_domain(USER, &domain("Privacy", 2))
        .unwrap();
    let finance = domains
        .create_governance_domain(USER, &domain("Finance", 4))
        .unwrap();

    domains.add_domain_to_domain_set(USER, set, privacy).unwrap();
    domains.add_domain_to_domain_set(USER, set, finance).unwrap();
    domains.add_domain_to_domain_set(USER, set, finance).unwrap();

    let members = domains
        .get_governance_domains_in_set(USER, set, Paging::default())
        .unwrap();
    let mut guids = members.iter().map(|member| member.guid).collect::<Vec<_>>();
    guids.sort();
    let mut expected = vec![privacy, finance];
    expected.sort();
    assert_eq!(guids, expected);

    domains
        .remove_domain_from_domain_set(USER, set, privacy)
        .unwrap();
    let members = domains
        .get_governance_domains_in_set(USER, set, Paging::default())
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].guid, finance);

    let not_a_domain = domains
        .add_domain_to_domain_set(USER, set, set)
        .unwrap_err();
    assert_eq!(not_a_domain.kind_name(), "unrecognized_identifier");
}

#[test]
fn deleted_domain_is_no_longer_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let domains = GovernanceDomainService::new(repo, context());

    let privacy = domains
        .create_governance_domain(USER, &domain("Privacy", 2))
        .unwrap();
    domains.delete_governance_domain(USER, privacy).unwrap();

    let err = domains
        .get_governance_domain_by_guid(USER, privacy)
        .unwrap_err();
    assert_eq!(err.kind_name(), "unrecognized_identifier");
    let again = domains.delete_governance_domain(USER, privacy).unwrap_err();
    assert_eq!(again.kind_name(), "unrecognized_identifier");
}

#[test]
fn subject_area_hierarchy_keeps_a_single_parent_and_no_cycles() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let areas = SubjectAreaService::new(repo, context());

    let customer = areas.create_subject_area(USER, &area("Customer", 1)).unwrap();
    let contact = areas.create_subject_area(USER, &area("Contact", 1)).unwrap();
    let address = areas.create_subject_area(USER, &area("Address", 1)).unwrap();
    let billing = areas.create_subject_area(USER, &area("Billing", 2)).unwrap();

    areas
        .link_subject_areas_in_hierarchy(USER, customer, contact)
        .unwrap();
    areas
        .link_subject_areas_in_hierarchy(USER, contact, address)
        .unwrap();
    areas
        .link_subject_areas_in_hierarchy(USER, contact, address)
        .unwrap();

    let cycle = areas
        .link_subject_areas_in_hierarchy(USER, address, customer)
        .unwrap_err();
    assert_eq!(cycle.identifiers(), vec!["parentSubjectAreaGUID".to_string()]);

    let own_parent = areas
        .link_subject_areas_in_hierarchy(USER, billing, billing)
        .unwrap_err();
    assert_eq!(own_parent.kind_name(), "invalid_parameter");

    let second_parent = areas
        .link_subject_areas_in_hierarchy(USER, billing, address)
        .unwrap_err();
    assert_eq!(second_parent.identifiers(), vec!["childSubjectAreaGUID".to_string()]);

    let children = areas
        .get_subject_area_children(USER, customer, Paging::default())
        .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].guid, contact);
    assert_eq!(
        areas
            .get_subject_area_parent(USER, address)
            .unwrap()
            .map(|parent| parent.guid),
        Some(contact)
    );
    assert!(areas.get_subject_area_parent(USER, customer).unwrap().is_none());

    areas
        .remove_subject_area_from_hierarchy(USER, contact, address)
        .unwrap();
    areas
        .link_subject_areas_in_hierarchy(USER, billing, address)
        .unwrap();
    assert_eq!(
        areas
            .get_subject_area_parent(USER, address)
            .unwrap()
            .map(|parent| parent.guid),
        Some(billing)
    );

    let in_domain = areas
        .get_subject_areas_by_domain(USER, 2, Paging::default())
        .unwrap();
    assert_eq!(in_domain.len(), 1);
    assert_eq!(in_domain[0].properties.subject_area_name.as_deref(), Some("Billing"));
}

#[test]
fn metrics_link_to_any_governance_definition() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let domains = GovernanceDomainService::new(repo, context());
    let metrics = GovernanceMetricService::new(repo, context());

    let privacy = domains
        .create_governance_domain(USER, &domain("Privacy", 2))
        .unwrap();
    let coverage = metrics
        .create_governance_metric(
            USER,
            &GovernanceMetricProperties {
                base: ReferenceableProperties::named("Metric:ConsentCoverage"),
                measurement: Some("percent".into()),
                target: Some("99".into()),
            },
        )
        .unwrap();
    let latency = metrics
        .create_governance_metric(
            USER,
            &GovernanceMetricProperties {
                base: ReferenceableProperties::named("Metric:RequestLatency"),
                ..GovernanceMetricProperties::default()
            },
        )
        .unwrap();

    metrics
        .setup_governance_definition_metric(USER, coverage, privacy, Some("regulator".into()))
        .unwrap();
    metrics
        .setup_governance_definition_metric(USER, latency, privacy, None)
        .unwrap();

    let linked = metrics
        .get_metrics_for_definition(USER, privacy, Paging::default())
        .unwrap();
    assert_eq!(linked.len(), 2);
    let coverage_link = linked
        .iter()
        .find(|link| link.metric.guid == coverage)
        .unwrap();
    assert_eq!(coverage_link.rationale.as_deref(), Some("regulator"));
    assert_eq!(coverage_link.metric.properties.target.as_deref(), Some("99"));

    let wrong_way = metrics
        .setup_governance_definition_metric(USER, privacy, coverage, None)
        .unwrap_err();
    assert_eq!(wrong_way.kind_name(), "unrecognized_identifier");

    metrics
        .clear_governance_definition_metric(USER, coverage, privacy)
        .unwrap();
    let remaining = metrics
        .get_metrics_for_definition(USER, privacy, Paging::default())
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].metric.guid, latency);

    let named = metrics
        .get_governance_metrics_by_name(USER, "Metric:RequestLatency", Paging::default())
        .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(
        metrics
            .get_governance_metrics(USER, Paging::default())
            .unwrap()
            .len(),
        2
    );
}
