use governance_core::db::open_db_in_memory;
use governance_core::{
    classify, partition, Appointment, FixedClock, GovernanceError, GovernanceRoleProperties,
    GovernanceRoleService, OpenAccessPolicy, PersonProperties, ReferenceableProperties,
    RelationshipKind, RelationshipProperties, RelationshipRepository, ServiceContext,
    SqliteMetadataRepository,
};
use proptest::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

const USER: &str = "erinoverview";
const JAN_10_2020: i64 = 1_578_614_400_000;
const JUN_01_2020: i64 = 1_590_969_600_000;

fn context(clock: &Arc<FixedClock>) -> ServiceContext {
    ServiceContext::new(Arc::new(OpenAccessPolicy), clock.clone())
}

fn role(roles: &GovernanceRoleService<SqliteMetadataRepository<'_>>, role_id: &str) -> Uuid {
    roles
        .create_governance_role(
            USER,
            &GovernanceRoleProperties {
                base: ReferenceableProperties::named(format!("Role:{role_id}")),
                role_id: Some(role_id.to_string()),
                ..GovernanceRoleProperties::default()
            },
        )
        .unwrap()
}

fn person(roles: &GovernanceRoleService<SqliteMetadataRepository<'_>>, name: &str) -> Uuid {
    roles
        .create_person(
            USER,
            &PersonProperties {
                base: ReferenceableProperties::named(format!("Person:{name}")),
                user_id: Some(name.to_string()),
                full_name: None,
            },
        )
        .unwrap()
}

fn window() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    (
        prop::option::of(-1_000i64..1_000),
        prop::option::of(-1_000i64..1_000),
    )
}

proptest! {
    #[test]
    fn partition_places_every_appointment_exactly_once(
        windows in prop::collection::vec(window(), 0..12),
        now in -1_200i64..1_200,
    ) {
        let role_id = Uuid::new_v4();
        let appointments = windows
            .into_iter()
            .map(|(from, to)| Appointment {
                guid: Uuid::new_v4(),
                role_id,
                candidate_id: Uuid::new_v4(),
                effective_from: from,
                effective_to: to,
            })
            .collect::<Vec<_>>();

        let result = partition(appointments.clone(), now);
        prop_assert_eq!(result.len(), appointments.len());
        for appointment in &appointments {
            let buckets = [&result.past, &result.current, &result.future]
                .iter()
                .filter(|bucket| bucket.contains(appointment))
                .count();
            prop_assert_eq!(buckets, 1);
        }
    }

    #[test]
    fn open_ended_appointment_is_current_at_any_instant(now in any::<i64>()) {
        let appointment = Appointment {
            guid: Uuid::new_v4(),
            role_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            effective_from: None,
            effective_to: None,
        };
        let result = classify(vec![appointment.clone()], now).unwrap();
        prop_assert_eq!(result.current, vec![appointment]);
    }
}

#[test]
fn handover_on_the_same_day_keeps_one_incumbent() {
    let role_id = Uuid::new_v4();
    let outgoing = Appointment {
        guid: Uuid::new_v4(),
        role_id,
        candidate_id: Uuid::new_v4(),
        effective_from: None,
        effective_to: Some(JAN_10_2020),
    };
    let incoming = Appointment {
        guid: Uuid::new_v4(),
        role_id,
        candidate_id: Uuid::new_v4(),
        effective_from: Some(JAN_10_2020),
        effective_to: None,
    };

    let result = classify(vec![outgoing.clone(), incoming.clone()], JUN_01_2020).unwrap();
    assert_eq!(result.current, vec![incoming]);
    assert_eq!(result.past, vec![outgoing]);
    assert!(result.future.is_empty());
}

#[test]
fn appoint_ends_incumbent_one_millisecond_before_successor() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(1_000));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let steward = role(&roles, "DataSteward");
    let erin = person(&roles, "erin");
    let gary = person(&roles, "gary");

    let first = roles.appoint(USER, steward, erin, None, false).unwrap();
    clock.set(10_000);
    let second = roles.appoint(USER, steward, gary, Some(8_000), true).unwrap();

    let ended = repo.get_relationship(first).unwrap().unwrap();
    assert_eq!(ended.properties.effective_from, Some(1_000));
    assert_eq!(ended.properties.effective_to, Some(7_999));
    let started = repo.get_relationship(second).unwrap().unwrap();
    assert_eq!(started.properties.effective_from, Some(8_000));
    assert_eq!(started.properties.effective_to, None);

    let appointees = roles.get_appointees(USER, steward, None).unwrap();
    assert_eq!(appointees.current.len(), 1);
    assert_eq!(appointees.current[0].person.guid, gary);
    assert!(appointees.current[0].is_public);
    assert_eq!(appointees.past.len(), 1);
    assert_eq!(appointees.past[0].person.guid, erin);
    assert!(!appointees.past[0].is_public);

    // Erin still held the role at her last instant.
    let at_boundary = roles.get_appointees(USER, steward, Some(7_999)).unwrap();
    assert_eq!(at_boundary.current[0].person.guid, erin);
    assert_eq!(at_boundary.future[0].person.guid, gary);
}

#[test]
fn future_dated_appointment_leaves_incumbent_until_start() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(100));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let owner = role(&roles, "DataOwner");
    let erin = person(&roles, "erin");
    let gary = person(&roles, "gary");

    roles.appoint(USER, owner, erin, Some(0), false).unwrap();
    roles.appoint(USER, owner, gary, Some(5_000), false).unwrap();

    let incumbent = roles.get_current_incumbent(USER, owner).unwrap().unwrap();
    assert_eq!(incumbent.person.guid, erin);
    assert_eq!(incumbent.appointment.effective_to, Some(4_999));

    clock.set(5_000);
    let incumbent = roles.get_current_incumbent(USER, owner).unwrap().unwrap();
    assert_eq!(incumbent.person.guid, gary);
}

#[test]
fn relieve_moves_appointment_into_the_past() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(1_000));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "PrivacyOfficer");
    let erin = person(&roles, "erin");
    let appointment = roles.appoint(USER, officer, erin, None, false).unwrap();

    let relieved = roles.relieve(USER, officer, erin, Some(2_000)).unwrap();
    assert_eq!(relieved, appointment);

    let at_end = roles.get_appointees(USER, officer, Some(2_000)).unwrap();
    assert_eq!(at_end.current.len(), 1);
    let after = roles.get_appointees(USER, officer, Some(2_001)).unwrap();
    assert!(after.current.is_empty());
    assert_eq!(after.past[0].appointment.effective_to, Some(2_000));
    assert!(roles.get_current_incumbent(USER, officer).unwrap().is_some());

    clock.set(3_000);
    assert!(roles.get_current_incumbent(USER, officer).unwrap().is_none());
}

#[test]
fn relieve_prefers_open_ended_appointment_of_a_returning_candidate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(10_000));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "RecordsOfficer");
    let erin = person(&roles, "erin");

    let earlier = repo
        .add_relationship(
            RelationshipKind::PersonRoleAppointment,
            &RelationshipProperties::with_window(Some(0), Some(1_000)),
            erin,
            officer,
        )
        .unwrap();
    let later = roles.appoint(USER, officer, erin, Some(5_000), false).unwrap();

    let relieved = roles.relieve(USER, officer, erin, None).unwrap();
    assert_eq!(relieved, later);
    let untouched = repo.get_relationship(earlier.guid).unwrap().unwrap();
    assert_eq!(untouched.properties.effective_to, Some(1_000));
    let ended = repo.get_relationship(later).unwrap().unwrap();
    assert_eq!(ended.properties.effective_to, Some(10_000));
}

#[test]
fn two_current_appointments_are_reported_not_repaired() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(500));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "SecurityOfficer");
    let erin = person(&roles, "erin");
    let gary = person(&roles, "gary");
    let mut inserted = Vec::new();
    for (candidate, window) in [(erin, (Some(0), None)), (gary, (Some(100), Some(900)))] {
        inserted.push(
            repo.add_relationship(
                RelationshipKind::PersonRoleAppointment,
                &RelationshipProperties::with_window(window.0, window.1),
                candidate,
                officer,
            )
            .unwrap()
            .guid,
        );
    }

    match roles.get_appointees(USER, officer, None).unwrap_err() {
        GovernanceError::DuplicateCurrentAppointment {
            role_id,
            mut appointment_ids,
        } => {
            assert_eq!(role_id, officer);
            appointment_ids.sort();
            inserted.sort();
            assert_eq!(appointment_ids, inserted);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing was rewritten while reporting.
    for guid in &inserted {
        assert!(repo.get_relationship(*guid).unwrap().is_some());
    }
    let later = roles.get_appointees(USER, officer, Some(1_000)).unwrap();
    assert_eq!(later.current.len(), 1);
    assert_eq!(later.past.len(), 1);
}

#[test]
fn appoint_rejects_protocol_violations() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(1_000));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "QualityOfficer");
    let erin = person(&roles, "erin");
    let gary = person(&roles, "gary");
    roles.appoint(USER, officer, erin, None, false).unwrap();

    let again = roles.appoint(USER, officer, erin, None, false).unwrap_err();
    assert_eq!(again.kind_name(), "invalid_parameter");

    let before_incumbent = roles.appoint(USER, officer, gary, Some(500), false).unwrap_err();
    assert_eq!(before_incumbent.kind_name(), "invalid_parameter");

    let not_a_role = roles.appoint(USER, gary, erin, None, false).unwrap_err();
    assert_eq!(not_a_role.kind_name(), "unrecognized_identifier");

    let stranger = roles.relieve(USER, officer, gary, None).unwrap_err();
    assert_eq!(stranger.kind_name(), "invalid_parameter");

    let before_start = roles.relieve(USER, officer, erin, Some(10)).unwrap_err();
    assert_eq!(before_start.kind_name(), "invalid_parameter");

    let appointees = roles.get_appointees(USER, officer, None).unwrap();
    assert_eq!(appointees.current.len(), 1);
    assert!(appointees.past.is_empty());
}

#[test]
fn relieving_someone_who_already_left_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(0));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "ComplianceOfficer");
    let alice = person(&roles, "alice");
    let bob = person(&roles, "bob");

    let first = roles.appoint(USER, officer, alice, Some(0), false).unwrap();
    roles.relieve(USER, officer, alice, Some(99)).unwrap();
    roles.appoint(USER, officer, bob, Some(100), false).unwrap();

    clock.set(1_000);
    let err = roles.relieve(USER, officer, alice, None).unwrap_err();
    assert_eq!(err.kind_name(), "invalid_parameter");
    assert_eq!(err.identifiers(), vec!["effectiveTime".to_string()]);

    let kept = repo.get_relationship(first).unwrap().unwrap();
    assert_eq!(kept.properties.effective_to, Some(99));
    let appointees = roles.get_appointees(USER, officer, None).unwrap();
    assert_eq!(appointees.current.len(), 1);
    assert_eq!(appointees.current[0].person.guid, bob);

    // Bringing the end forward is still allowed.
    roles.relieve(USER, officer, alice, Some(50)).unwrap();
    let shortened = repo.get_relationship(first).unwrap().unwrap();
    assert_eq!(shortened.properties.effective_to, Some(50));
}

#[test]
fn appoint_leaves_an_earlier_incumbent_end_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMetadataRepository::try_new(&conn).unwrap();
    let clock = Arc::new(FixedClock::new(100));
    let roles = GovernanceRoleService::new(repo, context(&clock));

    let officer = role(&roles, "EthicsOfficer");
    let alice = person(&roles, "alice");
    let bob = person(&roles, "bob");

    let first = roles.appoint(USER, officer, alice, Some(0), false).unwrap();
    roles.relieve(USER, officer, alice, Some(200)).unwrap();
    roles.appoint(USER, officer, bob, Some(500), false).unwrap();

    let incumbent = repo.get_relationship(first).unwrap().unwrap();
    assert_eq!(incumbent.properties.effective_to, Some(200));
    let vacant = roles.get_appointees(USER, officer, Some(300)).unwrap();
    assert!(vacant.current.is_empty());
    assert_eq!(vacant.past.len(), 1);
    assert_eq!(vacant.future.len(), 1);
}
