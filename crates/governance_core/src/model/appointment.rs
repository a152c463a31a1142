//! Appointment window resolution.
//!
//! # Responsibility
//! - Represent a time-bounded assignment of a person to a governance role.
//! - Classify appointments into past, current and future relative to an
//!   instant.
//! - Plan the writes needed to appoint a new incumbent or relieve one.
//!
//! # Invariants
//! - At most one appointment per role is current at any instant. A second
//!   current appointment is a store inconsistency and is reported, never
//!   repaired here.
//! - Windows are closed intervals with open-ended `None` bounds. At the exact
//!   `effective_to` instant an appointment is still current.
//! - Every function in this module is pure; callers own the writes.

use crate::model::element::ElementId;
use crate::model::relationship::{Relationship, RelationshipId, RelationshipKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A person's appointment to a governance role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Guid of the backing appointment relationship.
    pub guid: RelationshipId,
    pub role_id: ElementId,
    pub candidate_id: ElementId,
    /// Epoch ms. `None` means appointed since forever.
    pub effective_from: Option<i64>,
    /// Epoch ms. `None` means still in post.
    pub effective_to: Option<i64>,
}

/// Position of an appointment window relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    Past,
    Current,
    Future,
}

impl Appointment {
    /// Projects a `PersonRoleAppointment` relationship into an appointment.
    ///
    /// Returns `None` for any other relationship kind.
    pub fn from_relationship(relationship: &Relationship) -> Option<Self> {
        if relationship.kind != RelationshipKind::PersonRoleAppointment {
            return None;
        }
        Some(Self {
            guid: relationship.guid,
            role_id: relationship.end2_guid,
            candidate_id: relationship.end1_guid,
            effective_from: relationship.properties.effective_from,
            effective_to: relationship.properties.effective_to,
        })
    }

    /// Locates this window relative to `now`.
    ///
    /// A reversed window can only come from corrupted data; it resolves to
    /// past when its end has passed and to future otherwise, so the three
    /// positions stay mutually exclusive.
    pub fn position_at(&self, now: i64) -> WindowPosition {
        if self.effective_to.is_some_and(|to| to < now) {
            WindowPosition::Past
        } else if self.effective_from.is_some_and(|from| from > now) {
            WindowPosition::Future
        } else {
            WindowPosition::Current
        }
    }

    pub fn is_current_at(&self, now: i64) -> bool {
        self.position_at(now) == WindowPosition::Current
    }
}

/// Appointments split by window position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentPartition {
    pub past: Vec<Appointment>,
    pub current: Vec<Appointment>,
    pub future: Vec<Appointment>,
}

impl AppointmentPartition {
    pub fn len(&self) -> usize {
        self.past.len() + self.current.len() + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// More than one appointment is current for the same role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCurrentAppointment {
    pub role_id: ElementId,
    pub appointment_ids: Vec<RelationshipId>,
}

impl Display for DuplicateCurrentAppointment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ids = self
            .appointment_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "role {} has {} current appointments: {ids}",
            self.role_id,
            self.appointment_ids.len()
        )
    }
}

impl Error for DuplicateCurrentAppointment {}

/// Splits appointments by their position at `now`.
///
/// Every input appointment lands in exactly one bucket; input order is kept
/// within each bucket.
pub fn partition(
    appointments: impl IntoIterator<Item = Appointment>,
    now: i64,
) -> AppointmentPartition {
    let mut result = AppointmentPartition::default();
    for appointment in appointments {
        match appointment.position_at(now) {
            WindowPosition::Past => result.past.push(appointment),
            WindowPosition::Current => result.current.push(appointment),
            WindowPosition::Future => result.future.push(appointment),
        }
    }
    result
}

/// Splits appointments by position at `now` and enforces the single
/// incumbent rule per role.
pub fn classify(
    appointments: impl IntoIterator<Item = Appointment>,
    now: i64,
) -> Result<AppointmentPartition, DuplicateCurrentAppointment> {
    let result = partition(appointments, now);

    let mut current_by_role: BTreeMap<ElementId, Vec<RelationshipId>> = BTreeMap::new();
    for appointment in &result.current {
        current_by_role
            .entry(appointment.role_id)
            .or_default()
            .push(appointment.guid);
    }
    if let Some((role_id, appointment_ids)) = current_by_role
        .into_iter()
        .find(|(_, appointment_ids)| appointment_ids.len() > 1)
    {
        return Err(DuplicateCurrentAppointment {
            role_id,
            appointment_ids,
        });
    }

    Ok(result)
}

/// Protocol violations raised while planning appointment changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    DuplicateCurrent(DuplicateCurrentAppointment),
    /// The candidate already holds the role.
    AlreadyIncumbent {
        role_id: ElementId,
        candidate_id: ElementId,
    },
    /// Ending the incumbent at `start - 1` would precede its own start.
    StartPrecedesIncumbent {
        appointment_id: RelationshipId,
        incumbent_from: i64,
        start: i64,
    },
    /// No appointment links the candidate to the role.
    NoAppointment {
        role_id: ElementId,
        candidate_id: ElementId,
    },
    /// The requested end precedes the appointment start.
    EndPrecedesStart {
        appointment_id: RelationshipId,
        effective_from: i64,
        end: i64,
    },
    /// The requested end would reopen an appointment that already ends earlier.
    EndExtendsAppointment {
        appointment_id: RelationshipId,
        effective_to: i64,
        end: i64,
    },
}

impl Display for AppointmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCurrent(err) => write!(f, "{err}"),
            Self::AlreadyIncumbent {
                role_id,
                candidate_id,
            } => write!(
                f,
                "candidate {candidate_id} is already the current incumbent of role {role_id}"
            ),
            Self::StartPrecedesIncumbent {
                appointment_id,
                incumbent_from,
                start,
            } => write!(
                f,
                "start {start} would end appointment {appointment_id} before its effective_from {incumbent_from}"
            ),
            Self::NoAppointment {
                role_id,
                candidate_id,
            } => write!(
                f,
                "candidate {candidate_id} has no appointment to role {role_id}"
            ),
            Self::EndPrecedesStart {
                appointment_id,
                effective_from,
                end,
            } => write!(
                f,
                "end {end} precedes effective_from {effective_from} of appointment {appointment_id}"
            ),
            Self::EndExtendsAppointment {
                appointment_id,
                effective_to,
                end,
            } => write!(
                f,
                "end {end} is later than effective_to {effective_to} of appointment {appointment_id}"
            ),
        }
    }
}

impl Error for AppointmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateCurrent(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DuplicateCurrentAppointment> for AppointmentError {
    fn from(value: DuplicateCurrentAppointment) -> Self {
        Self::DuplicateCurrent(value)
    }
}

/// Writes needed to appoint a new incumbent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentPlan {
    /// Incumbent appointment to end, with its new `effective_to`.
    pub end_incumbent: Option<(RelationshipId, i64)>,
    /// `effective_from` of the new appointment.
    pub start: i64,
}

/// Plans the appointment of `candidate_id` to `role_id` from `start`.
///
/// `existing` holds the role's appointments; entries for other roles are
/// ignored. The current incumbent is determined at `now`. Its window is cut
/// to end at `start - 1` when it would otherwise overlap `start`; a window
/// that already ends earlier is left untouched.
pub fn plan_appointment(
    existing: &[Appointment],
    role_id: ElementId,
    candidate_id: ElementId,
    start: i64,
    now: i64,
) -> Result<AppointmentPlan, AppointmentError> {
    let for_role = existing
        .iter()
        .filter(|appointment| appointment.role_id == role_id)
        .cloned();
    let classified = classify(for_role, now)?;

    let Some(incumbent) = classified.current.first() else {
        return Ok(AppointmentPlan {
            end_incumbent: None,
            start,
        });
    };

    if incumbent.candidate_id == candidate_id {
        return Err(AppointmentError::AlreadyIncumbent {
            role_id,
            candidate_id,
        });
    }

    let new_end = start.saturating_sub(1);
    if let Some(incumbent_from) = incumbent.effective_from {
        if new_end < incumbent_from {
            return Err(AppointmentError::StartPrecedesIncumbent {
                appointment_id: incumbent.guid,
                incumbent_from,
                start,
            });
        }
    }

    let overlaps = incumbent.effective_to.map_or(true, |to| to > new_end);
    Ok(AppointmentPlan {
        end_incumbent: overlaps.then_some((incumbent.guid, new_end)),
        start,
    })
}

/// Picks the appointment to end when relieving `candidate_id` from `role_id`.
///
/// An open-ended appointment wins; otherwise the one with the latest
/// `effective_to`. `end` must lie within the selected window: not before its
/// start, and not after an end it already has.
pub fn select_for_relief(
    appointments: &[Appointment],
    role_id: ElementId,
    candidate_id: ElementId,
    end: i64,
) -> Result<&Appointment, AppointmentError> {
    let selected = appointments
        .iter()
        .filter(|appointment| {
            appointment.role_id == role_id && appointment.candidate_id == candidate_id
        })
        .max_by_key(|appointment| appointment.effective_to.map_or(i64::MAX, |to| to))
        .ok_or(AppointmentError::NoAppointment {
            role_id,
            candidate_id,
        })?;

    if let Some(effective_from) = selected.effective_from {
        if end < effective_from {
            return Err(AppointmentError::EndPrecedesStart {
                appointment_id: selected.guid,
                effective_from,
                end,
            });
        }
    }
    if let Some(effective_to) = selected.effective_to {
        if end > effective_to {
            return Err(AppointmentError::EndExtendsAppointment {
                appointment_id: selected.guid,
                effective_to,
                end,
            });
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::{
        classify, partition, plan_appointment, select_for_relief, Appointment, AppointmentError,
        WindowPosition,
    };
    use uuid::Uuid;

    const JAN_10_2020: i64 = 1_578_614_400_000;
    const JUN_01_2020: i64 = 1_590_969_600_000;

    fn appointment(role: Uuid, from: Option<i64>, to: Option<i64>) -> Appointment {
        Appointment {
            guid: Uuid::new_v4(),
            role_id: role,
            candidate_id: Uuid::new_v4(),
            effective_from: from,
            effective_to: to,
        }
    }

    #[test]
    fn open_window_is_always_current() {
        let role = Uuid::new_v4();
        let open = appointment(role, None, None);
        for now in [i64::MIN, -1, 0, JUN_01_2020, i64::MAX] {
            assert_eq!(open.position_at(now), WindowPosition::Current);
        }
    }

    #[test]
    fn boundary_instants_are_current() {
        let role = Uuid::new_v4();
        let bounded = appointment(role, Some(100), Some(200));
        assert_eq!(bounded.position_at(99), WindowPosition::Future);
        assert_eq!(bounded.position_at(100), WindowPosition::Current);
        assert_eq!(bounded.position_at(200), WindowPosition::Current);
        assert_eq!(bounded.position_at(201), WindowPosition::Past);
    }

    #[test]
    fn handover_example_splits_past_and_current() {
        let role = Uuid::new_v4();
        let earlier = appointment(role, None, Some(JAN_10_2020));
        let later = appointment(role, Some(JAN_10_2020), None);

        let result = classify(vec![earlier.clone(), later.clone()], JUN_01_2020)
            .expect("single incumbent");
        assert_eq!(result.past, vec![earlier]);
        assert_eq!(result.current, vec![later]);
        assert!(result.future.is_empty());
    }

    #[test]
    fn overlapping_current_windows_are_reported() {
        let role = Uuid::new_v4();
        let first = appointment(role, Some(0), None);
        let second = appointment(role, Some(50), Some(500));

        let err = classify(vec![first.clone(), second.clone()], 100)
            .expect_err("two incumbents must be reported");
        assert_eq!(err.role_id, role);
        assert_eq!(err.appointment_ids, vec![first.guid, second.guid]);
    }

    #[test]
    fn current_appointments_in_different_roles_do_not_conflict() {
        let result = classify(
            vec![
                appointment(Uuid::new_v4(), None, None),
                appointment(Uuid::new_v4(), None, None),
            ],
            0,
        )
        .expect("distinct roles");
        assert_eq!(result.current.len(), 2);
    }

    #[test]
    fn reversed_window_lands_in_exactly_one_bucket() {
        let role = Uuid::new_v4();
        let reversed = appointment(role, Some(300), Some(100));
        assert_eq!(reversed.position_at(200), WindowPosition::Past);
        assert_eq!(reversed.position_at(50), WindowPosition::Future);
        assert_eq!(partition(vec![reversed], 200).len(), 1);
    }

    #[test]
    fn plan_ends_incumbent_one_millisecond_before_start() {
        let role = Uuid::new_v4();
        let incumbent = appointment(role, Some(0), None);
        let candidate = Uuid::new_v4();

        let plan = plan_appointment(&[incumbent.clone()], role, candidate, 1_000, 500)
            .expect("plan should succeed");
        assert_eq!(plan.end_incumbent, Some((incumbent.guid, 999)));
        assert_eq!(plan.start, 1_000);
    }

    #[test]
    fn plan_without_incumbent_only_starts_new_appointment() {
        let role = Uuid::new_v4();
        let past = appointment(role, Some(0), Some(10));
        let plan = plan_appointment(&[past], role, Uuid::new_v4(), 100, 100).expect("plan");
        assert_eq!(plan.end_incumbent, None);
    }

    #[test]
    fn plan_keeps_incumbent_end_that_precedes_start() {
        let role = Uuid::new_v4();
        let incumbent = appointment(role, Some(0), Some(200));
        let plan =
            plan_appointment(&[incumbent], role, Uuid::new_v4(), 500, 100).expect("no overlap");
        assert_eq!(plan.end_incumbent, None);
    }

    #[test]
    fn plan_rejects_reappointing_incumbent() {
        let role = Uuid::new_v4();
        let incumbent = appointment(role, None, None);
        let err = plan_appointment(&[incumbent.clone()], role, incumbent.candidate_id, 10, 10)
            .expect_err("incumbent cannot be appointed again");
        assert!(matches!(err, AppointmentError::AlreadyIncumbent { .. }));
    }

    #[test]
    fn plan_rejects_start_before_incumbent_started() {
        let role = Uuid::new_v4();
        let incumbent = appointment(role, Some(1_000), None);
        let err = plan_appointment(&[incumbent], role, Uuid::new_v4(), 1_000, 2_000)
            .expect_err("start - 1 precedes incumbent start");
        assert!(matches!(
            err,
            AppointmentError::StartPrecedesIncumbent {
                incumbent_from: 1_000,
                start: 1_000,
                ..
            }
        ));
    }

    #[test]
    fn plan_surfaces_duplicate_incumbents() {
        let role = Uuid::new_v4();
        let err = plan_appointment(
            &[appointment(role, None, None), appointment(role, None, None)],
            role,
            Uuid::new_v4(),
            10,
            10,
        )
        .expect_err("duplicates must surface");
        assert!(matches!(err, AppointmentError::DuplicateCurrent(_)));
    }

    #[test]
    fn relief_prefers_open_ended_then_latest_end() {
        let role = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let mut first = appointment(role, Some(0), Some(10));
        first.candidate_id = candidate;
        let mut second = appointment(role, Some(20), Some(30));
        second.candidate_id = candidate;
        let mut open = appointment(role, Some(40), None);
        open.candidate_id = candidate;

        let with_open = [first.clone(), open.clone(), second.clone()];
        let selected = select_for_relief(&with_open, role, candidate, 50).expect("selection");
        assert_eq!(selected.guid, open.guid);

        let closed = [second.clone(), first];
        let selected = select_for_relief(&closed, role, candidate, 25).expect("selection");
        assert_eq!(selected.guid, second.guid);
    }

    #[test]
    fn relief_requires_matching_appointment_and_ordered_end() {
        let role = Uuid::new_v4();
        let other = appointment(role, Some(100), None);
        let candidate = Uuid::new_v4();
        let appointments = [other.clone()];
        let err = select_for_relief(&appointments, role, candidate, 200)
            .expect_err("candidate has no appointment");
        assert!(matches!(err, AppointmentError::NoAppointment { .. }));

        let err = select_for_relief(&appointments, role, other.candidate_id, 50)
            .expect_err("end before start");
        assert!(matches!(err, AppointmentError::EndPrecedesStart { end: 50, .. }));
    }

    #[test]
    fn relief_never_reopens_a_closed_appointment() {
        let role = Uuid::new_v4();
        let closed = [appointment(role, Some(0), Some(99))];
        let candidate = closed[0].candidate_id;

        let err = select_for_relief(&closed, role, candidate, 1_000)
            .expect_err("end after existing end");
        assert!(matches!(
            err,
            AppointmentError::EndExtendsAppointment {
                effective_to: 99,
                end: 1_000,
                ..
            }
        ));

        let selected = select_for_relief(&closed, role, candidate, 50).expect("shortening");
        assert_eq!(selected.guid, closed[0].guid);
    }

    #[test]
    fn relieved_appointment_is_past_after_end() {
        let role = Uuid::new_v4();
        let mut current = appointment(role, Some(0), None);
        current.effective_to = Some(1_000);
        assert_eq!(current.position_at(1_000), WindowPosition::Current);
        assert_eq!(current.position_at(1_001), WindowPosition::Past);
    }
}
