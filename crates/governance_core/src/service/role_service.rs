//! Governance role (officer) use-case service.
//!
//! # Responsibility
//! - CRUD over governance roles and the person profiles appointed to them.
//! - Appoint and relieve incumbents while keeping at most one current
//!   appointment per role.
//! - Report past, current and future appointees of a role.
//!
//! # Invariants
//! - Appointing ends the current incumbent at `start - 1` before the new
//!   appointment is written. Both writes go straight to the store; a failure
//!   of the second write is reported, not compensated.
//! - Duplicate current appointments found in the store are reported as
//!   `DuplicateCurrentAppointment` and left untouched.

use crate::model::appointment::{
    classify, plan_appointment, select_for_relief, Appointment, AppointmentPartition,
};
use crate::model::element::{ElementId, ElementKind};
use crate::model::governance::{GovernanceRoleProperties, PersonProperties, TypedElement, ROLE_ID};
use crate::model::relationship::{
    Relationship, RelationshipId, RelationshipKind, RelationshipProperties,
};
use crate::repo::element_repo::RepoError;
use crate::repo::MetadataRepository;
use crate::security::AccessAction;
use crate::service::error::{GovernanceError, GovernanceResult};
use crate::service::handler::{ElementHandler, Paging, ServiceContext};
use log::info;
use serde::Serialize;
use std::collections::HashMap;

const IS_PUBLIC: &str = "is_public";

pub type GovernanceRoleElement = TypedElement<GovernanceRoleProperties>;
pub type PersonElement = TypedElement<PersonProperties>;

/// One appointment together with the appointed person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointee {
    pub appointment: Appointment,
    /// Whether the appointment may be shown outside the governance team.
    pub is_public: bool,
    pub person: PersonElement,
}

/// Appointees of one role split by window position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Appointees {
    pub past: Vec<Appointee>,
    pub current: Vec<Appointee>,
    pub future: Vec<Appointee>,
}

/// Governance role service facade.
pub struct GovernanceRoleService<R: MetadataRepository> {
    handler: ElementHandler<R>,
}

impl<R: MetadataRepository> GovernanceRoleService<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self {
            handler: ElementHandler::new(repo, context),
        }
    }

    pub fn create_governance_role(
        &self,
        user_id: &str,
        properties: &GovernanceRoleProperties,
    ) -> GovernanceResult<ElementId> {
        self.handler.create(user_id, properties)
    }

    pub fn update_governance_role(
        &self,
        user_id: &str,
        role_guid: ElementId,
        properties: &GovernanceRoleProperties,
        is_merge_update: bool,
    ) -> GovernanceResult<()> {
        self.handler
            .update(user_id, role_guid, properties, is_merge_update)
    }

    /// Soft-deletes a role; its appointment relationships are removed with it.
    pub fn delete_governance_role(&self, user_id: &str, role_guid: ElementId) -> GovernanceResult<()> {
        self.handler
            .delete(user_id, role_guid, ElementKind::GovernanceRole)
    }

    pub fn get_governance_role_by_guid(
        &self,
        user_id: &str,
        role_guid: ElementId,
    ) -> GovernanceResult<GovernanceRoleElement> {
        self.handler.get(user_id, role_guid)
    }

    pub fn get_governance_roles_by_name(
        &self,
        user_id: &str,
        name: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceRoleElement>> {
        self.handler.find_by_name(user_id, name, paging)
    }

    /// Roles in one governance domain; `0` lists roles of every domain.
    pub fn get_governance_roles_by_domain(
        &self,
        user_id: &str,
        domain_identifier: i32,
        paging: Paging,
    ) -> GovernanceResult<Vec<GovernanceRoleElement>> {
        self.handler.list(user_id, Some(domain_identifier), paging)
    }

    /// Finds the single role carrying business identifier `role_id`.
    pub fn get_governance_role_by_role_id(
        &self,
        user_id: &str,
        role_id: &str,
    ) -> GovernanceResult<GovernanceRoleElement> {
        let role_id = role_id.trim();
        if role_id.is_empty() {
            return Err(GovernanceError::invalid_parameter(
                "roleId",
                "role id must not be blank",
            ));
        }

        let roles: Vec<GovernanceRoleElement> =
            self.handler.find_by_extended(user_id, ROLE_ID, role_id)?;
        let mut matches = roles.into_iter();
        let first = matches
            .next()
            .ok_or_else(|| GovernanceError::unrecognized(role_id, "governance role id"))?;
        if matches.next().is_some() {
            return Err(GovernanceError::invalid_parameter(
                "roleId",
                format!("role id `{role_id}` is held by more than one governance role"),
            ));
        }
        Ok(first)
    }

    pub fn create_person(
        &self,
        user_id: &str,
        properties: &PersonProperties,
    ) -> GovernanceResult<ElementId> {
        self.handler.create(user_id, properties)
    }

    pub fn get_person_by_guid(
        &self,
        user_id: &str,
        person_guid: ElementId,
    ) -> GovernanceResult<PersonElement> {
        self.handler.get(user_id, person_guid)
    }

    /// Appoints `person_guid` to `role_guid` from `start` (default now).
    ///
    /// The incumbent current at now gets `effective_to = start - 1`. An
    /// incumbent whose `effective_to` is already earlier than `start - 1`
    /// keeps it: an appointment end is never moved later, so the gap stays
    /// vacant.
    ///
    /// Returns the guid of the new appointment relationship.
    pub fn appoint(
        &self,
        user_id: &str,
        role_guid: ElementId,
        person_guid: ElementId,
        start: Option<i64>,
        is_public: bool,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.authorize(user_id, AccessAction::Appoint)?;
        self.handler.load(role_guid, ElementKind::GovernanceRole)?;
        self.handler.load(person_guid, ElementKind::Person)?;

        let now = self.handler.now();
        let start = start.unwrap_or(now);
        let existing = self.appointments_for_role(role_guid)?;
        let plan = plan_appointment(&existing, role_guid, person_guid, start, now)?;

        if let Some((incumbent_guid, new_end)) = plan.end_incumbent {
            self.set_appointment_end(incumbent_guid, new_end)?;
            info!(
                "event=appointment_end module=service status=ok role={} appointment={} effective_to={}",
                role_guid, incumbent_guid, new_end
            );
        }

        let properties = RelationshipProperties::with_window(Some(plan.start), None)
            .with_attribute(IS_PUBLIC, is_public.to_string());
        let relationship = self.handler.add_checked_relationship(
            RelationshipKind::PersonRoleAppointment,
            person_guid,
            role_guid,
            &properties,
        )?;
        info!(
            "event=appointment_start module=service status=ok role={} person={} appointment={} effective_from={}",
            role_guid, person_guid, relationship.guid, plan.start
        );
        Ok(relationship.guid)
    }

    /// Ends the appointment of `person_guid` to `role_guid` at `end` (default now).
    ///
    /// Returns the guid of the appointment that was ended.
    pub fn relieve(
        &self,
        user_id: &str,
        role_guid: ElementId,
        person_guid: ElementId,
        end: Option<i64>,
    ) -> GovernanceResult<RelationshipId> {
        self.handler.authorize(user_id, AccessAction::Appoint)?;
        self.handler.load(role_guid, ElementKind::GovernanceRole)?;
        self.handler.load(person_guid, ElementKind::Person)?;

        let end = end.unwrap_or_else(|| self.handler.now());
        let existing = self.appointments_for_role(role_guid)?;
        let selected = select_for_relief(&existing, role_guid, person_guid, end)?.guid;

        self.set_appointment_end(selected, end)?;
        info!(
            "event=appointment_relieve module=service status=ok role={} person={} appointment={} effective_to={}",
            role_guid, person_guid, selected, end
        );
        Ok(selected)
    }

    /// Classifies the appointees of a role at `effective_time` (default now).
    pub fn get_appointees(
        &self,
        user_id: &str,
        role_guid: ElementId,
        effective_time: Option<i64>,
    ) -> GovernanceResult<Appointees> {
        self.handler.authorize(user_id, AccessAction::Read)?;
        self.handler.load(role_guid, ElementKind::GovernanceRole)?;

        let now = effective_time.unwrap_or_else(|| self.handler.now());
        let relationships = self.appointment_relationships(role_guid)?;
        let visibility: HashMap<RelationshipId, bool> = relationships
            .iter()
            .map(|relationship| {
                (
                    relationship.guid,
                    relationship.properties.attribute(IS_PUBLIC) == Some("true"),
                )
            })
            .collect();
        let AppointmentPartition {
            past,
            current,
            future,
        } = classify(
            relationships.iter().filter_map(Appointment::from_relationship),
            now,
        )?;

        Ok(Appointees {
            past: self.appointees(past, &visibility)?,
            current: self.appointees(current, &visibility)?,
            future: self.appointees(future, &visibility)?,
        })
    }

    /// Returns the incumbent of a role right now, if any.
    pub fn get_current_incumbent(
        &self,
        user_id: &str,
        role_guid: ElementId,
    ) -> GovernanceResult<Option<Appointee>> {
        Ok(self
            .get_appointees(user_id, role_guid, None)?
            .current
            .into_iter()
            .next())
    }

    fn appointment_relationships(&self, role_guid: ElementId) -> GovernanceResult<Vec<Relationship>> {
        Ok(self
            .handler
            .repo()
            .find_relationships_for_entity(role_guid, RelationshipKind::PersonRoleAppointment)?
            .into_iter()
            .filter(|relationship| relationship.end2_guid == role_guid)
            .collect())
    }

    fn appointments_for_role(&self, role_guid: ElementId) -> GovernanceResult<Vec<Appointment>> {
        Ok(self
            .appointment_relationships(role_guid)?
            .iter()
            .filter_map(Appointment::from_relationship)
            .collect())
    }

    fn set_appointment_end(&self, appointment_guid: RelationshipId, end: i64) -> GovernanceResult<()> {
        let repo = self.handler.repo();
        let relationship = repo.get_relationship(appointment_guid)?.ok_or_else(|| {
            GovernanceError::PropertyServerUnavailable(RepoError::NotFound(appointment_guid))
        })?;
        let mut properties = relationship.properties;
        properties.effective_to = Some(end);
        repo.update_relationship_properties(appointment_guid, &properties)?;
        Ok(())
    }

    fn appointees(
        &self,
        appointments: Vec<Appointment>,
        visibility: &HashMap<RelationshipId, bool>,
    ) -> GovernanceResult<Vec<Appointee>> {
        appointments
            .into_iter()
            .map(|appointment| {
                let person = self
                    .handler
                    .load(appointment.candidate_id, ElementKind::Person)?;
                Ok(Appointee {
                    is_public: visibility.get(&appointment.guid).copied().unwrap_or(false),
                    person: TypedElement::from_element(&person),
                    appointment,
                })
            })
            .collect()
    }
}
