//! Subject area use-case service.
//!
//! # Responsibility
//! - CRUD over subject areas.
//! - Maintain the subject area hierarchy.
//!
//! # Invariants
//! - A subject area has at most one parent.
//! - The hierarchy never contains a cycle, self-links included.

use crate::model::element::{ElementId, ElementKind};
use crate::model::governance::{SubjectAreaProperties, TypedElement};
use crate::model::relationship::{RelationshipEnd, RelationshipKind, RelationshipProperties};
use crate::repo::MetadataRepository;
use crate::security::AccessAction;
use crate::service::error::{GovernanceError, GovernanceResult};
use crate::service::handler::{ElementHandler, Paging, ServiceContext};
use std::collections::HashSet;

pub type SubjectAreaElement = TypedElement<SubjectAreaProperties>;

/// Subject area service facade.
pub struct SubjectAreaService<R: MetadataRepository> {
    handler: ElementHandler<R>,
}

impl<R: MetadataRepository> SubjectAreaService<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self {
            handler: ElementHandler::new(repo, context),
        }
    }

    pub fn create_subject_area(
        &self,
        user_id: &str,
        properties: &SubjectAreaProperties,
    ) -> GovernanceResult<ElementId> {
        self.handler.create(user_id, properties)
    }

    pub fn update_subject_area(
        &self,
        user_id: &str,
        subject_area_guid: ElementId,
        properties: &SubjectAreaProperties,
        is_merge_update: bool,
    ) -> GovernanceResult<()> {
        self.handler
            .update(user_id, subject_area_guid, properties, is_merge_update)
    }

    /// Soft-deletes a subject area; its children become roots.
    pub fn delete_subject_area(
        &self,
        user_id: &str,
        subject_area_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler
            .delete(user_id, subject_area_guid, ElementKind::SubjectArea)
    }

    pub fn get_subject_area_by_guid(
        &self,
        user_id: &str,
        subject_area_guid: ElementId,
    ) -> GovernanceResult<SubjectAreaElement> {
        self.handler.get(user_id, subject_area_guid)
    }

    pub fn get_subject_areas_by_name(
        &self,
        user_id: &str,
        name: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<SubjectAreaElement>> {
        self.handler.find_by_name(user_id, name, paging)
    }

    /// Subject areas in one governance domain; `0` lists every domain.
    pub fn get_subject_areas_by_domain(
        &self,
        user_id: &str,
        domain_identifier: i32,
        paging: Paging,
    ) -> GovernanceResult<Vec<SubjectAreaElement>> {
        self.handler.list(user_id, Some(domain_identifier), paging)
    }

    /// Makes `child_guid` a direct child of `parent_guid`.
    pub fn link_subject_areas_in_hierarchy(
        &self,
        user_id: &str,
        parent_guid: ElementId,
        child_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.authorize(user_id, AccessAction::Link)?;
        if parent_guid == child_guid {
            return Err(GovernanceError::invalid_parameter(
                "childSubjectAreaGUID",
                "a subject area cannot be its own parent",
            ));
        }
        self.handler.load(parent_guid, ElementKind::SubjectArea)?;
        self.handler.load(child_guid, ElementKind::SubjectArea)?;

        match self.parent_of(child_guid)? {
            Some(existing) if existing == parent_guid => return Ok(()),
            Some(existing) => {
                return Err(GovernanceError::invalid_parameter(
                    "childSubjectAreaGUID",
                    format!("subject area {child_guid} already has parent {existing}"),
                ))
            }
            None => {}
        }
        if self.would_create_cycle(child_guid, parent_guid)? {
            return Err(GovernanceError::invalid_parameter(
                "parentSubjectAreaGUID",
                format!("linking {child_guid} under {parent_guid} would create a cycle"),
            ));
        }

        self.handler.link(
            user_id,
            RelationshipKind::SubjectAreaHierarchy,
            parent_guid,
            child_guid,
            &RelationshipProperties::new(),
        )?;
        Ok(())
    }

    pub fn remove_subject_area_from_hierarchy(
        &self,
        user_id: &str,
        parent_guid: ElementId,
        child_guid: ElementId,
    ) -> GovernanceResult<()> {
        self.handler.unlink(
            user_id,
            RelationshipKind::SubjectAreaHierarchy,
            parent_guid,
            child_guid,
        )
    }

    pub fn get_subject_area_children(
        &self,
        user_id: &str,
        parent_guid: ElementId,
        paging: Paging,
    ) -> GovernanceResult<Vec<SubjectAreaElement>> {
        let related = self.handler.related(
            user_id,
            parent_guid,
            RelationshipKind::SubjectAreaHierarchy,
            RelationshipEnd::End1,
            paging,
        )?;
        Ok(related
            .iter()
            .map(|item| TypedElement::from_element(&item.element))
            .collect())
    }

    pub fn get_subject_area_parent(
        &self,
        user_id: &str,
        child_guid: ElementId,
    ) -> GovernanceResult<Option<SubjectAreaElement>> {
        let related = self.handler.related(
            user_id,
            child_guid,
            RelationshipKind::SubjectAreaHierarchy,
            RelationshipEnd::End2,
            Paging::new(0, 1),
        )?;
        Ok(related
            .first()
            .map(|item| TypedElement::from_element(&item.element)))
    }

    fn parent_of(&self, subject_area_guid: ElementId) -> GovernanceResult<Option<ElementId>> {
        Ok(self
            .handler
            .repo()
            .find_relationships_for_entity(subject_area_guid, RelationshipKind::SubjectAreaHierarchy)?
            .into_iter()
            .find(|relationship| relationship.end2_guid == subject_area_guid)
            .map(|relationship| relationship.end1_guid))
    }

    fn would_create_cycle(
        &self,
        child_guid: ElementId,
        candidate_parent_guid: ElementId,
    ) -> GovernanceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_guid);
        while let Some(current) = cursor {
            if current == child_guid || !visited.insert(current) {
                return Ok(true);
            }
            cursor = self.parent_of(current)?;
        }
        Ok(false)
    }
}
