//! Generic element handler shared by the governance program services.
//!
//! # Responsibility
//! - Authorize the caller, validate input, and delegate to the metadata
//!   repository for every element kind.
//! - Check relationship end kinds before links are written.
//!
//! # Invariants
//! - Every operation authorizes the caller before touching the store.
//! - Lookups by guid fail with `UnrecognizedIdentifier` when the element is
//!   missing, deleted, or of another kind.
//! - Page sizes are clamped to `MAX_PAGE_SIZE`.

use crate::clock::{Clock, SystemClock};
use crate::model::element::{Element, ElementId, ElementKind};
use crate::model::governance::{ElementProperties, TypedElement};
use crate::model::relationship::{
    RelatedElement, Relationship, RelationshipEnd, RelationshipId, RelationshipKind,
    RelationshipProperties,
};
use crate::repo::element_repo::{ElementListQuery, RepoError};
use crate::repo::MetadataRepository;
use crate::security::{AccessAction, AccessPolicy, OpenAccessPolicy};
use crate::service::error::{GovernanceError, GovernanceResult};
use log::{info, warn};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 500;

/// Paging request for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub start_from: u32,
    /// `0` selects `DEFAULT_PAGE_SIZE`.
    pub page_size: u32,
}

impl Paging {
    pub fn new(start_from: u32, page_size: u32) -> Self {
        Self {
            start_from,
            page_size,
        }
    }

    /// Effective page size after defaulting and clamping.
    pub fn applied_page_size(self) -> u32 {
        match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            value => value.min(MAX_PAGE_SIZE),
        }
    }

    fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.start_from as usize)
            .take(self.applied_page_size() as usize)
            .collect()
    }
}

/// Collaborators shared by every handler: access policy and time source.
#[derive(Clone)]
pub struct ServiceContext {
    policy: Arc<dyn AccessPolicy>,
    clock: Arc<dyn Clock>,
}

impl ServiceContext {
    pub fn new(policy: Arc<dyn AccessPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self { policy, clock }
    }

    pub fn now(&self) -> i64 {
        self.clock.now_epoch_ms()
    }
}

impl Default for ServiceContext {
    fn default() -> Self {
        Self::new(Arc::new(OpenAccessPolicy), Arc::new(SystemClock))
    }
}

/// Kind-agnostic CRUD and link handler over a metadata repository.
pub struct ElementHandler<R: MetadataRepository> {
    repo: R,
    context: ServiceContext,
}

impl<R: MetadataRepository> ElementHandler<R> {
    pub fn new(repo: R, context: ServiceContext) -> Self {
        Self { repo, context }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn now(&self) -> i64 {
        self.context.now()
    }

    /// Rejects blank user ids and callers the policy denies.
    pub fn authorize(&self, user_id: &str, action: AccessAction) -> GovernanceResult<()> {
        if user_id.trim().is_empty() {
            return Err(GovernanceError::invalid_parameter(
                "userId",
                "user id must not be blank",
            ));
        }
        if !self.context.policy.is_permitted(user_id, action) {
            warn!(
                "event=access_denied module=service status=error user_id={} action={}",
                user_id, action
            );
            return Err(GovernanceError::NotAuthorized {
                user_id: user_id.to_string(),
                action: action.as_str(),
            });
        }
        Ok(())
    }

    /// Creates an element of `P::KIND` from typed properties.
    pub fn create<P: ElementProperties>(
        &self,
        user_id: &str,
        properties: &P,
    ) -> GovernanceResult<ElementId> {
        self.authorize(user_id, AccessAction::Create)?;

        let mut element = Element::new(P::KIND, "");
        properties.apply_to(&mut element, false);
        element.validate()?;
        let guid = self.repo.create_element(&element)?;
        info!(
            "event=element_create module=service status=ok kind={} guid={}",
            P::KIND,
            guid
        );
        Ok(guid)
    }

    /// Replaces or merges the properties of an existing element.
    pub fn update<P: ElementProperties>(
        &self,
        user_id: &str,
        guid: ElementId,
        properties: &P,
        is_merge_update: bool,
    ) -> GovernanceResult<()> {
        self.authorize(user_id, AccessAction::Update)?;

        let mut element = self.load(guid, P::KIND)?;
        properties.apply_to(&mut element, is_merge_update);
        element.validate()?;
        self.repo.update_element(&element)?;
        info!(
            "event=element_update module=service status=ok kind={} guid={} merge={}",
            element.kind, guid, is_merge_update
        );
        Ok(())
    }

    /// Soft-deletes an element of `kind`; attached relationships go with it.
    pub fn delete(&self, user_id: &str, guid: ElementId, kind: ElementKind) -> GovernanceResult<()> {
        self.authorize(user_id, AccessAction::Delete)?;

        let element = self.load(guid, kind)?;
        self.repo.soft_delete_element(guid)?;
        info!(
            "event=element_delete module=service status=ok kind={} guid={}",
            element.kind, guid
        );
        Ok(())
    }

    pub fn get_element(
        &self,
        user_id: &str,
        guid: ElementId,
        kind: ElementKind,
    ) -> GovernanceResult<Element> {
        self.authorize(user_id, AccessAction::Read)?;
        self.load(guid, kind)
    }

    pub fn get<P: ElementProperties>(
        &self,
        user_id: &str,
        guid: ElementId,
    ) -> GovernanceResult<TypedElement<P>> {
        self.get_element(user_id, guid, P::KIND)
            .map(|element| TypedElement::from_element(&element))
    }

    /// Exact-name lookup on qualified or display name.
    pub fn find_by_name<P: ElementProperties>(
        &self,
        user_id: &str,
        name: &str,
        paging: Paging,
    ) -> GovernanceResult<Vec<TypedElement<P>>> {
        self.authorize(user_id, AccessAction::Read)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(GovernanceError::invalid_parameter(
                "name",
                "name must not be blank",
            ));
        }

        let elements = self
            .repo
            .find_elements_by_name(name, &list_query::<P>(None, paging))?;
        Ok(typed(elements))
    }

    /// Lists elements of `P::KIND`, optionally restricted to one domain.
    pub fn list<P: ElementProperties>(
        &self,
        user_id: &str,
        domain_identifier: Option<i32>,
        paging: Paging,
    ) -> GovernanceResult<Vec<TypedElement<P>>> {
        self.authorize(user_id, AccessAction::Read)?;
        if let Some(value) = domain_identifier.filter(|value| *value < 0) {
            return Err(GovernanceError::invalid_parameter(
                "domainIdentifier",
                format!("domain identifier must not be negative, got {value}"),
            ));
        }

        let elements = self
            .repo
            .list_elements(&list_query::<P>(domain_identifier, paging))?;
        Ok(typed(elements))
    }

    /// Every active element of `P::KIND` whose extended property `key` equals `value`.
    pub fn find_by_extended<P: ElementProperties>(
        &self,
        user_id: &str,
        key: &str,
        value: &str,
    ) -> GovernanceResult<Vec<TypedElement<P>>> {
        self.authorize(user_id, AccessAction::Read)?;
        let query = ElementListQuery {
            kind: (P::KIND != ElementKind::Referenceable).then_some(P::KIND),
            extended_property: Some((key.to_string(), value.to_string())),
            ..ElementListQuery::default()
        };
        Ok(typed(self.repo.list_elements(&query)?))
    }

    /// Links `end1` to `end2` after checking both end kinds.
    ///
    /// An existing `kind` link between the same ends is updated in place
    /// rather than duplicated.
    pub fn link(
        &self,
        user_id: &str,
        kind: RelationshipKind,
        end1: ElementId,
        end2: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<RelationshipId> {
        self.authorize(user_id, AccessAction::Link)?;

        let existing = self.repo.find_relationships_between(kind, end1, end2)?;
        match existing.first() {
            Some(relationship) => {
                properties.validate_for(kind)?;
                self.repo
                    .update_relationship_properties(relationship.guid, properties)?;
                info!(
                    "event=relationship_update module=service status=ok kind={} guid={}",
                    kind, relationship.guid
                );
                Ok(relationship.guid)
            }
            None => self
                .add_checked_relationship(kind, end1, end2, properties)
                .map(|relationship| relationship.guid),
        }
    }

    /// Removes every `kind` relationship from `end1` to `end2`.
    ///
    /// Clearing a link that does not exist is a no-op.
    pub fn unlink(
        &self,
        user_id: &str,
        kind: RelationshipKind,
        end1: ElementId,
        end2: ElementId,
    ) -> GovernanceResult<()> {
        self.authorize(user_id, AccessAction::Link)?;
        let (end1_kind, end2_kind) = kind.end_kinds();
        self.load(end1, end1_kind)?;
        self.load(end2, end2_kind)?;

        let relationships = self.repo.find_relationships_between(kind, end1, end2)?;
        for relationship in &relationships {
            self.repo.remove_relationship(relationship.guid)?;
        }
        info!(
            "event=relationship_clear module=service status=ok kind={} end1={} end2={} removed={}",
            kind,
            end1,
            end2,
            relationships.len()
        );
        Ok(())
    }

    /// Replaces window and attributes of an existing relationship whose kind
    /// is one of `allowed`.
    pub fn update_link(
        &self,
        user_id: &str,
        relationship_id: RelationshipId,
        allowed: &[RelationshipKind],
        properties: &RelationshipProperties,
    ) -> GovernanceResult<()> {
        self.authorize(user_id, AccessAction::Link)?;
        let relationship = self
            .repo
            .get_relationship(relationship_id)?
            .ok_or_else(|| GovernanceError::unrecognized(relationship_id, "relationship"))?;
        if !allowed.contains(&relationship.kind) {
            warn!(
                "event=relationship_update module=service status=error guid={} kind={}",
                relationship_id, relationship.kind
            );
            return Err(GovernanceError::invalid_parameter(
                "relationshipGUID",
                format!(
                    "relationship {relationship_id} is a {} link and cannot be updated here",
                    relationship.kind
                ),
            ));
        }
        self.repo
            .update_relationship_properties(relationship_id, properties)
            .map_err(|err| match err {
                RepoError::NotFound(id) => GovernanceError::unrecognized(id, "relationship"),
                other => other.into(),
            })
    }

    /// Lists elements reached through `kind` relationships starting at `element`.
    ///
    /// `from` names the end `element` must occupy.
    pub fn related(
        &self,
        user_id: &str,
        element: ElementId,
        kind: RelationshipKind,
        from: RelationshipEnd,
        paging: Paging,
    ) -> GovernanceResult<Vec<RelatedElement>> {
        self.authorize(user_id, AccessAction::Read)?;
        let (end1_kind, end2_kind) = kind.end_kinds();
        let anchor_kind = match from {
            RelationshipEnd::End1 => end1_kind,
            RelationshipEnd::End2 => end2_kind,
        };
        self.load(element, anchor_kind)?;

        let relationships = self
            .repo
            .find_relationships_for_entity(element, kind)?
            .into_iter()
            .filter(|relationship| match from {
                RelationshipEnd::End1 => relationship.end1_guid == element,
                RelationshipEnd::End2 => relationship.end2_guid == element,
            })
            .collect::<Vec<_>>();

        paging
            .apply(relationships)
            .into_iter()
            .map(|relationship| self.resolve_other_end(element, relationship))
            .collect()
    }

    /// Loads an active element and checks its kind.
    pub(crate) fn load(&self, guid: ElementId, expected: ElementKind) -> GovernanceResult<Element> {
        match self.repo.get_element(guid, false)? {
            Some(element) if expected.accepts(element.kind) => Ok(element),
            _ => Err(GovernanceError::unrecognized(guid, expected.as_str())),
        }
    }

    /// Adds a relationship without authorizing; callers authorize first.
    pub(crate) fn add_checked_relationship(
        &self,
        kind: RelationshipKind,
        end1: ElementId,
        end2: ElementId,
        properties: &RelationshipProperties,
    ) -> GovernanceResult<Relationship> {
        let (end1_kind, end2_kind) = kind.end_kinds();
        self.load(end1, end1_kind)?;
        self.load(end2, end2_kind)?;
        properties.validate_for(kind)?;

        let relationship = self.repo.add_relationship(kind, properties, end1, end2)?;
        info!(
            "event=relationship_add module=service status=ok kind={} guid={} end1={} end2={}",
            kind, relationship.guid, end1, end2
        );
        Ok(relationship)
    }

    fn resolve_other_end(
        &self,
        element: ElementId,
        relationship: Relationship,
    ) -> GovernanceResult<RelatedElement> {
        let other = relationship.other_end(element).ok_or_else(|| {
            GovernanceError::PropertyServerUnavailable(RepoError::InvalidData(format!(
                "relationship {} does not touch element {element}",
                relationship.guid
            )))
        })?;
        let related = self.repo.get_element(other, false)?.ok_or_else(|| {
            GovernanceError::PropertyServerUnavailable(RepoError::InvalidData(format!(
                "relationship {} points at missing element {other}",
                relationship.guid
            )))
        })?;
        Ok(RelatedElement {
            relationship,
            element: related,
        })
    }
}

fn list_query<P: ElementProperties>(domain_identifier: Option<i32>, paging: Paging) -> ElementListQuery {
    ElementListQuery {
        kind: (P::KIND != ElementKind::Referenceable).then_some(P::KIND),
        domain_identifier,
        extended_property: None,
        include_deleted: false,
        limit: Some(paging.applied_page_size()),
        offset: paging.start_from,
    }
}

fn typed<P: ElementProperties>(elements: Vec<Element>) -> Vec<TypedElement<P>> {
    elements.iter().map(TypedElement::from_element).collect()
}

#[cfg(test)]
mod tests {
    use super::{Paging, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(Paging::new(0, 0).applied_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(Paging::new(0, 25).applied_page_size(), 25);
        assert_eq!(Paging::new(0, 10_000).applied_page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn apply_skips_and_takes() {
        let page = Paging::new(2, 3).apply((0..10).collect::<Vec<_>>());
        assert_eq!(page, vec![2, 3, 4]);
    }
}
