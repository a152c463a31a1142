//! Relationship repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store typed links between active elements with effectivity windows.
//! - Answer "relationships of kind K touching entity E" queries.
//!
//! # Invariants
//! - Both ends of a new relationship must be active elements.
//! - Properties are validated against the relationship kind before writes.
//! - Query results keep insertion order.

use crate::model::element::ElementId;
use crate::model::relationship::{
    Relationship, RelationshipId, RelationshipKind, RelationshipProperties,
};
use crate::repo::element_repo::{
    active_element_kind, decode_map, encode_map, parse_uuid, RepoError, RepoResult,
    SqliteMetadataRepository,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const RELATIONSHIP_SELECT_SQL: &str = "SELECT
    guid,
    kind,
    end1_guid,
    end2_guid,
    effective_from,
    effective_to,
    attributes
FROM relationships";

/// Repository interface for relationship operations.
pub trait RelationshipRepository {
    /// Stores a new relationship from `end1` to `end2`.
    fn add_relationship(
        &self,
        kind: RelationshipKind,
        properties: &RelationshipProperties,
        end1: ElementId,
        end2: ElementId,
    ) -> RepoResult<Relationship>;
    /// Replaces window and attributes of an existing relationship.
    fn update_relationship_properties(
        &self,
        id: RelationshipId,
        properties: &RelationshipProperties,
    ) -> RepoResult<()>;
    fn get_relationship(&self, id: RelationshipId) -> RepoResult<Option<Relationship>>;
    /// Lists relationships of `kind` where `entity` sits at either end.
    fn find_relationships_for_entity(
        &self,
        entity: ElementId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>>;
    /// Lists relationships of `kind` from `end1` to `end2`.
    fn find_relationships_between(
        &self,
        kind: RelationshipKind,
        end1: ElementId,
        end2: ElementId,
    ) -> RepoResult<Vec<Relationship>>;
    fn remove_relationship(&self, id: RelationshipId) -> RepoResult<()>;
}

impl RelationshipRepository for SqliteMetadataRepository<'_> {
    fn add_relationship(
        &self,
        kind: RelationshipKind,
        properties: &RelationshipProperties,
        end1: ElementId,
        end2: ElementId,
    ) -> RepoResult<Relationship> {
        properties.validate_for(kind)?;
        for end in [end1, end2] {
            if active_element_kind(self.conn, end)?.is_none() {
                return Err(RepoError::NotFound(end));
            }
        }

        let relationship = Relationship {
            guid: Uuid::new_v4(),
            kind,
            end1_guid: end1,
            end2_guid: end2,
            properties: properties.clone(),
        };
        self.conn.execute(
            "INSERT INTO relationships (
                guid,
                kind,
                end1_guid,
                end2_guid,
                effective_from,
                effective_to,
                attributes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                relationship.guid.to_string(),
                kind.as_str(),
                end1.to_string(),
                end2.to_string(),
                properties.effective_from,
                properties.effective_to,
                encode_map(&properties.attributes)?,
            ],
        )?;

        Ok(relationship)
    }

    fn update_relationship_properties(
        &self,
        id: RelationshipId,
        properties: &RelationshipProperties,
    ) -> RepoResult<()> {
        let existing = self.get_relationship(id)?.ok_or(RepoError::NotFound(id))?;
        properties.validate_for(existing.kind)?;

        let changed = self.conn.execute(
            "UPDATE relationships
             SET
                effective_from = ?1,
                effective_to = ?2,
                attributes = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE guid = ?4;",
            params![
                properties.effective_from,
                properties.effective_to,
                encode_map(&properties.attributes)?,
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_relationship(&self, id: RelationshipId) -> RepoResult<Option<Relationship>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RELATIONSHIP_SELECT_SQL} WHERE guid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_relationship_row(row)?));
        }
        Ok(None)
    }

    fn find_relationships_for_entity(
        &self,
        entity: ElementId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>> {
        query_relationships(
            self.conn,
            &format!(
                "{RELATIONSHIP_SELECT_SQL}
                 WHERE kind = ?1
                   AND (end1_guid = ?2 OR end2_guid = ?2)
                 ORDER BY rowid ASC;"
            ),
            params![kind.as_str(), entity.to_string()],
        )
    }

    fn find_relationships_between(
        &self,
        kind: RelationshipKind,
        end1: ElementId,
        end2: ElementId,
    ) -> RepoResult<Vec<Relationship>> {
        query_relationships(
            self.conn,
            &format!(
                "{RELATIONSHIP_SELECT_SQL}
                 WHERE kind = ?1
                   AND end1_guid = ?2
                   AND end2_guid = ?3
                 ORDER BY rowid ASC;"
            ),
            params![kind.as_str(), end1.to_string(), end2.to_string()],
        )
    }

    fn remove_relationship(&self, id: RelationshipId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM relationships WHERE guid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn query_relationships(
    conn: &Connection,
    sql: &str,
    bind_values: impl rusqlite::Params,
) -> RepoResult<Vec<Relationship>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind_values)?;
    let mut relationships = Vec::new();
    while let Some(row) = rows.next()? {
        relationships.push(parse_relationship_row(row)?);
    }
    Ok(relationships)
}

fn parse_relationship_row(row: &Row<'_>) -> RepoResult<Relationship> {
    let guid_text: String = row.get("guid")?;
    let end1_text: String = row.get("end1_guid")?;
    let end2_text: String = row.get("end2_guid")?;

    let kind_text: String = row.get("kind")?;
    let kind = RelationshipKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid relationship kind `{kind_text}` in relationships.kind"
        ))
    })?;

    let attributes: String = row.get("attributes")?;

    Ok(Relationship {
        guid: parse_uuid(&guid_text, "relationships.guid")?,
        kind,
        end1_guid: parse_uuid(&end1_text, "relationships.end1_guid")?,
        end2_guid: parse_uuid(&end2_text, "relationships.end2_guid")?,
        properties: RelationshipProperties {
            effective_from: row.get("effective_from")?,
            effective_to: row.get("effective_to")?,
            attributes: decode_map(&attributes, "relationships.attributes")?,
        },
    })
}
