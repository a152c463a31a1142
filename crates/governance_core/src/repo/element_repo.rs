//! Element repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over canonical `elements` storage.
//! - Keep SQL details inside the metadata store boundary.
//!
//! # Invariants
//! - Write paths call `Element::validate()` before SQL mutations.
//! - Active qualified names are unique; duplicates surface as
//!   `RepoError::DuplicateQualifiedName` instead of a constraint failure.
//! - Soft delete removes every relationship attached to the element in the
//!   same transaction.

use crate::db::migrations::ensure_migrated;
use crate::db::DbError;
use crate::model::element::{Element, ElementId, ElementKind, ElementValidationError};
use crate::model::relationship::RelationshipValidationError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ELEMENT_SELECT_SQL: &str = "SELECT
    guid,
    kind,
    qualified_name,
    display_name,
    description,
    domain_identifier,
    additional_properties,
    extended_properties,
    is_deleted
FROM elements";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for metadata persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ElementValidationError),
    RelationshipValidation(RelationshipValidationError),
    Db(DbError),
    /// Element or relationship does not exist (or is soft-deleted).
    NotFound(Uuid),
    DuplicateQualifiedName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RelationshipValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "metadata instance not found: {id}"),
            Self::DuplicateQualifiedName(name) => {
                write!(f, "qualified name already in use: `{name}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted metadata: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::RelationshipValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateQualifiedName(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ElementValidationError> for RepoError {
    fn from(value: ElementValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RelationshipValidationError> for RepoError {
    fn from(value: RelationshipValidationError) -> Self {
        Self::RelationshipValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and paging options for element listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementListQuery {
    /// `None` lists every kind.
    pub kind: Option<ElementKind>,
    /// `None` or `Some(0)` lists every domain.
    pub domain_identifier: Option<i32>,
    /// Exact match on one extended property, as `(key, value)`.
    pub extended_property: Option<(String, String)>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for element CRUD operations.
pub trait ElementRepository {
    fn create_element(&self, element: &Element) -> RepoResult<ElementId>;
    fn update_element(&self, element: &Element) -> RepoResult<()>;
    fn get_element(&self, id: ElementId, include_deleted: bool) -> RepoResult<Option<Element>>;
    /// Exact match on qualified name or display name.
    fn find_elements_by_name(&self, name: &str, query: &ElementListQuery)
        -> RepoResult<Vec<Element>>;
    fn list_elements(&self, query: &ElementListQuery) -> RepoResult<Vec<Element>>;
    fn soft_delete_element(&self, id: ElementId) -> RepoResult<()>;
}

/// SQLite-backed metadata repository for elements and relationships.
#[derive(Debug, Clone, Copy)]
pub struct SqliteMetadataRepository<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteMetadataRepository<'conn> {
    /// Creates a repository over a fully migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl ElementRepository for SqliteMetadataRepository<'_> {
    fn create_element(&self, element: &Element) -> RepoResult<ElementId> {
        element.validate()?;
        ensure_qualified_name_free(self.conn, &element.qualified_name, None)?;

        self.conn.execute(
            "INSERT INTO elements (
                guid,
                kind,
                qualified_name,
                display_name,
                description,
                domain_identifier,
                additional_properties,
                extended_properties,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                element.guid.to_string(),
                element.kind.as_str(),
                element.qualified_name.as_str(),
                element.display_name.as_deref(),
                element.description.as_deref(),
                element.domain_identifier,
                encode_map(&element.additional_properties)?,
                encode_map(&element.extended_properties)?,
                bool_to_int(element.is_deleted),
            ],
        )?;

        Ok(element.guid)
    }

    fn update_element(&self, element: &Element) -> RepoResult<()> {
        element.validate()?;
        ensure_qualified_name_free(self.conn, &element.qualified_name, Some(element.guid))?;

        let changed = self.conn.execute(
            "UPDATE elements
             SET
                qualified_name = ?1,
                display_name = ?2,
                description = ?3,
                domain_identifier = ?4,
                additional_properties = ?5,
                extended_properties = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE guid = ?7
               AND kind = ?8
               AND is_deleted = 0;",
            params![
                element.qualified_name.as_str(),
                element.display_name.as_deref(),
                element.description.as_deref(),
                element.domain_identifier,
                encode_map(&element.additional_properties)?,
                encode_map(&element.extended_properties)?,
                element.guid.to_string(),
                element.kind.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(element.guid));
        }
        Ok(())
    }

    fn get_element(&self, id: ElementId, include_deleted: bool) -> RepoResult<Option<Element>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ELEMENT_SELECT_SQL}
             WHERE guid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_element_row(row)?));
        }
        Ok(None)
    }

    fn find_elements_by_name(
        &self,
        name: &str,
        query: &ElementListQuery,
    ) -> RepoResult<Vec<Element>> {
        let mut sql = format!("{ELEMENT_SELECT_SQL} WHERE (qualified_name = ? OR display_name = ?)");
        let mut bind_values = vec![Value::Text(name.to_string()), Value::Text(name.to_string())];
        append_filters(&mut sql, &mut bind_values, query);
        query_elements(self.conn, &sql, bind_values)
    }

    fn list_elements(&self, query: &ElementListQuery) -> RepoResult<Vec<Element>> {
        let mut sql = format!("{ELEMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();
        append_filters(&mut sql, &mut bind_values, query);
        query_elements(self.conn, &sql, bind_values)
    }

    fn soft_delete_element(&self, id: ElementId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE elements
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE guid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM relationships
             WHERE end1_guid = ?1
                OR end2_guid = ?1;",
            [id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn append_filters(sql: &mut String, bind_values: &mut Vec<Value>, query: &ElementListQuery) {
    if !query.include_deleted {
        sql.push_str(" AND is_deleted = 0");
    }

    if let Some(kind) = query.kind {
        sql.push_str(" AND kind = ?");
        bind_values.push(Value::Text(kind.as_str().to_string()));
    }

    if let Some(domain_identifier) = query.domain_identifier.filter(|value| *value != 0) {
        sql.push_str(" AND domain_identifier = ?");
        bind_values.push(Value::Integer(i64::from(domain_identifier)));
    }

    if let Some((key, value)) = &query.extended_property {
        sql.push_str(" AND json_extract(extended_properties, ?) = ?");
        bind_values.push(Value::Text(format!("$.\"{key}\"")));
        bind_values.push(Value::Text(value.clone()));
    }

    sql.push_str(" ORDER BY qualified_name ASC, guid ASC");

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }
    } else if query.offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(query.offset)));
    }
}

fn query_elements(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<Element>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut elements = Vec::new();
    while let Some(row) = rows.next()? {
        elements.push(parse_element_row(row)?);
    }
    Ok(elements)
}

fn ensure_qualified_name_free(
    conn: &Connection,
    qualified_name: &str,
    owner: Option<ElementId>,
) -> RepoResult<()> {
    let holder: Option<String> = conn
        .query_row(
            "SELECT guid
             FROM elements
             WHERE qualified_name = ?1
               AND is_deleted = 0;",
            [qualified_name],
            |row| row.get(0),
        )
        .optional()?;

    match holder {
        Some(guid) if owner.map(|id| id.to_string()).as_deref() != Some(guid.as_str()) => Err(
            RepoError::DuplicateQualifiedName(qualified_name.to_string()),
        ),
        _ => Ok(()),
    }
}

/// Returns the kind of an active element, if present.
pub(crate) fn active_element_kind(
    conn: &Connection,
    id: ElementId,
) -> RepoResult<Option<ElementKind>> {
    let kind: Option<String> = conn
        .query_row(
            "SELECT kind
             FROM elements
             WHERE guid = ?1
               AND is_deleted = 0;",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    kind.map(|value| {
        ElementKind::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid element kind `{value}` in elements.kind"))
        })
    })
    .transpose()
}

fn parse_element_row(row: &Row<'_>) -> RepoResult<Element> {
    let guid_text: String = row.get("guid")?;
    let guid = parse_uuid(&guid_text, "elements.guid")?;

    let kind_text: String = row.get("kind")?;
    let kind = ElementKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid element kind `{kind_text}` in elements.kind"))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in elements.is_deleted"
            )));
        }
    };

    let additional_properties: String = row.get("additional_properties")?;
    let extended_properties: String = row.get("extended_properties")?;

    let element = Element {
        guid,
        kind,
        qualified_name: row.get("qualified_name")?,
        display_name: row.get("display_name")?,
        description: row.get("description")?,
        domain_identifier: row.get("domain_identifier")?,
        additional_properties: decode_map(&additional_properties, "elements.additional_properties")?,
        extended_properties: decode_map(&extended_properties, "elements.extended_properties")?,
        is_deleted,
    };
    element.validate()?;
    Ok(element)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn encode_map(map: &BTreeMap<String, String>) -> RepoResult<String> {
    serde_json::to_string(map)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode property map: {err}")))
}

pub(crate) fn decode_map(
    value: &str,
    column: &'static str,
) -> RepoResult<BTreeMap<String, String>> {
    serde_json::from_str(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid property map in {column}: {err}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
