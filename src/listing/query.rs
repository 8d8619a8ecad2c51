use rusqlite::types::Value;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use crate::listing::predicate::Predicate;
use crate::models::{Page, VersionToRetrieve};
use crate::repo::page::{page_from_row, version_condition, PAGE_COLUMNS, PAGE_COLUMN_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
    Name,
    DateAdded,
    DisplayOrder,
    Id,
}

impl SortColumn {
    fn sql(&self) -> &'static str {
        match self {
            SortColumn::Name => "cv.name",
            SortColumn::DateAdded => "p.created_ts",
            SortColumn::DisplayOrder => "p.display_order",
            SortColumn::Id => "p.id",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortColumn::Name),
            "date" | "date_added" => Some(SortColumn::DateAdded),
            "order" | "display_order" => Some(SortColumn::DisplayOrder),
            "id" => Some(SortColumn::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Column(SortColumn, SortDirection),
    /// Pages of the given page type before every other page
    PageTypeFirst(i64),
}

impl SortKey {
    fn render(&self, params: &mut Vec<Value>) -> String {
        match self {
            SortKey::Column(column, direction) => format!("{} {}", column.sql(), direction.sql()),
            SortKey::PageTypeFirst(page_type_id) => {
                params.push(Value::Integer(*page_type_id));
                format!("CASE WHEN p.page_type_id = ?{} THEN 0 ELSE 1 END ASC", params.len())
            }
        }
    }
}

/// A raw listing row: the page with its resolved version, plus the joined
/// stack columns (NULL when the page has no stack record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub page: Page,
    pub stack_type: Option<i64>,
    pub section_id: Option<i64>,
}

impl ResultRow {
    pub fn content_id(&self) -> i64 {
        self.page.id
    }

    pub fn type_handle(&self) -> Option<&str> {
        self.page.page_type_handle.as_deref()
    }

    pub fn has_stack_record(&self) -> bool {
        self.stack_type.is_some()
    }
}

/// A fully composed listing query: what to select, which predicates to AND
/// together, and how to order and page the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub version: VersionToRetrieve,
    pub include_system_pages: bool,
    pub join_stacks: bool,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<SortKey>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            version: VersionToRetrieve::Active,
            include_system_pages: false,
            join_stacks: false,
            predicates: Vec::new(),
            order_by: vec![SortKey::Column(SortColumn::Name, SortDirection::Asc)],
            limit: None,
            offset: 0,
        }
    }
}

impl ListingQuery {
    fn stacks_joined(&self) -> bool {
        self.join_stacks || self.predicates.iter().any(Predicate::needs_stacks)
    }

    fn from_clause(&self) -> String {
        let mut from = format!(
            "FROM pages p
             INNER JOIN page_versions cv ON {}
             LEFT JOIN page_types pt ON pt.id = p.page_type_id",
            version_condition(self.version)
        );
        if self.stacks_joined() {
            from.push_str("\n             LEFT JOIN stacks s ON s.page_id = p.id");
        }
        from
    }

    fn where_clause(&self, params: &mut Vec<Value>) -> String {
        let mut conditions = vec!["p.is_active = 1".to_string()];
        if !self.include_system_pages {
            conditions.push("p.is_system = 0".to_string());
        }
        for predicate in &self.predicates {
            conditions.push(predicate.render(params));
        }
        format!("WHERE {}", conditions.join(" AND "))
    }

    /// Render the SELECT statement and its bound values.
    ///
    /// `p.id` is always the last ordering key so pages are deterministic.
    pub fn select_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let stack_columns = if self.stacks_joined() {
            "s.stack_type, s.section_id"
        } else {
            "NULL, NULL"
        };
        let where_clause = self.where_clause(&mut params);

        let mut order: Vec<String> = self.order_by.iter().map(|k| k.render(&mut params)).collect();
        order.push("p.id ASC".to_string());

        let mut sql = format!(
            "SELECT {}, {} {} {} ORDER BY {}",
            PAGE_COLUMNS,
            stack_columns,
            self.from_clause(),
            where_clause,
            order.join(", ")
        );

        if self.limit.is_some() || self.offset > 0 {
            params.push(Value::Integer(self.limit.map(i64::from).unwrap_or(-1)));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
            params.push(Value::Integer(i64::from(self.offset)));
            sql.push_str(&format!(" OFFSET ?{}", params.len()));
        }

        (sql, params)
    }

    /// Render a COUNT statement over the same predicates, ignoring ordering
    /// and pagination
    pub fn count_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let where_clause = self.where_clause(&mut params);
        let sql = format!("SELECT COUNT(*) {} {}", self.from_clause(), where_clause);
        (sql, params)
    }

    /// Run the query and return the raw rows
    pub fn fetch_rows(&self, conn: &Connection) -> Result<Vec<ResultRow>> {
        let (sql, params) = self.select_sql();
        log::debug!("Listing query: {} {:?}", sql, params);

        let mut stmt = conn.prepare(&sql)
            .context("Failed to prepare listing query")?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok(ResultRow {
                page: page_from_row(row)?,
                stack_type: row.get(PAGE_COLUMN_COUNT)?,
                section_id: row.get(PAGE_COLUMN_COUNT + 1)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read listing row")?);
        }
        Ok(results)
    }

    /// Count matching rows, ignoring pagination
    pub fn count(&self, conn: &Connection) -> Result<u64> {
        let (sql, params) = self.count_sql();
        log::debug!("Listing count: {} {:?}", sql, params);

        let count: i64 = conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| row.get(0))
            .context("Failed to count listing rows")?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_sql() {
        let (sql, params) = ListingQuery::default().select_sql();
        assert!(sql.contains("WHERE p.is_active = 1 AND p.is_system = 0"));
        assert!(sql.ends_with("ORDER BY cv.name ASC, p.id ASC"));
        assert!(!sql.contains("LEFT JOIN stacks"));
        assert!(sql.contains("v.is_approved = 1"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_parameters_numbered_across_clauses() {
        let query = ListingQuery {
            predicates: vec![Predicate::ParentId(4), Predicate::SectionId(9)],
            order_by: vec![
                SortKey::PageTypeFirst(2),
                SortKey::Column(SortColumn::Name, SortDirection::Asc),
            ],
            limit: Some(10),
            offset: 20,
            ..ListingQuery::default()
        };
        let (sql, params) = query.select_sql();

        assert!(sql.contains("LEFT JOIN stacks s ON s.page_id = p.id"));
        assert!(sql.contains("p.parent_id = ?1 AND s.section_id = ?2"));
        assert!(sql.contains("ORDER BY CASE WHEN p.page_type_id = ?3 THEN 0 ELSE 1 END ASC, cv.name ASC, p.id ASC"));
        assert!(sql.ends_with("LIMIT ?4 OFFSET ?5"));
        assert_eq!(
            params,
            vec![
                Value::Integer(4),
                Value::Integer(9),
                Value::Integer(2),
                Value::Integer(10),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn test_offset_without_limit() {
        let query = ListingQuery {
            offset: 5,
            ..ListingQuery::default()
        };
        let (sql, params) = query.select_sql();
        assert!(sql.ends_with("LIMIT ?1 OFFSET ?2"));
        assert_eq!(params, vec![Value::Integer(-1), Value::Integer(5)]);
    }

    #[test]
    fn test_count_ignores_order_and_pagination() {
        let query = ListingQuery {
            predicates: vec![Predicate::ParentId(4)],
            order_by: vec![SortKey::PageTypeFirst(2)],
            limit: Some(1),
            ..ListingQuery::default()
        };
        let (sql, params) = query.count_sql();
        assert!(sql.starts_with("SELECT COUNT(*)"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
        assert_eq!(params, vec![Value::Integer(4)]);
    }

    #[test]
    fn test_recent_version_and_system_pages() {
        let query = ListingQuery {
            version: VersionToRetrieve::Recent,
            include_system_pages: true,
            ..ListingQuery::default()
        };
        let (sql, _) = query.select_sql();
        assert!(!sql.contains("is_approved = 1"));
        assert!(!sql.contains("p.is_system = 0"));
    }

    #[test]
    fn test_sort_column_names() {
        assert_eq!(SortColumn::from_str("name"), Some(SortColumn::Name));
        assert_eq!(SortColumn::from_str("date"), Some(SortColumn::DateAdded));
        assert_eq!(SortColumn::from_str("display_order"), Some(SortColumn::DisplayOrder));
        assert_eq!(SortColumn::from_str("nope"), None);
    }
}
