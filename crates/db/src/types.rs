use serde::{Deserialize, Serialize};

/// A persisted author. The author's book list is never carried on the
/// record itself; it is fetched on demand to keep the object graph acyclic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

/// An opaque identifiable entity: no attributes beyond the system-assigned
/// id have been specified for reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reviewer {
    pub id: i64,
}

/// A book as the API serves it: author and publisher embedded as full
/// objects, one traversal direction only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Author,
    pub publisher: Publisher,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPublisher {
    pub name: String,
}

/// Input for a book save; relations are plain foreign-key values and must
/// reference already-persisted rows.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author_id: i64,
    pub publisher_id: i64,
}

/// Pagination and sorting parameters with Spring-style semantics:
/// zero-indexed `page`, `size` records per page, `sort=field` or
/// `sort=field,desc`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: None,
        }
    }
}

impl Pageable {
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Render an ORDER BY clause, accepting only whitelisted column names.
    /// Unknown fields fall back to `fallback`, unknown directions to ASC,
    /// so a hostile `sort` parameter can never reach the SQL text.
    pub fn order_by(&self, allowed: &[&str], fallback: &str) -> String {
        let (field, direction) = match self.sort.as_deref() {
            Some(raw) => {
                let mut parts = raw.splitn(2, ',');
                let field = parts.next().unwrap_or(fallback).trim();
                let direction = match parts.next().map(str::trim) {
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => "DESC",
                    _ => "ASC",
                };
                (field, direction)
            }
            None => (fallback, "ASC"),
        };

        let column = if allowed.contains(&field) {
            field
        } else {
            fallback
        };
        format!("{column} {direction}")
    }
}
