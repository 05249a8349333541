use serde::Deserialize;

use bookshelf_db::NewAuthor;

/// Request model for creating a new author.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthor {
    pub first_name: String,
    pub last_name: String,
}

impl From<CreateAuthor> for NewAuthor {
    fn from(body: CreateAuthor) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
        }
    }
}
