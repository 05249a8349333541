use serde::Deserialize;

use bookshelf_db::NewPublisher;

/// Request model for creating a new publisher.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublisher {
    pub name: String,
}

impl From<CreatePublisher> for NewPublisher {
    fn from(body: CreatePublisher) -> Self {
        Self { name: body.name }
    }
}
