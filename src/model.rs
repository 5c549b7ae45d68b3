//! Movie entity and request payload shapes.

use serde::{Deserialize, Serialize};

/// A stored movie row. `id` is assigned by the store on creation and never
/// reassigned; `title` is unique across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: Option<String>,
    pub rating: i32,
}

/// Incoming create/update body. `id` is absent (or ignored) on create and
/// must match the path id on update; `rating` defaults to 0 when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub rating: i32,
}

impl MoviePayload {
    /// Payload for inserting a new row (store assigns the id).
    pub fn new(title: impl Into<String>, director: Option<String>, rating: i32) -> Self {
        MoviePayload {
            id: None,
            title: title.into(),
            director,
            rating,
        }
    }
}
