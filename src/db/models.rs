use serde::{Deserialize, Serialize};

/// A row in the `users` table.
///
/// Field order is the JSON contract: id, name, email, idade.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub idade: i64,
}
