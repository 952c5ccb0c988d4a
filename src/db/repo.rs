use sqlx::SqlitePool;
use crate::db::models::User;

pub async fn create_user_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // AUTOINCREMENT keeps ids monotone: a deleted id is never handed out again.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(20) NOT NULL,
            email VARCHAR(20) NOT NULL UNIQUE,
            idade INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Persists a new row and returns it with its assigned id.
///
/// A duplicate email fails here with the UNIQUE constraint even when the
/// caller forgot to pre-check; the table is the source of truth.
pub async fn insert_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    idade: i64,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, idade)
        VALUES (?, ?, ?)
        RETURNING id, name, email, idade
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(idade)
    .fetch_one(pool)
    .await
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email, idade FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email, idade FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email, idade FROM users")
        .fetch_all(pool)
        .await
}

pub async fn list_users_by_age(pool: &SqlitePool, idade: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email, idade FROM users WHERE idade = ?")
        .bind(idade)
        .fetch_all(pool)
        .await
}

/// Rows with `low <= idade <= high`; BETWEEN is inclusive on both ends.
pub async fn list_users_by_age_range(
    pool: &SqlitePool,
    low: i64,
    high: i64,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email, idade FROM users WHERE idade BETWEEN ? AND ?")
        .bind(low)
        .bind(high)
        .fetch_all(pool)
        .await
}

/// Overwrites all three mutable fields, returning the updated row.
///
/// `None` when no row has that id.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
    idade: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = ?, email = ?, idade = ?
        WHERE id = ?
        RETURNING id, name, email, idade
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(idade)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Removes a row and returns it. A missing id is a no-op, not an error.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("DELETE FROM users WHERE id = ? RETURNING id, name, email, idade")
        .bind(id)
        .fetch_optional(pool)
        .await
}
