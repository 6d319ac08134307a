use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ListUpdate;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub likes: Vec<Uuid>,
    pub watch_later: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

/// The two mutable list fields of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Likes,
    WatchLater,
}

impl UserList {
    fn column(self) -> &'static str {
        match self {
            UserList::Likes => "likes",
            UserList::WatchLater => "watch_later",
        }
    }
}

/// One UPDATE statement per (list, op) pair. Both ops are idempotent at
/// the store: add strips any existing copy before appending, remove of
/// an absent element leaves the array unchanged. No read-then-write.
fn update_list_sql(list: UserList, op: ListUpdate) -> String {
    let col = list.column();
    match op {
        ListUpdate::Add => format!(
            "UPDATE users SET {col} = array_append(array_remove({col}, $2), $2) WHERE id = $1"
        ),
        ListUpdate::Remove => {
            format!("UPDATE users SET {col} = array_remove({col}, $2) WHERE id = $1")
        }
    }
}

impl User {
    pub async fn name_exists(db: &PgPool, name: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE name = $1)"#)
                .bind(name)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    /// Find a user by exact name match.
    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, likes, watch_later, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, likes, watch_later, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password and empty lists.
    pub async fn create(db: &PgPool, name: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password_hash)
            VALUES ($1, $2)
            RETURNING id, name, password_hash, likes, watch_later, created_at
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Apply one idempotent add/remove to the given list. Returns whether
    /// the update matched a row; false means no such user, regardless of
    /// whether the video was present.
    pub async fn update_list(
        db: &PgPool,
        user_id: Uuid,
        list: UserList,
        video_id: Uuid,
        op: ListUpdate,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(&update_list_sql(list, op))
            .bind(user_id)
            .bind(video_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_columns() {
        assert_eq!(UserList::Likes.column(), "likes");
        assert_eq!(UserList::WatchLater.column(), "watch_later");
    }

    #[test]
    fn add_is_a_single_statement_with_dedup() {
        let sql = update_list_sql(UserList::Likes, ListUpdate::Add);
        assert_eq!(
            sql,
            "UPDATE users SET likes = array_append(array_remove(likes, $2), $2) WHERE id = $1"
        );
    }

    #[test]
    fn remove_is_a_single_statement() {
        let sql = update_list_sql(UserList::WatchLater, ListUpdate::Remove);
        assert_eq!(
            sql,
            "UPDATE users SET watch_later = array_remove(watch_later, $2) WHERE id = $1"
        );
    }
}
