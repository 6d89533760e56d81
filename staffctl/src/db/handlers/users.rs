//! Database repository for users.

use crate::types::{UserId, abbrev_uuid};
use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    },
};
use sqlx::{Connection, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing users
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl UserFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up a user by email (the login identifier).
    #[instrument(skip(self), err)]
    pub async fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // Always generate a new ID for users
        let user_id = Uuid::new_v4();

        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (id, email, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(request.role)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users ORDER BY email OFFSET $1 LIMIT $2")
            .bind(filter.skip)
            .bind(filter.limit)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            UPDATE users
            SET password_hash = COALESCE($2, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.password_hash.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::db::errors::DbError;
    use sqlx::PgPool;

    async fn create_user(pool: &PgPool, email: &str, role: Role) -> UserDBResponse {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        repo.create(&UserCreateDBRequest {
            email: email.to_string(),
            role,
            password_hash: "fake-hash".to_string(),
        })
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn test_create_and_fetch_user(pool: PgPool) {
        let created = create_user(&pool, "worker@example.com", Role::Employee).await;
        assert_eq!(created.role, Role::Employee);

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "worker@example.com");

        let by_email = repo.get_user_by_email("worker@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(repo.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
        create_user(&pool, "dup@example.com", Role::Employee).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let err = repo
            .create(&UserCreateDBRequest {
                email: "dup@example.com".to_string(),
                role: Role::Admin,
                password_hash: "other-hash".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    async fn test_update_password_hash(pool: PgPool) {
        let created = create_user(&pool, "rotate@example.com", Role::Admin).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let updated = repo
            .update(
                created.id,
                &UserUpdateDBRequest {
                    password_hash: Some("new-hash".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.password_hash, "new-hash");
        assert!(updated.updated_at >= created.updated_at);

        // None leaves the hash untouched
        let untouched = repo.update(created.id, &UserUpdateDBRequest::default()).await.unwrap();
        assert_eq!(untouched.password_hash, "new-hash");
    }

    #[sqlx::test]
    async fn test_list_pages_by_email(pool: PgPool) {
        create_user(&pool, "a@example.com", Role::Admin).await;
        create_user(&pool, "b@example.com", Role::Employee).await;
        create_user(&pool, "c@example.com", Role::Employee).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let all = repo.list(&UserFilter::new(0, 100)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].email, "a@example.com");

        let page = repo.list(&UserFilter::new(1, 1)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].email, "b@example.com");
    }

    #[sqlx::test]
    async fn test_delete_user(pool: PgPool) {
        let created = create_user(&pool, "gone@example.com", Role::Employee).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
