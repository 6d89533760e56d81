//! Database repository for locations.

use crate::{
    api::models::users::Role,
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::locations::{LocationCreateDBRequest, LocationDBResponse},
    },
    types::LocationId,
};
use sqlx::{Connection, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing locations
#[derive(Debug, Clone)]
pub struct LocationFilter {
    pub skip: i64,
    pub limit: i64,
}

impl Default for LocationFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 1000 }
    }
}

/// Database request for updating a location
#[derive(Debug, Clone, Default)]
pub struct LocationUpdateDBRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

pub struct Locations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Locations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Total number of locations.
    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Look up the location managed by a contact account.
    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<LocationDBResponse>> {
        let location = sqlx::query_as::<_, LocationDBResponse>("SELECT * FROM locations WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(location)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Locations<'c> {
    type CreateRequest = LocationCreateDBRequest;
    type UpdateRequest = LocationUpdateDBRequest;
    type Response = LocationDBResponse;
    type Id = LocationId;
    type Filter = LocationFilter;

    /// Create the contact account and the location row together.
    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO users (id, email, role, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(&request.email)
            .bind(Role::LocationContact)
            .bind(&request.password_hash)
            .execute(&mut *tx)
            .await?;

        let location = sqlx::query_as::<_, LocationDBResponse>(
            r#"
            INSERT INTO locations (name, address, email)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.address)
        .bind(&request.email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(location)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let location = sqlx::query_as::<_, LocationDBResponse>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(location)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let locations = sqlx::query_as::<_, LocationDBResponse>("SELECT * FROM locations ORDER BY name OFFSET $1 LIMIT $2")
            .bind(filter.skip)
            .bind(filter.limit)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(locations)
    }

    /// Remove a location and its contact account. Employees placed there go
    /// back to the bench rather than being deleted.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let email: Option<String> = sqlx::query_scalar("SELECT email FROM locations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(email) = email else {
            tx.commit().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE employee_details SET assigned_location = NULL WHERE assigned_location = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Deleting the account cascades to the location row
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let location = sqlx::query_as::<_, LocationDBResponse>(
            r#"
            UPDATE locations
            SET name = COALESCE($2, name),
                address = COALESCE($3, address)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.address.as_deref())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(location)
    }
}
