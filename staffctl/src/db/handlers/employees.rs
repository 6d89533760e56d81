//! Database repository for employee detail rows.
//!
//! Placements keep `locations.num_employees` equal to the number of detail
//! rows pointing at each location. Every operation that can move that number
//! runs inside one transaction so the counter and the placement never drift.

use crate::{
    api::models::users::Role,
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::employees::{EmployeeCreateDBRequest, EmployeeDBResponse},
    },
    types::LocationId,
};
use sqlx::{Connection, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing employee detail rows
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Only employees placed at this location
    pub assigned_to: Option<LocationId>,
    /// Only employees waiting for a placement
    pub unassigned_only: bool,
}

impl EmployeeFilter {
    pub fn unassigned() -> Self {
        Self {
            assigned_to: None,
            unassigned_only: true,
        }
    }

    pub fn at_location(id: LocationId) -> Self {
        Self {
            assigned_to: Some(id),
            unassigned_only: false,
        }
    }
}

/// Database request for updating an employee detail row
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdateDBRequest {
    pub name: Option<String>,
}

pub struct Employees<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Employees<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Total number of employee detail rows.
    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee_details")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Place an employee at a location.
    ///
    /// No-op when the employee is already there; a placement elsewhere is
    /// released first so both counters stay accurate.
    #[instrument(skip(self), err)]
    pub async fn assign(&mut self, email: &str, location_id: LocationId) -> Result<EmployeeDBResponse> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, EmployeeDBResponse>("SELECT email, name, assigned_location FROM employee_details WHERE email = $1 FOR UPDATE")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        if current.assigned_location == Some(location_id) {
            tx.commit().await?;
            return Ok(current);
        }

        if let Some(previous) = current.assigned_location {
            sqlx::query("UPDATE locations SET num_employees = num_employees - 1 WHERE id = $1")
                .bind(previous)
                .execute(&mut *tx)
                .await?;
        }

        let updated = sqlx::query_as::<_, EmployeeDBResponse>(
            r#"
            UPDATE employee_details
            SET assigned_location = $2
            WHERE email = $1
            RETURNING email, name, assigned_location
            "#,
        )
        .bind(email)
        .bind(location_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE locations SET num_employees = num_employees + 1 WHERE id = $1")
            .bind(location_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Release an employee's placement. No-op when already unassigned.
    #[instrument(skip(self), err)]
    pub async fn unassign(&mut self, email: &str) -> Result<EmployeeDBResponse> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, EmployeeDBResponse>("SELECT email, name, assigned_location FROM employee_details WHERE email = $1 FOR UPDATE")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        let Some(previous) = current.assigned_location else {
            tx.commit().await?;
            return Ok(current);
        };

        let updated = sqlx::query_as::<_, EmployeeDBResponse>(
            r#"
            UPDATE employee_details
            SET assigned_location = NULL
            WHERE email = $1
            RETURNING email, name, assigned_location
            "#,
        )
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE locations SET num_employees = num_employees - 1 WHERE id = $1")
            .bind(previous)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Employees<'c> {
    type CreateRequest = EmployeeCreateDBRequest;
    type UpdateRequest = EmployeeUpdateDBRequest;
    type Response = EmployeeDBResponse;
    type Id = String;
    type Filter = EmployeeFilter;

    /// Create the login account and the detail row together. An initial
    /// placement bumps the location counter in the same transaction.
    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO users (id, email, role, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(&request.email)
            .bind(Role::Employee)
            .bind(&request.password_hash)
            .execute(&mut *tx)
            .await?;

        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            r#"
            INSERT INTO employee_details (email, name, assigned_location)
            VALUES ($1, $2, $3)
            RETURNING email, name, assigned_location
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(request.assigned_location)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(location_id) = request.assigned_location {
            sqlx::query("UPDATE locations SET num_employees = num_employees + 1 WHERE id = $1")
                .bind(location_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(employee)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, email: Self::Id) -> Result<Option<Self::Response>> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>("SELECT email, name, assigned_location FROM employee_details WHERE email = $1")
            .bind(&email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(employee)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let employees = if filter.unassigned_only {
            sqlx::query_as::<_, EmployeeDBResponse>(
                "SELECT email, name, assigned_location FROM employee_details WHERE assigned_location IS NULL ORDER BY name",
            )
            .fetch_all(&mut *self.db)
            .await?
        } else if let Some(location_id) = filter.assigned_to {
            sqlx::query_as::<_, EmployeeDBResponse>(
                "SELECT email, name, assigned_location FROM employee_details WHERE assigned_location = $1 ORDER BY name",
            )
            .bind(location_id)
            .fetch_all(&mut *self.db)
            .await?
        } else {
            sqlx::query_as::<_, EmployeeDBResponse>("SELECT email, name, assigned_location FROM employee_details ORDER BY name")
                .fetch_all(&mut *self.db)
                .await?
        };

        Ok(employees)
    }

    /// Remove the detail row and the login account. A held placement is
    /// released (counter decremented) in the same transaction.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, email: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, EmployeeDBResponse>("SELECT email, name, assigned_location FROM employee_details WHERE email = $1 FOR UPDATE")
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            tx.commit().await?;
            return Ok(false);
        };

        if let Some(location_id) = current.assigned_location {
            sqlx::query("UPDATE locations SET num_employees = num_employees - 1 WHERE id = $1")
                .bind(location_id)
                .execute(&mut *tx)
                .await?;
        }

        // Deleting the account cascades to the detail row
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, email: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            r#"
            UPDATE employee_details
            SET name = COALESCE($2, name)
            WHERE email = $1
            RETURNING email, name, assigned_location
            "#,
        )
        .bind(&email)
        .bind(request.name.as_deref())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        handlers::locations::Locations,
        models::locations::{LocationCreateDBRequest, LocationDBResponse},
    };
    use sqlx::PgPool;

    async fn create_location(pool: &PgPool, email: &str) -> LocationDBResponse {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Locations::new(&mut conn);
        repo.create(&LocationCreateDBRequest {
            name: "Warehouse".to_string(),
            address: "1 Dock Road".to_string(),
            email: email.to_string(),
            password_hash: "fake-hash".to_string(),
        })
        .await
        .unwrap()
    }

    async fn create_employee(pool: &PgPool, email: &str, assigned: Option<LocationId>) -> EmployeeDBResponse {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        repo.create(&EmployeeCreateDBRequest {
            email: email.to_string(),
            name: "Test Employee".to_string(),
            assigned_location: assigned,
            password_hash: "fake-hash".to_string(),
        })
        .await
        .unwrap()
    }

    async fn occupancy(pool: &PgPool, id: LocationId) -> i32 {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Locations::new(&mut conn);
        repo.get_by_id(id).await.unwrap().unwrap().num_employees
    }

    #[sqlx::test]
    async fn test_create_with_initial_assignment_increments(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        assert_eq!(location.num_employees, 0);

        let employee = create_employee(&pool, "emp@example.com", Some(location.id)).await;
        assert_eq!(employee.assigned_location, Some(location.id));
        assert_eq!(occupancy(&pool, location.id).await, 1);
    }

    #[test_log::test(sqlx::test)]
    async fn test_assign_and_unassign_round_trip(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        create_employee(&pool, "emp@example.com", None).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);

        let assigned = repo.assign("emp@example.com", location.id).await.unwrap();
        assert_eq!(assigned.assigned_location, Some(location.id));
        drop(repo);
        drop(conn);
        assert_eq!(occupancy(&pool, location.id).await, 1);

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        let released = repo.unassign("emp@example.com").await.unwrap();
        assert_eq!(released.assigned_location, None);
        drop(repo);
        drop(conn);
        assert_eq!(occupancy(&pool, location.id).await, 0);
    }

    #[test_log::test(sqlx::test)]
    async fn test_repeat_assign_does_not_double_count(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        create_employee(&pool, "emp@example.com", None).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        repo.assign("emp@example.com", location.id).await.unwrap();
        repo.assign("emp@example.com", location.id).await.unwrap();
        drop(repo);
        drop(conn);

        assert_eq!(occupancy(&pool, location.id).await, 1);
    }

    #[sqlx::test]
    async fn test_reassign_moves_the_count(pool: PgPool) {
        let first = create_location(&pool, "first@example.com").await;
        let second = create_location(&pool, "second@example.com").await;
        create_employee(&pool, "emp@example.com", Some(first.id)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        repo.assign("emp@example.com", second.id).await.unwrap();
        drop(repo);
        drop(conn);

        assert_eq!(occupancy(&pool, first.id).await, 0);
        assert_eq!(occupancy(&pool, second.id).await, 1);
    }

    #[sqlx::test]
    async fn test_unassign_when_unassigned_is_noop(pool: PgPool) {
        create_employee(&pool, "emp@example.com", None).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        let employee = repo.unassign("emp@example.com").await.unwrap();
        assert_eq!(employee.assigned_location, None);
    }

    #[sqlx::test]
    async fn test_assign_unknown_employee_is_not_found(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        let err = repo.assign("ghost@example.com", location.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_delete_assigned_employee_decrements(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        create_employee(&pool, "emp@example.com", Some(location.id)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        assert!(repo.delete("emp@example.com".to_string()).await.unwrap());
        assert!(repo.get_by_id("emp@example.com".to_string()).await.unwrap().is_none());
        drop(repo);
        drop(conn);

        assert_eq!(occupancy(&pool, location.id).await, 0);

        // Account row is gone too
        let mut conn = pool.acquire().await.unwrap();
        let mut users = crate::db::handlers::Users::new(&mut conn);
        assert!(users.get_user_by_email("emp@example.com").await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_delete_unknown_employee_is_false(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);
        assert!(!repo.delete("ghost@example.com".to_string()).await.unwrap());
    }

    #[sqlx::test]
    async fn test_update_renames_without_moving_placement(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        create_employee(&pool, "emp@example.com", Some(location.id)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);

        let renamed = repo
            .update(
                "emp@example.com".to_string(),
                &EmployeeUpdateDBRequest {
                    name: Some("Renamed Employee".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Renamed Employee");
        assert_eq!(renamed.assigned_location, Some(location.id));

        // None leaves the name untouched
        let untouched = repo
            .update("emp@example.com".to_string(), &EmployeeUpdateDBRequest::default())
            .await
            .unwrap();
        assert_eq!(untouched.name, "Renamed Employee");
    }

    #[sqlx::test]
    async fn test_list_filters(pool: PgPool) {
        let location = create_location(&pool, "site@example.com").await;
        create_employee(&pool, "bench@example.com", None).await;
        create_employee(&pool, "placed@example.com", Some(location.id)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Employees::new(&mut conn);

        let all = repo.list(&EmployeeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let bench = repo.list(&EmployeeFilter::unassigned()).await.unwrap();
        assert_eq!(bench.len(), 1);
        assert_eq!(bench[0].email, "bench@example.com");

        let placed = repo.list(&EmployeeFilter::at_location(location.id)).await.unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].email, "placed@example.com");

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
