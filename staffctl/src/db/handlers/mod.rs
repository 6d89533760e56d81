//! Repository implementations for database access.
//!
//! One repository struct per entity, each wrapping a SQLx connection and
//! implementing the [`Repository`] trait. Repositories own all query
//! construction and parameter binding, return models from
//! [`crate::db::models`], and open their own transactions for multi-row
//! operations (placement changes, paired account/record inserts).
//!
//! ```ignore
//! use staffctl::db::handlers::{Employees, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Employees::new(&mut conn);
//!     let bench = repo.list(&Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod employees;
pub mod locations;
pub mod repository;
pub mod users;

pub use employees::Employees;
pub use locations::Locations;
pub use repository::Repository;
pub use users::Users;
