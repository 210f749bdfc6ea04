//! # Catalog Repositories
//!
//! Store operations for companies and categories - the two reference lists
//! the inventory forms are built around.
//!
//! ## Uniqueness
//! Company codes and category names are unique across the store. The checks
//! run twice on purpose: an explicit pre-check gives the form a precise
//! message, and a UNIQUE index backs it up against racing inserts (surfaced
//! through the sqlx error mapping as `UniqueViolation`).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::{Category, Company};

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    code: String,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            code: row.code,
            created_at: row.created_at,
        }
    }
}

/// Repository for company operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Inserts a new company.
    ///
    /// ## Errors
    /// * `UniqueViolation` - the code is already taken
    pub async fn insert(&self, name: &str, code: &str) -> DbResult<Company> {
        debug!(name = %name, code = %code, "Inserting company");

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE code = ?1")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            return Err(DbError::duplicate("company code", code));
        }

        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: code.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO companies (id, name, code, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.code)
        .bind(company.created_at)
        .execute(&self.pool)
        .await?;

        Ok(company)
    }

    /// Lists all companies, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, code, created_at FROM companies ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Deletes a company.
    ///
    /// Products and categories referencing its code are left in place,
    /// matching the document-store behavior of the original screens.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting company");

        let result = sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Company", id));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    company: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            company: row.company,
            created_at: row.created_at,
        }
    }
}

/// Repository for category operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Errors
    /// * `UniqueViolation` - a category with this name already exists
    pub async fn insert(&self, name: &str, company: &str) -> DbResult<Category> {
        debug!(name = %name, company = %company, "Inserting category");

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            return Err(DbError::duplicate("category name", name));
        }

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            company: company.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO categories (id, name, company, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.company)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists categories, optionally restricted to one company.
    ///
    /// The product form filters the category dropdown by the selected
    /// company; the inventory filter bar lists all.
    pub async fn list(&self, company: Option<&str>) -> DbResult<Vec<Category>> {
        let rows = match company {
            Some(code) => {
                sqlx::query_as::<_, CategoryRow>(
                    r#"
                    SELECT id, name, company, created_at
                    FROM categories
                    WHERE company = ?1
                    ORDER BY name
                    "#,
                )
                .bind(code)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "SELECT id, name, company, created_at FROM categories ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Deletes a category. Products referencing it are left in place.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_company_roundtrip() {
        let db = test_db().await;

        let company = db.companies().insert("Vargo Sports", "vargo").await.unwrap();
        assert_eq!(company.code, "vargo");

        let all = db.companies().list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Vargo Sports");

        db.companies().delete(&company.id).await.unwrap();
        assert!(db.companies().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_company_code_rejected() {
        let db = test_db().await;
        db.companies().insert("Vargo Sports", "vargo").await.unwrap();

        let err = db.companies().insert("Vargo Clone", "vargo").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        assert_eq!(db.companies().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let db = test_db().await;
        db.categories().insert("Jerseys", "vargo").await.unwrap();

        let err = db.categories().insert("Jerseys", "sportcheck").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_category_filter_by_company() {
        let db = test_db().await;
        db.categories().insert("Jerseys", "vargo").await.unwrap();
        db.categories().insert("Balls", "sportcheck").await.unwrap();

        let all = db.categories().list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let vargo = db.categories().list(Some("vargo")).await.unwrap();
        assert_eq!(vargo.len(), 1);
        assert_eq!(vargo[0].name, "Jerseys");
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let db = test_db().await;
        let err = db.categories().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
