pub mod repository;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::Result;
use crate::models::{AliasIndex, Course, Credential};
use crate::store::Store;

/// `Store` backed by SQLite, one table per remote map.
pub struct SqliteStore {
    db: SqlitePool,
    auth: Credential,
}

impl SqliteStore {
    pub async fn connect(database_url: &str, auth: Credential) -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::from_pool(db, auth).await
    }

    /// Wraps an existing pool and applies the embedded migrations.
    pub async fn from_pool(db: SqlitePool, auth: Credential) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&db).await?;
        Ok(Self { db, auth })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn auth(&self) -> Credential {
        self.auth.clone()
    }

    async fn put_course(&self, course: &Course) -> Result<()> {
        repository::upsert_course(&self.db, course).await?;
        Ok(())
    }

    async fn course(&self, id: &str) -> Result<Option<Course>> {
        Ok(repository::fetch_course(&self.db, id).await?)
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        Ok(repository::fetch_courses(&self.db).await?)
    }

    async fn course_ids(&self) -> Result<Vec<String>> {
        Ok(repository::fetch_course_ids(&self.db).await?)
    }

    async fn put_alias_index(&self, index: &AliasIndex) -> Result<()> {
        let mut tx = self.db.begin().await?;
        for (alias, course_id) in &index.course_aliases {
            repository::upsert_course_alias(&mut tx, alias, course_id).await?;
        }
        for (course_id, alias) in &index.course_ids {
            repository::upsert_course_id(&mut tx, course_id, alias).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn course_for_alias(&self, alias: &str) -> Result<Option<String>> {
        Ok(repository::fetch_course_for_alias(&self.db, alias).await?)
    }

    async fn alias_for_course(&self, course_id: &str) -> Result<Option<String>> {
        Ok(repository::fetch_alias_for_course(&self.db, course_id).await?)
    }

    async fn aliases(&self) -> Result<Vec<String>> {
        Ok(repository::fetch_aliases(&self.db).await?)
    }
}
