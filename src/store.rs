use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{AliasIndex, Course, Credential};

/// Shared store the sync pipeline reads from and writes into.
#[async_trait]
pub trait Store: Send + Sync {
    /// Credential for the current session.
    fn auth(&self) -> Credential;

    async fn put_course(&self, course: &Course) -> Result<()>;
    async fn course(&self, id: &str) -> Result<Option<Course>>;
    async fn courses(&self) -> Result<Vec<Course>>;
    async fn course_ids(&self) -> Result<Vec<String>>;

    /// Writes every entry of both alias mappings.
    async fn put_alias_index(&self, index: &AliasIndex) -> Result<()>;
    async fn course_for_alias(&self, alias: &str) -> Result<Option<String>>;
    async fn alias_for_course(&self, course_id: &str) -> Result<Option<String>>;
    async fn aliases(&self) -> Result<Vec<String>>;
}

#[derive(Default)]
struct RemoteMaps {
    courses: HashMap<String, Course>,
    course_aliases: HashMap<String, String>,
    course_ids: HashMap<String, String>,
}

pub struct MemoryStore {
    auth: Credential,
    remote: RwLock<RemoteMaps>,
}

impl MemoryStore {
    pub fn new(auth: Credential) -> Self {
        Self {
            auth,
            remote: RwLock::new(RemoteMaps::default()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn auth(&self) -> Credential {
        self.auth.clone()
    }

    async fn put_course(&self, course: &Course) -> Result<()> {
        self.remote
            .write()
            .await
            .courses
            .insert(course.id.clone(), course.clone());
        Ok(())
    }

    async fn course(&self, id: &str) -> Result<Option<Course>> {
        Ok(self.remote.read().await.courses.get(id).cloned())
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        Ok(self.remote.read().await.courses.values().cloned().collect())
    }

    async fn course_ids(&self) -> Result<Vec<String>> {
        Ok(self.remote.read().await.courses.keys().cloned().collect())
    }

    async fn put_alias_index(&self, index: &AliasIndex) -> Result<()> {
        let mut remote = self.remote.write().await;
        remote.course_aliases.extend(
            index
                .course_aliases
                .iter()
                .map(|(alias, id)| (alias.clone(), id.clone())),
        );
        remote.course_ids.extend(
            index
                .course_ids
                .iter()
                .map(|(id, alias)| (id.clone(), alias.clone())),
        );
        Ok(())
    }

    async fn course_for_alias(&self, alias: &str) -> Result<Option<String>> {
        Ok(self.remote.read().await.course_aliases.get(alias).cloned())
    }

    async fn alias_for_course(&self, course_id: &str) -> Result<Option<String>> {
        Ok(self.remote.read().await.course_ids.get(course_id).cloned())
    }

    async fn aliases(&self) -> Result<Vec<String>> {
        Ok(self
            .remote
            .read()
            .await
            .course_aliases
            .keys()
            .cloned()
            .collect())
    }
}
