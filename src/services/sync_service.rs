use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::classroom::{ClassroomClient, MemberKind, OwnerRole};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::logging::{LogOptions, LogSink};
use crate::services::alias_resolver::{AliasResolver, build_alias_index};
use crate::services::fetcher::CourseFetcher;
use crate::services::rate_limit::RateLimitedScheduler;
use crate::services::roster::RosterResolver;
use crate::services::validator;
use crate::store::Store;

const COURSES_SOURCE: &str = "add_courses_to_store";

pub struct SyncService {
    store: Arc<dyn Store>,
    client: Arc<dyn ClassroomClient>,
    sink: Arc<dyn LogSink>,
    config: SyncConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseSyncStats {
    pub courses_stored: usize,
    pub optional_field_warnings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasSyncStats {
    pub aliases_stored: usize,
    pub courses_with_alias: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStats {
    pub courses_stored: usize,
    pub optional_field_warnings: usize,
    pub aliases_stored: usize,
    pub courses_with_alias: usize,
    pub completed_at: DateTime<Utc>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn Store>,
        client: Arc<dyn ClassroomClient>,
        sink: Arc<dyn LogSink>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            client,
            sink,
            config,
        }
    }

    fn scheduler(&self) -> RateLimitedScheduler {
        RateLimitedScheduler::new(self.config.task_delay)
    }

    /// One sync run: courses first, then the alias maps built from the
    /// stored courses. Any failure ends the run.
    pub async fn sync_all(&self) -> Result<SyncStats> {
        info!("Starting sync...");

        info!("Step 1: Syncing courses from Classroom");
        let courses = self.add_courses_to_store().await?;
        info!(
            "Stored {} courses ({} optional field warnings)",
            courses.courses_stored, courses.optional_field_warnings
        );

        info!("Step 2: Resolving course aliases");
        let aliases = self.add_course_alias_map_to_store().await?;
        info!(
            "Stored {} aliases for {} courses",
            aliases.aliases_stored, aliases.courses_with_alias
        );

        let stats = SyncStats {
            courses_stored: courses.courses_stored,
            optional_field_warnings: courses.optional_field_warnings,
            aliases_stored: aliases.aliases_stored,
            courses_with_alias: aliases.courses_with_alias,
            completed_at: Utc::now(),
        };
        info!("Sync completed successfully: {:?}", stats);
        Ok(stats)
    }

    /// Fetches every course owned by the admin account and stores them one at
    /// a time in page order. A record failing validation stops the batch;
    /// records before it stay stored.
    pub async fn add_courses_to_store(&self) -> Result<CourseSyncStats> {
        let fetcher = CourseFetcher::new(Arc::clone(&self.client), self.config.page_size);
        let raw_courses = fetcher
            .fetch_all_courses(
                &self.store.auth(),
                OwnerRole::Teacher,
                &self.config.admin_account_id,
            )
            .await?;

        let options = LogOptions::warn(self.config.log_file.clone());
        let mut stats = CourseSyncStats::default();

        for raw in &raw_courses {
            let validated = validator::validate(raw)?;

            for warning in &validated.warnings {
                self.sink.log(COURSES_SOURCE, &warning.message(), &options);
            }
            stats.optional_field_warnings += validated.warnings.len();

            self.store.put_course(&validated.course).await?;
            stats.courses_stored += 1;
        }

        Ok(stats)
    }

    /// Resolves aliases for every stored course and writes both alias maps
    /// once all lookups have succeeded.
    pub async fn add_course_alias_map_to_store(&self) -> Result<AliasSyncStats> {
        let course_ids = self.store.course_ids().await?;

        let resolver = AliasResolver::new(
            Arc::clone(&self.client),
            self.scheduler(),
            self.config.alias_version.clone(),
            self.config.max_concurrent_requests,
        );
        let records = resolver
            .resolve_aliases(&self.store.auth(), course_ids)
            .await?;

        let index = build_alias_index(&records);
        self.store.put_alias_index(&index).await?;

        Ok(AliasSyncStats {
            aliases_stored: index.course_aliases.len(),
            courses_with_alias: index.course_ids.len(),
        })
    }

    /// Member emails for every stored alias.
    pub async fn course_members(&self, kind: MemberKind) -> Result<HashMap<String, Vec<String>>> {
        let aliases = self.store.aliases().await?;

        let roster = RosterResolver::new(
            Arc::clone(&self.client),
            self.scheduler(),
            self.config.alias_version.clone(),
            self.config.max_concurrent_requests,
        );
        roster.list_members(&self.store.auth(), aliases, kind).await
    }
}
