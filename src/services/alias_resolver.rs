use std::sync::Arc;

use tracing::{debug, info};

use crate::classroom::ClassroomClient;
use crate::config::AliasVersion;
use crate::error::Result;
use crate::models::{Alias, AliasIndex, CourseAliasRecord, Credential};
use crate::services::rate_limit::RateLimitedScheduler;

/// Fetches the aliases of many courses through the staggered scheduler and
/// keeps only those carrying the configured version marker.
pub struct AliasResolver {
    client: Arc<dyn ClassroomClient>,
    scheduler: RateLimitedScheduler,
    alias_version: AliasVersion,
    max_in_flight: usize,
}

impl AliasResolver {
    pub fn new(
        client: Arc<dyn ClassroomClient>,
        scheduler: RateLimitedScheduler,
        alias_version: AliasVersion,
        max_in_flight: usize,
    ) -> Self {
        Self {
            client,
            scheduler,
            alias_version,
            max_in_flight,
        }
    }

    /// One record per course id, in input order, each holding the bodies of
    /// its qualifying aliases in response order.
    pub async fn resolve_aliases(
        &self,
        credential: &Credential,
        course_ids: Vec<String>,
    ) -> Result<Vec<CourseAliasRecord>> {
        let total = course_ids.len();
        info!("Fetching aliases for {} courses", total);

        let client = Arc::clone(&self.client);
        let credential = credential.clone();
        let records = self
            .scheduler
            .dispatch(course_ids, self.max_in_flight, move |course_id: String| {
                let client = Arc::clone(&client);
                let credential = credential.clone();
                async move {
                    debug!("Fetching aliases for course {}", course_id);
                    client.course_aliases(&credential, &course_id).await
                }
            })
            .await?;

        Ok(records
            .into_iter()
            .map(|record| self.retain_current(record))
            .collect())
    }

    fn retain_current(&self, record: CourseAliasRecord) -> CourseAliasRecord {
        let aliases = record
            .aliases
            .iter()
            .filter_map(|raw| Alias::parse(raw))
            .filter(|alias| alias.matches(&self.alias_version))
            .map(|alias| alias.body)
            .collect();

        CourseAliasRecord {
            course_id: record.course_id,
            aliases,
        }
    }
}

/// Flattens resolved records into both mappings. Records are applied in
/// order, so the last qualifying alias of a course owns its `course_ids` entry.
pub fn build_alias_index(records: &[CourseAliasRecord]) -> AliasIndex {
    let mut index = AliasIndex::default();
    for record in records {
        for alias in &record.aliases {
            index.insert(alias, &record.course_id);
        }
    }
    index
}
