use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::classroom::{ClassroomClient, MemberKind};
use crate::config::AliasVersion;
use crate::error::{Result, SyncError};
use crate::models::Credential;
use crate::services::rate_limit::RateLimitedScheduler;

/// Lists the students or teachers of courses addressed by stored alias.
pub struct RosterResolver {
    client: Arc<dyn ClassroomClient>,
    scheduler: RateLimitedScheduler,
    alias_version: AliasVersion,
    max_in_flight: usize,
}

impl RosterResolver {
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

    /// Member emails per alias. Stored aliases have their version marker
    /// stripped, so it is put back to address the course remotely.
    pub async fn list_members(
        &self,
        credential: &Credential,
        aliases: Vec<String>,
        kind: MemberKind,
    ) -> Result<HashMap<String, Vec<String>>> {
        info!("Fetching {} for {} courses", kind.path(), aliases.len());

        let client = Arc::clone(&self.client);
        let credential = credential.clone();
        let version = self.alias_version.clone();

        let rosters = self
            .scheduler
            .dispatch(aliases, self.max_in_flight, move |alias: String| {
                let client = Arc::clone(&client);
                let credential = credential.clone();
                let course_key = format!("{}{}", version, alias);
                async move {
                    debug!("Fetching {} for course {}", kind.path(), alias);
                    let members = client.course_members(&credential, &course_key, kind).await?;
                    Ok::<_, SyncError>((alias, members))
                }
            })
            .await?;

        Ok(rosters.into_iter().collect())
    }
}
