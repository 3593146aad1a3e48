use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::classroom::{ClassroomClient, OwnerRole};
use crate::error::Result;
use crate::models::Credential;

/// Walks the paginated course listing until the service stops returning a
/// continuation token.
pub struct CourseFetcher {
    client: Arc<dyn ClassroomClient>,
    page_size: u32,
}

impl CourseFetcher {
    pub fn new(client: Arc<dyn ClassroomClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Raw course records in pagination order. A failed page aborts the whole
    /// fetch; nothing is returned for earlier pages.
    pub async fn fetch_all_courses(
        &self,
        credential: &Credential,
        role: OwnerRole,
        owner_id: &str,
    ) -> Result<Vec<Value>> {
        info!("Fetching remote courses for {}", owner_id);

        let mut courses = Vec::new();
        let mut page_token = String::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .client
                .list_courses_page(credential, role, owner_id, self.page_size, &page_token)
                .await?;
            pages += 1;

            courses.extend(page.courses);
            info!("...{} courses", courses.len());

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        info!("{} total courses fetched in {} pages", courses.len(), pages);
        Ok(courses)
    }
}
