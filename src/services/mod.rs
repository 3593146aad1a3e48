pub mod alias_resolver;
pub mod fetcher;
pub mod rate_limit;
pub mod roster;
pub mod scheduler;
pub mod sync_service;
pub mod validator;

pub use alias_resolver::{AliasResolver, build_alias_index};
pub use fetcher::CourseFetcher;
pub use rate_limit::RateLimitedScheduler;
pub use roster::RosterResolver;
pub use scheduler::SyncScheduler;
pub use sync_service::{AliasSyncStats, CourseSyncStats, SyncService, SyncStats};
pub use validator::{OptionalFieldMissing, ValidatedCourse, validate};
