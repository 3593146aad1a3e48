use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::models::Credential;

pub const DEFAULT_API_BASE: &str = "https://classroom.googleapis.com/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TASK_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_CONCURRENT: usize = 8;
pub const DEFAULT_LOG_FILE: &str = "./log/log.csv";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://classroom_sync.db?mode=rwc";

/// Two-character marker that prefixes every alias owned by this application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AliasVersion(String);

impl AliasVersion {
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        if marker.chars().count() != 2 {
            return Err(SyncError::Config(format!(
                "alias version must be exactly 2 characters, got {:?}",
                marker
            )));
        }
        Ok(Self(marker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AliasVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub api_base: String,
    /// Administrative account whose courses are synchronized.
    pub admin_account_id: String,
    pub page_size: u32,
    /// Multiplier for the staggered launch of per-course requests.
    pub task_delay: Duration,
    pub alias_version: AliasVersion,
    pub max_concurrent_requests: usize,
    pub log_file: String,
    pub database_url: String,
    /// Pause between scheduled runs; `None` means a single run.
    pub sync_interval: Option<Duration>,
    /// Session credential handed to the store.
    pub credential: Option<Credential>,
}

impl SyncConfig {
    pub fn new(
        admin_account_id: impl Into<String>,
        page_size: u32,
        task_delay: Duration,
        alias_version: AliasVersion,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(SyncError::Config("page size must be positive".to_string()));
        }

        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            admin_account_id: admin_account_id.into(),
            page_size,
            task_delay,
            alias_version,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT,
            log_file: DEFAULT_LOG_FILE.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            sync_interval: None,
            credential: None,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SyncError::Config(
                "max concurrent requests must be positive".to_string(),
            ));
        }
        self.max_concurrent_requests = limit;
        Ok(self)
    }

    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn with_sync_interval(mut self, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(SyncError::Config("sync interval must be positive".to_string()));
        }
        self.sync_interval = Some(interval);
        Ok(self)
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn credential(&self) -> Result<Credential> {
        self.credential
            .clone()
            .ok_or_else(|| SyncError::Config("CLASSROOM_ACCESS_TOKEN is not set".to_string()))
    }

    pub fn new_from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so callers other than
    /// the process environment can supply values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin = lookup("CLASSROOM_ADMIN")
            .ok_or_else(|| SyncError::Config("CLASSROOM_ADMIN is not set".to_string()))?;
        let alias_version = lookup("CLASSROOM_ALIAS_VERSION")
            .ok_or_else(|| SyncError::Config("CLASSROOM_ALIAS_VERSION is not set".to_string()))?;

        let page_size = parse_or(&lookup, "CLASSROOM_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let task_delay_ms = parse_or(&lookup, "CLASSROOM_TASK_DELAY_MS", DEFAULT_TASK_DELAY_MS)?;
        let max_concurrent = parse_or(&lookup, "CLASSROOM_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT)?;

        let mut config = Self::new(
            admin,
            page_size,
            Duration::from_millis(task_delay_ms),
            AliasVersion::new(alias_version)?,
        )?
        .with_max_concurrent_requests(max_concurrent)?;

        if let Some(api_base) = lookup("CLASSROOM_API_BASE") {
            config = config.with_api_base(api_base);
        }
        if let Some(log_file) = lookup("CLASSROOM_LOG_FILE") {
            config = config.with_log_file(log_file);
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            config = config.with_database_url(database_url);
        }
        if let Some(token) = lookup("CLASSROOM_ACCESS_TOKEN") {
            config = config.with_credential(Credential::new(token));
        }
        if lookup("SYNC_INTERVAL_SECS").is_some() {
            let secs: u64 = parse_or(&lookup, "SYNC_INTERVAL_SECS", 0)?;
            config = config.with_sync_interval(Duration::from_secs(secs))?;
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SyncError::Config(format!("{} is not a valid number: {}", key, raw))),
        None => Ok(default),
    }
}
