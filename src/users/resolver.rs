//! User resolution through the shared cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::ResourceCache;
use crate::error::{AppError, Result};
use crate::users::{UserDirectory, UserInfo};

/// Longest id accepted; Discord snowflakes fit in 20 digits.
const MAX_ID_LENGTH: usize = 20;

/// Resolves user ids to [`UserInfo`], coalescing concurrent lookups.
#[derive(Clone)]
pub struct UserResolver {
    directory: Arc<dyn UserDirectory>,
    cache: ResourceCache<String, Arc<UserInfo>>,
    cdn_base: Arc<str>,
    fetch_delay: Duration,
}

impl UserResolver {
    /// # Arguments
    /// * `directory` - Upstream user source
    /// * `cache` - Cache the resolved records live in
    /// * `cdn_base` - Base URL avatar links are built from
    /// * `fetch_delay` - Courtesy delay before each distinct upstream fetch
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        cache: ResourceCache<String, Arc<UserInfo>>,
        cdn_base: impl Into<Arc<str>>,
        fetch_delay: Duration,
    ) -> Self {
        Self {
            directory,
            cache,
            cdn_base: cdn_base.into(),
            fetch_delay,
        }
    }

    pub fn cache(&self) -> &ResourceCache<String, Arc<UserInfo>> {
        &self.cache
    }

    /// Returns the user record for `id`.
    ///
    /// Repeated calls within the TTL return the same `Arc`. Upstream failures
    /// propagate and are retried on the next call.
    pub async fn resolve_user(&self, id: &str) -> Result<Arc<UserInfo>> {
        let id = validate_user_id(id)?;

        let directory = Arc::clone(&self.directory);
        let cdn_base = Arc::clone(&self.cdn_base);
        let delay = self.fetch_delay;
        let user_id = id.to_string();

        self.cache
            .get_or_fetch(id.to_string(), move || async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let raw = directory.fetch_user(&user_id).await?;
                debug!("Resolved user {} ({})", raw.username, user_id);
                Ok(Arc::new(UserInfo::from_directory(raw, &cdn_base)))
            })
            .await
    }
}

/// Accepts 1 to 20 ASCII digits, surrounding whitespace ignored.
pub fn validate_user_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id.len() > MAX_ID_LENGTH || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "Invalid user id \"{}\": expected up to {} digits",
            id, MAX_ID_LENGTH
        )));
    }
    Ok(id)
}
