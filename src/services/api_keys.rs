//! Per-project API-key cache.
//!
//! Keys are fetched once per project and memoized for the lifetime of the
//! process; there is no eviction.

use super::ImplAccountService;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct ApiKeyCache {
    keys: RwLock<HashMap<String, String>>,
}

impl ApiKeyCache {
    /// Returns the cached key for `project_id`, fetching it from the
    /// account service on first use
    pub async fn get_or_fetch(
        &self,
        project_id: &str,
        account_service: &ImplAccountService,
    ) -> anyhow::Result<String> {
        if let Some(key) = self.keys.read().await.get(project_id) {
            return Ok(key.clone());
        }

        let key = account_service.get_api_key(project_id).await?;
        self.keys
            .write()
            .await
            .insert(project_id.to_string(), key.clone());

        Ok(key)
    }

    /// Cached key, if any, without touching the account service
    pub async fn cached(&self, project_id: &str) -> Option<String> {
        self.keys.read().await.get(project_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockAccountService;
    use mockall::predicate::eq;

    #[ntex::test]
    async fn test_key_is_fetched_once_and_memoized() {
        let mut mock = MockAccountService::new();
        mock.expect_get_api_key()
            .with(eq("proj-1"))
            .times(1)
            .returning(|_| Ok("key-abc".to_string()));

        let account_service: ImplAccountService = Box::new(mock);
        let cache = ApiKeyCache::default();

        assert_eq!(
            cache.get_or_fetch("proj-1", &account_service).await.unwrap(),
            "key-abc"
        );
        // second call must hit the cache; the mock allows one call only
        assert_eq!(
            cache.get_or_fetch("proj-1", &account_service).await.unwrap(),
            "key-abc"
        );
        assert_eq!(cache.cached("proj-1").await.as_deref(), Some("key-abc"));
        assert_eq!(cache.cached("proj-2").await, None);
    }

    #[ntex::test]
    async fn test_fetch_failure_is_not_cached() {
        let mut mock = MockAccountService::new();
        mock.expect_get_api_key()
            .times(2)
            .returning(|_| anyhow::bail!("service unavailable"));

        let account_service: ImplAccountService = Box::new(mock);
        let cache = ApiKeyCache::default();

        assert!(cache.get_or_fetch("proj-1", &account_service).await.is_err());
        assert!(cache.get_or_fetch("proj-1", &account_service).await.is_err());
        assert_eq!(cache.cached("proj-1").await, None);
    }
}
