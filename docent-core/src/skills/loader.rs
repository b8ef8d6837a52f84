//! Lazy skill content resolution
//!
//! [`SkillLoader`] resolves a registered skill name to its full markdown text
//! through a [`SkillContentStore`]. Absence is a typed outcome
//! ([`SkillError::NotFound`]), never a panic.

use super::{SkillError, SkillRegistry, is_valid_skill_name};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read-only key-value source of skill content
#[async_trait]
pub trait SkillContentStore: Send + Sync {
    /// Fetch the content stored under `name`, or `None` if there is none.
    async fn fetch(&self, name: &str) -> Result<Option<String>, SkillError>;
}

/// Content store backed by `<root>/<name>.md` files
#[derive(Debug, Clone)]
pub struct FileSkillStore {
    root: PathBuf,
}

impl FileSkillStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.md", name))
    }
}

#[async_trait]
impl SkillContentStore for FileSkillStore {
    async fn fetch(&self, name: &str) -> Result<Option<String>, SkillError> {
        let path = self.path_for(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SkillError::Io {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Content store holding skill text in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySkillStore {
    entries: HashMap<String, String>,
}

impl InMemorySkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for a skill
    pub fn with_skill(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.entries.insert(name.into(), content.into());
        self
    }
}

#[async_trait]
impl SkillContentStore for InMemorySkillStore {
    async fn fetch(&self, name: &str) -> Result<Option<String>, SkillError> {
        Ok(self.entries.get(name).cloned())
    }
}

/// Whether loaded content is kept for the lifetime of the loader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Read from the store on every load
    Reread,
    /// Keep the first successful read
    #[default]
    CacheForever,
}

/// Resolves registered skill names to content
pub struct SkillLoader {
    registry: Arc<SkillRegistry>,
    store: Arc<dyn SkillContentStore>,
    policy: CachePolicy,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl std::fmt::Debug for SkillLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillLoader")
            .field("skills", &self.registry.names())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SkillLoader {
    /// Create a loader that caches content forever
    pub fn new(registry: Arc<SkillRegistry>, store: Arc<dyn SkillContentStore>) -> Self {
        Self::with_policy(registry, store, CachePolicy::default())
    }

    pub fn with_policy(
        registry: Arc<SkillRegistry>,
        store: Arc<dyn SkillContentStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            registry,
            store,
            policy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this loader resolves against
    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    /// `(name, description)` for every registered skill, in registry order
    pub fn describe_all(&self) -> Vec<(&str, &str)> {
        self.registry.describe_all()
    }

    /// Load the full content of a registered skill.
    pub async fn load(&self, name: &str) -> Result<String, SkillError> {
        if !is_valid_skill_name(name) || !self.registry.contains(name) {
            tracing::debug!(skill = %name, "Requested skill is not registered");
            return Err(SkillError::NotFound {
                name: name.to_string(),
            });
        }

        if self.policy == CachePolicy::CacheForever {
            if let Some(content) = self.cache.read().await.get(name) {
                return Ok(content.to_string());
            }
        }

        let content = self
            .store
            .fetch(name)
            .await?
            .ok_or_else(|| SkillError::NotFound {
                name: name.to_string(),
            })?;

        tracing::info!(skill = %name, bytes = content.len(), "Loaded skill content");

        if self.policy == CachePolicy::CacheForever {
            self.cache
                .write()
                .await
                .insert(name.to_string(), Arc::from(content.as_str()));
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingStore {
        inner: InMemorySkillStore,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl SkillContentStore for CountingStore {
        async fn fetch(&self, name: &str) -> Result<Option<String>, SkillError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(name).await
        }
    }

    fn builtin_loader(store: Arc<dyn SkillContentStore>, policy: CachePolicy) -> SkillLoader {
        SkillLoader::with_policy(Arc::new(SkillRegistry::builtin()), store, policy)
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sales_analytics.md"), "SCHEMA X").unwrap();

        let loader = builtin_loader(
            Arc::new(FileSkillStore::new(dir.path())),
            CachePolicy::Reread,
        );

        let first = loader.load("sales_analytics").await.unwrap();
        let second = loader.load("sales_analytics").await.unwrap();
        assert_eq!(first, "SCHEMA X");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_registered_but_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = builtin_loader(
            Arc::new(FileSkillStore::new(dir.path())),
            CachePolicy::default(),
        );

        let err = loader.load("inventory_management").await.unwrap_err();
        assert_eq!(
            err,
            SkillError::NotFound {
                name: "inventory_management".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unregistered_name_never_touches_store() {
        let store = Arc::new(CountingStore {
            inner: InMemorySkillStore::new().with_skill("nonexistent", "should not be served"),
            fetches: AtomicUsize::new(0),
        });
        let loader = builtin_loader(store.clone(), CachePolicy::default());

        let err = loader.load("nonexistent").await.unwrap_err();
        assert!(matches!(err, SkillError::NotFound { ref name } if name == "nonexistent"));

        let err = loader.load("../secrets").await.unwrap_err();
        assert!(matches!(err, SkillError::NotFound { .. }));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_forever_reads_once() {
        let store = Arc::new(CountingStore {
            inner: InMemorySkillStore::new().with_skill("sales_analytics", "SCHEMA X"),
            fetches: AtomicUsize::new(0),
        });
        let loader = builtin_loader(store.clone(), CachePolicy::CacheForever);

        for _ in 0..3 {
            assert_eq!(loader.load("sales_analytics").await.unwrap(), "SCHEMA X");
        }
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reread_policy_hits_store_each_time() {
        let store = Arc::new(CountingStore {
            inner: InMemorySkillStore::new().with_skill("sales_analytics", "SCHEMA X"),
            fetches: AtomicUsize::new(0),
        });
        let loader = builtin_loader(store.clone(), CachePolicy::Reread);

        loader.load("sales_analytics").await.unwrap();
        loader.load("sales_analytics").await.unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sales_analytics.md")).unwrap();

        let loader = builtin_loader(
            Arc::new(FileSkillStore::new(dir.path())),
            CachePolicy::default(),
        );
        let err = loader.load("sales_analytics").await.unwrap_err();
        assert!(matches!(err, SkillError::Io { .. }));
    }
}
