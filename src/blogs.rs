//! Blog and agency directory
//!
//! Listings come from the entity store's `Blogs` and `Agencies` tables and
//! are held in a [`TtlCache`] so request-time lookups don't hit the store
//! on every call. When the store has no blogs (or can't be reached) the
//! blogs from `blogforge.toml` are used instead.

use crate::config::{ProjectConfig, TablesConfig};
use crate::models::{Agency, BlogConfig};
use crate::store::{EntityStore, Filter, Record};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const PLACEHOLDER_BLOG_NAMES: &[&str] = &["Unnamed Blog"];
const PLACEHOLDER_AGENCY_NAMES: &[&str] = &["Unnamed", "Unnamed Agency Blog"];

/// Source of the current time for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Single-value cache that expires `ttl` after it was filled
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Cached value, if it was stored less than `ttl` before `now`
    pub fn get(&self, now: Instant) -> Option<T> {
        let slot = self.slot.lock().ok()?;
        slot.as_ref()
            .filter(|(stored, _)| now.saturating_duration_since(*stored) < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn put(&self, now: Instant, value: T) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some((now, value));
        }
    }

    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Blog and agency lookups
pub struct BlogDirectory {
    store: Option<Arc<dyn EntityStore>>,
    tables: TablesConfig,
    fallback: Vec<BlogConfig>,
    blogs: TtlCache<Vec<BlogConfig>>,
    agencies: TtlCache<Vec<Agency>>,
    clock: Arc<dyn Clock>,
}

impl BlogDirectory {
    /// Directory over `store` (None: config blogs only)
    pub fn new(store: Option<Arc<dyn EntityStore>>, config: &ProjectConfig) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_secs);
        Self {
            store,
            tables: config.tables.clone(),
            fallback: config.blogs.clone(),
            blogs: TtlCache::new(ttl),
            agencies: TtlCache::new(ttl),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// All blogs; `force` bypasses the cache
    pub fn blogs(&self, force: bool) -> Vec<BlogConfig> {
        let now = self.clock.now();
        if !force {
            if let Some(blogs) = self.blogs.get(now).filter(|b| !b.is_empty()) {
                return blogs;
            }
        }

        let mut blogs = self.fetch_blogs();
        if blogs.is_empty() {
            debug!("No blogs in store, using {} configured blogs", self.fallback.len());
            blogs = self.fallback.clone();
        }
        self.blogs.put(now, blogs.clone());
        blogs
    }

    pub fn blog(&self, id: &str) -> Option<BlogConfig> {
        self.blogs(false).into_iter().find(|b| b.id == id)
    }

    /// Blog serving `host` (a `:port` suffix is ignored)
    ///
    /// Unknown hosts get the first blog so local development works without
    /// per-domain setup. None only when there are no blogs at all.
    pub fn by_domain(&self, host: &str) -> Option<BlogConfig> {
        let domain = strip_port(host);
        let blogs = self.blogs(false);
        if let Some(blog) = blogs.iter().find(|b| b.domain == domain) {
            return Some(blog.clone());
        }
        debug!("No blog for domain '{}', falling back to first blog", domain);
        blogs.into_iter().next()
    }

    /// All agencies; `force` bypasses the cache
    pub fn agencies(&self, force: bool) -> Vec<Agency> {
        let now = self.clock.now();
        if !force {
            if let Some(agencies) = self.agencies.get(now).filter(|a| !a.is_empty()) {
                return agencies;
            }
        }

        let agencies = self.fetch_agencies();
        self.agencies.put(now, agencies.clone());
        agencies
    }

    /// Blogs linked to an agency
    pub fn agency_blogs(&self, agency_id: &str) -> Vec<BlogConfig> {
        let Some(agency) = self.agencies(false).into_iter().find(|a| a.id == agency_id) else {
            return Vec::new();
        };
        self.blogs(false)
            .into_iter()
            .filter(|b| agency.blog_ids.contains(&b.id))
            .collect()
    }

    fn fetch_blogs(&self) -> Vec<BlogConfig> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.list(&self.tables.blogs, &Filter::All) {
            Ok(records) => records.iter().filter_map(blog_from_record).collect(),
            Err(e) => {
                warn!("Failed to load blogs from store: {}", e);
                Vec::new()
            }
        }
    }

    fn fetch_agencies(&self) -> Vec<Agency> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.list(&self.tables.agencies, &Filter::All) {
            Ok(records) => records.iter().filter_map(agency_from_record).collect(),
            Err(e) => {
                warn!("Failed to load agencies: {}", e);
                Vec::new()
            }
        }
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

fn blog_from_record(record: &Record) -> Option<BlogConfig> {
    let name = record.text("Name");
    if name.is_empty() || PLACEHOLDER_BLOG_NAMES.contains(&name) {
        return None;
    }

    let mut blog = BlogConfig::new(
        record.id.0.clone(),
        name,
        record.text_or("Domain", "localhost"),
    );
    blog.posts_table = record.text_or("Table_Name", "Posts").to_string();
    blog.base_id = Some(record.text("Airtable_Base_ID"))
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    blog.system_prompt_key = record
        .text_or("System_Prompt_Key", &blog.system_prompt_key)
        .to_string();
    blog.affiliate_tag = record.text("Affiliate_Tag").to_string();
    blog.generation_contract = record
        .text_or("Generation_Contract", &blog.generation_contract)
        .to_string();
    Some(blog)
}

fn agency_from_record(record: &Record) -> Option<Agency> {
    let name = record.text("Name");
    if name.is_empty() || PLACEHOLDER_AGENCY_NAMES.contains(&name) {
        return None;
    }

    Some(Agency {
        id: record.id.0.clone(),
        name: name.to_string(),
        website: record.text("Website").to_string(),
        status: record.text_or("Status", "Active").to_string(),
        blog_ids: record.strings("Blogs"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fields, MemoryStore, RecordId, StoreError, StoreResult};
    use serde_json::json;

    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            })
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    struct FailingStore;

    impl EntityStore for FailingStore {
        fn get(&self, table: &str, id: &RecordId) -> StoreResult<Record> {
            Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.0.clone(),
            })
        }
        fn list(&self, _: &str, _: &Filter) -> StoreResult<Vec<Record>> {
            Err(StoreError::Transport("connection refused".into()))
        }
        fn create(&self, _: &str, _: Fields) -> StoreResult<RecordId> {
            Err(StoreError::Transport("connection refused".into()))
        }
        fn update(&self, _: &str, _: &RecordId, _: Fields) -> StoreResult<()> {
            Err(StoreError::Transport("connection refused".into()))
        }
        fn delete(&self, _: &str, _: &RecordId) -> StoreResult<()> {
            Err(StoreError::Transport("connection refused".into()))
        }
    }

    fn fields(v: serde_json::Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .create(
                "Blogs",
                fields(json!({"Name": "Tech", "Domain": "tech.example.com", "Table_Name": "Tech Posts"})),
            )
            .unwrap();
        store
            .create("Blogs", fields(json!({"Name": "Unnamed Blog"})))
            .unwrap();
        store.create("Blogs", fields(json!({"Domain": "x.com"}))).unwrap();
        store
    }

    fn config_with_fallback() -> ProjectConfig {
        ProjectConfig {
            blogs: vec![BlogConfig::new("local", "Local", "localhost")],
            ..ProjectConfig::default()
        }
    }

    #[test]
    fn test_loads_blogs_and_skips_placeholders() {
        let store = seeded_store();
        let dir = BlogDirectory::new(Some(store), &ProjectConfig::default());
        let blogs = dir.blogs(false);
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].name, "Tech");
        assert_eq!(blogs[0].posts_table, "Tech Posts");
        assert_eq!(blogs[0].system_prompt_key, "DEFAULT_PROMPT");
        assert_eq!(blogs[0].base_id, None);
    }

    #[test]
    fn test_falls_back_to_config_when_store_empty_or_failing() {
        let empty = BlogDirectory::new(Some(Arc::new(MemoryStore::new())), &config_with_fallback());
        assert_eq!(empty.blogs(false)[0].id, "local");

        let failing = BlogDirectory::new(Some(Arc::new(FailingStore)), &config_with_fallback());
        assert_eq!(failing.blogs(false)[0].id, "local");

        let none = BlogDirectory::new(None, &ProjectConfig::default());
        assert!(none.blogs(false).is_empty());
        assert!(none.by_domain("anything").is_none());
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let store = seeded_store();
        let clock = ManualClock::new();
        let dir = BlogDirectory::new(Some(store.clone()), &ProjectConfig::default())
            .with_clock(clock.clone());
        assert_eq!(dir.blogs(false).len(), 1);

        store.create("Blogs", fields(json!({"Name": "Food"}))).unwrap();
        clock.advance(Duration::from_secs(59));
        assert_eq!(dir.blogs(false).len(), 1, "still cached");
        assert_eq!(dir.blogs(true).len(), 2, "force bypasses cache");

        store.create("Blogs", fields(json!({"Name": "Travel"}))).unwrap();
        clock.advance(Duration::from_secs(60));
        assert_eq!(dir.blogs(false).len(), 3);
    }

    #[test]
    fn test_by_domain_strips_port_and_falls_back() {
        let store = seeded_store();
        store
            .create("Blogs", fields(json!({"Name": "Food", "Domain": "food.example.com"})))
            .unwrap();
        let dir = BlogDirectory::new(Some(store), &ProjectConfig::default());

        assert_eq!(dir.by_domain("food.example.com:8080").unwrap().name, "Food");
        assert_eq!(dir.by_domain("tech.example.com").unwrap().name, "Tech");
        let first = dir.blogs(false)[0].name.clone();
        assert_eq!(dir.by_domain("unknown.test").unwrap().name, first);
    }

    #[test]
    fn test_blog_by_id() {
        let dir = BlogDirectory::new(None, &config_with_fallback());
        assert_eq!(dir.blog("local").unwrap().name, "Local");
        assert!(dir.blog("missing").is_none());
    }

    #[test]
    fn test_agencies_and_linked_blogs() {
        let store = seeded_store();
        let tech_id = store.list("Blogs", &Filter::field_equals("Name", "Tech")).unwrap()[0]
            .id
            .0
            .clone();
        let agency = store
            .create("Agencies", fields(json!({"Name": "Acme", "Blogs": [tech_id]})))
            .unwrap();
        store
            .create("Agencies", fields(json!({"Name": "Unnamed Agency Blog"})))
            .unwrap();

        let dir = BlogDirectory::new(Some(store), &ProjectConfig::default());
        let agencies = dir.agencies(false);
        assert_eq!(agencies.len(), 1);
        assert_eq!(agencies[0].status, "Active");
        assert_eq!(dir.agency_blogs(&agency.0).len(), 1);
        assert!(dir.agency_blogs("recNope").is_empty());
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:443"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("localhost:"), "localhost");
    }

    #[test]
    fn test_ttl_cache_invalidate() {
        let cache = TtlCache::new(Duration::from_secs(10));
        let now = Instant::now();
        cache.put(now, 5);
        assert_eq!(cache.get(now), Some(5));
        assert_eq!(cache.get(now + Duration::from_secs(10)), None);
        cache.invalidate();
        assert_eq!(cache.get(now), None);
    }
}
