//! Per-tab content cache
//!
//! Holds the most recently fetched item list and category list for each
//! content type. Populated lazily on first visit to a tab; a category
//! filter always re-fetches and replaces the cached list, so the cache
//! reflects the last applied filter, never a union of filters.

use std::collections::HashMap;

use crate::models::{Category, ContentItem, ContentType};

/// In-memory cache of the most recently fetched lists per tab
#[derive(Debug, Default)]
pub struct ContentCache {
    items: HashMap<ContentType, Vec<ContentItem>>,
    categories: HashMap<ContentType, Vec<Category>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached item list for a tab, or `None` if never fetched
    pub fn get(&self, content_type: ContentType) -> Option<&[ContentItem]> {
        self.items.get(&content_type).map(|v| v.as_slice())
    }

    /// Replace the cached item list for a tab
    pub fn put(&mut self, content_type: ContentType, items: Vec<ContentItem>) {
        self.items.insert(content_type, items);
    }

    /// Cached category list for a tab, or `None` if never fetched
    pub fn get_categories(&self, content_type: ContentType) -> Option<&[Category]> {
        self.categories.get(&content_type).map(|v| v.as_slice())
    }

    /// Replace the cached category list for a tab
    pub fn put_categories(&mut self, content_type: ContentType, categories: Vec<Category>) {
        self.categories.insert(content_type, categories);
    }

    /// Drop everything. Invoked on logout.
    pub fn clear(&mut self) {
        self.items.clear();
        self.categories.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ContentItem {
        ContentItem {
            stream_id: Some(1),
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_uncached_tabs_are_none() {
        let cache = ContentCache::new();
        for tab in ContentType::ALL {
            assert!(cache.get(tab).is_none());
            assert!(cache.get_categories(tab).is_none());
        }
    }

    #[test]
    fn test_put_replaces_not_merges() {
        let mut cache = ContentCache::new();
        cache.put(ContentType::Vod, vec![item("a"), item("b")]);
        cache.put(ContentType::Vod, vec![item("c")]);

        let items = cache.get(ContentType::Vod).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "c");
    }

    #[test]
    fn test_tabs_are_independent() {
        let mut cache = ContentCache::new();
        cache.put(ContentType::Live, vec![item("ch")]);
        assert!(cache.get(ContentType::Vod).is_none());
        assert_eq!(cache.get(ContentType::Live).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cache = ContentCache::new();
        cache.put(ContentType::Live, vec![item("ch")]);
        cache.put_categories(
            ContentType::Live,
            vec![Category {
                category_id: "1".into(),
                category_name: "News".into(),
            }],
        );

        cache.clear();
        assert!(cache.get(ContentType::Live).is_none());
        assert!(cache.get_categories(ContentType::Live).is_none());
    }
}
