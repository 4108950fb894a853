//! In-memory content store.

use async_trait::async_trait;
use coldcut_content::{ContentStore, Download};
use coldcut_core::{ContentObject, MediaItem, Page, PageRequest};
use coldcut_error::{ColdcutResult, ContentError, ContentErrorKind};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Calls made against the mock.
#[derive(Debug, Default, Clone)]
pub struct ContentCalls {
    pub media_pages: usize,
    pub object_pages: Vec<(String, usize)>,
    pub downloads: Vec<String>,
    pub updates: Vec<(String, String, String)>,
    pub deletes: Vec<String>,
}

/// Content store holding media and objects in memory.
///
/// Object types without an entry answer "not found". Downloads return the
/// URL bytes as content.
#[derive(Default)]
pub struct MockContentStore {
    media: Mutex<Vec<MediaItem>>,
    objects: HashMap<String, Vec<ContentObject>>,
    unreachable: HashSet<String>,
    failing_types: HashMap<String, usize>,
    vanishing_types: HashMap<String, usize>,
    failing_updates: HashSet<String>,
    failing_deletes: HashSet<String>,
    failing_media_pages: Mutex<usize>,
    untyped_downloads: bool,
    calls: Mutex<ContentCalls>,
}

impl MockContentStore {
    pub fn new(media: Vec<MediaItem>) -> Self {
        Self {
            media: Mutex::new(media),
            ..Self::default()
        }
    }

    /// Serve `objects` under `object_type`.
    pub fn with_objects(mut self, object_type: &str, objects: Vec<ContentObject>) -> Self {
        self.objects
            .entry(object_type.to_string())
            .or_default()
            .extend(objects);
        self
    }

    /// Fail every download whose URL contains `pattern`.
    pub fn with_unreachable(mut self, pattern: &str) -> Self {
        self.unreachable.insert(pattern.to_string());
        self
    }

    /// Fail pages of `object_type` from page index `from_page` on.
    pub fn with_failing_type(mut self, object_type: &str, from_page: usize) -> Self {
        self.failing_types.insert(object_type.to_string(), from_page);
        self
    }

    /// Answer "not found" for pages of `object_type` from page index
    /// `from_page` on.
    pub fn with_vanishing_type(mut self, object_type: &str, from_page: usize) -> Self {
        self.vanishing_types.insert(object_type.to_string(), from_page);
        self
    }

    /// Fail metadata updates of object `id`.
    pub fn with_failing_update(mut self, id: &str) -> Self {
        self.failing_updates.insert(id.to_string());
        self
    }

    /// Fail deletion of media `id`.
    pub fn with_failing_delete(mut self, id: &str) -> Self {
        self.failing_deletes.insert(id.to_string());
        self
    }

    /// Fail the next `count` media page requests with a 503.
    pub fn with_failing_media_pages(self, count: usize) -> Self {
        *self.failing_media_pages.lock().unwrap() = count;
        self
    }

    /// Serve downloads without a content-type header.
    pub fn without_content_type(mut self) -> Self {
        self.untyped_downloads = true;
        self
    }

    pub fn calls(&self) -> ContentCalls {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining_media(&self) -> usize {
        self.media.lock().unwrap().len()
    }

    fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
        Page {
            items: items.iter().skip(page.skip).take(page.limit).cloned().collect(),
            total: Some(items.len()),
        }
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn list_media(&self, page: PageRequest) -> ColdcutResult<Page<MediaItem>> {
        self.calls.lock().unwrap().media_pages += 1;
        {
            let mut failing = self.failing_media_pages.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(ContentError::new(ContentErrorKind::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
                .into());
            }
        }
        let media = self.media.lock().unwrap();
        Ok(Self::paginate(&media, page))
    }

    async fn list_objects(
        &self,
        object_type: &str,
        page: PageRequest,
    ) -> ColdcutResult<Page<ContentObject>> {
        let page_index = page.skip / page.limit.max(1);
        self.calls
            .lock()
            .unwrap()
            .object_pages
            .push((object_type.to_string(), page_index));

        let failing = self
            .failing_types
            .get(object_type)
            .is_some_and(|from_page| page_index >= *from_page);
        if failing {
            return Err(ContentError::new(ContentErrorKind::Api {
                status: 500,
                message: "boom".to_string(),
            })
            .into());
        }

        let vanished = self
            .vanishing_types
            .get(object_type)
            .is_some_and(|from_page| page_index >= *from_page);

        match self.objects.get(object_type) {
            Some(objects) if !vanished => Ok(Self::paginate(objects, page)),
            _ => Err(ContentError::new(ContentErrorKind::NotFound(format!(
                "objects of type '{}'",
                object_type
            )))
            .into()),
        }
    }

    async fn update_metadata(
        &self,
        object_id: &str,
        field: &str,
        value: &str,
    ) -> ColdcutResult<()> {
        if self.failing_updates.contains(object_id) {
            return Err(ContentError::new(ContentErrorKind::Api {
                status: 422,
                message: "rejected".to_string(),
            })
            .into());
        }
        self.calls.lock().unwrap().updates.push((
            object_id.to_string(),
            field.to_string(),
            value.to_string(),
        ));
        Ok(())
    }

    async fn delete_media(&self, media_id: &str) -> ColdcutResult<()> {
        if self.failing_deletes.contains(media_id) {
            return Err(ContentError::new(ContentErrorKind::Api {
                status: 500,
                message: "delete failed".to_string(),
            })
            .into());
        }
        self.calls.lock().unwrap().deletes.push(media_id.to_string());
        self.media.lock().unwrap().retain(|item| item.id() != media_id);
        Ok(())
    }

    async fn download(&self, url: &str) -> ColdcutResult<Download> {
        self.calls.lock().unwrap().downloads.push(url.to_string());
        if self
            .unreachable
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
        {
            return Err(ContentError::new(ContentErrorKind::Download {
                url: url.to_string(),
                message: "connection reset".to_string(),
            })
            .into());
        }
        Ok(Download {
            url: url.to_string(),
            data: url.as_bytes().to_vec(),
            content_type: (!self.untyped_downloads).then(|| "image/jpeg".to_string()),
        })
    }
}
