//! Reference resolution against candidate media.

use coldcut_core::{MediaItem, filename_from_url};
use std::collections::HashMap;

/// Ways a reference string can denote a media item, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MatchStrategy {
    /// Reference is the media id
    ExactId,
    /// Reference is the display name
    ExactDisplayName,
    /// Reference is the primary URL
    ExactPrimaryUrl,
    /// Reference is the alternate (CDN) URL
    ExactAlternateUrl,
    /// Reference URL ends in the same filename as one of the media URLs
    FilenameSuffix,
}

impl MatchStrategy {
    /// Strategies in the order they are tried.
    pub const PRIORITY: [Self; 5] = [
        Self::ExactId,
        Self::ExactDisplayName,
        Self::ExactPrimaryUrl,
        Self::ExactAlternateUrl,
        Self::FilenameSuffix,
    ];

    /// Index key derived from a reference string.
    pub fn reference_key(self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        match self {
            Self::FilenameSuffix => filename_from_url(reference).map(str::to_string),
            _ => Some(reference.to_string()),
        }
    }

    /// Index keys a media item is reachable under.
    pub fn media_keys(self, media: &MediaItem) -> Vec<String> {
        let keys: Vec<&str> = match self {
            Self::ExactId => vec![media.id().as_str()],
            Self::ExactDisplayName => vec![media.display_name().as_str()],
            Self::ExactPrimaryUrl => media.primary_url().as_deref().into_iter().collect(),
            Self::ExactAlternateUrl => media.alternate_url().as_deref().into_iter().collect(),
            Self::FilenameSuffix => media.source_urls().filter_map(filename_from_url).collect(),
        };
        let mut keys: Vec<String> = keys
            .into_iter()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();
        keys.dedup();
        keys
    }

    /// Whether `reference` denotes `media` under this strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use coldcut_core::MediaItem;
    /// use coldcut_migrate::MatchStrategy;
    ///
    /// let media = MediaItem::builder()
    ///     .id("m1")
    ///     .display_name("abc-cover.jpg")
    ///     .primary_url("https://cdn.example.com/radio/abc-cover.jpg")
    ///     .uploaded_at(Utc::now())
    ///     .build()
    ///     .unwrap();
    ///
    /// let reference = "https://imgix.example.com/abc-cover.jpg?w=300";
    /// assert!(!MatchStrategy::ExactPrimaryUrl.matches(reference, &media));
    /// assert!(MatchStrategy::FilenameSuffix.matches(reference, &media));
    /// ```
    pub fn matches(self, reference: &str, media: &MediaItem) -> bool {
        match self.reference_key(reference) {
            Some(key) => self.media_keys(media).contains(&key),
            None => false,
        }
    }
}

/// Candidate media indexed by every strategy's key.
///
/// A key shared by two or more distinct candidates is ambiguous and never
/// resolves under that strategy.
#[derive(Debug, Clone)]
pub struct MediaLookup<'a> {
    candidates: &'a [MediaItem],
    keys: HashMap<MatchStrategy, HashMap<String, Vec<usize>>>,
}

impl<'a> MediaLookup<'a> {
    /// Index the candidates.
    pub fn new(candidates: &'a [MediaItem]) -> Self {
        let mut keys: HashMap<MatchStrategy, HashMap<String, Vec<usize>>> = HashMap::new();
        for strategy in MatchStrategy::PRIORITY {
            let index = keys.entry(strategy).or_default();
            for (position, media) in candidates.iter().enumerate() {
                for key in strategy.media_keys(media) {
                    let positions = index.entry(key).or_default();
                    if !positions.iter().any(|&p| candidates[p].id() == media.id()) {
                        positions.push(position);
                    }
                }
            }
        }
        Self { candidates, keys }
    }

    /// Number of indexed candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Resolve the reference strings of one field to at most one media item.
    ///
    /// Strategies are tried in priority order; within a strategy the
    /// candidate strings are tried in order. The first unambiguous hit wins.
    pub fn resolve<S: AsRef<str>>(
        &self,
        references: &[S],
    ) -> Option<(&'a MediaItem, MatchStrategy)> {
        let candidates = self.candidates;
        MatchStrategy::PRIORITY.into_iter().find_map(|strategy| {
            let index = self.keys.get(&strategy)?;
            references.iter().find_map(|reference| {
                let key = strategy.reference_key(reference.as_ref())?;
                match index.get(&key).map(Vec::as_slice) {
                    Some([position]) => Some((&candidates[*position], strategy)),
                    _ => None,
                }
            })
        })
    }
}
