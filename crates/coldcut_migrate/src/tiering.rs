//! Hot/cold split.

use coldcut_core::{MediaItem, TierAssignment};

/// Split media into the `hot_limit` most recent items and the rest.
///
/// Items are stably sorted by upload time, newest first, so ties keep
/// their input order. The cold tier keeps that order and is the order in
/// which items are processed.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use coldcut_core::MediaItem;
/// use coldcut_migrate::split;
///
/// let items: Vec<MediaItem> = (0..5)
///     .map(|day| {
///         MediaItem::builder()
///             .id(format!("m{}", day))
///             .display_name(format!("m{}.jpg", day))
///             .uploaded_at(Utc.with_ymd_and_hms(2024, 1, 1 + day, 0, 0, 0).unwrap())
///             .build()
///             .unwrap()
///     })
///     .collect();
///
/// let tiers = split(items, 2);
/// let hot: Vec<&str> = tiers.hot.iter().map(|m| m.id().as_str()).collect();
/// assert_eq!(hot, ["m4", "m3"]);
/// assert_eq!(tiers.cold.len(), 3);
/// ```
pub fn split(mut items: Vec<MediaItem>, hot_limit: usize) -> TierAssignment {
    items.sort_by(|a, b| b.uploaded_at().cmp(a.uploaded_at()));
    let cold = items.split_off(hot_limit.min(items.len()));
    TierAssignment { hot: items, cold }
}
