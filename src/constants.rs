// src/constants.rs
//
// Application-wide constants. Each one names where it is consumed.

use std::time::Duration;

/// NoteHub API root used when neither config file, environment nor flag sets one.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api";

/// Notes requested per page when `per_page` is not configured or is invalid.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Upper bound for a single HTTP call.
///
/// Used in: `infrastructure/config.rs`, `infrastructure/http.rs`
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How long a fetched list page is served from cache without a network call.
///
/// Used in: `application/app.rs`
pub const STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Quiescence window for search input before it reaches the query key.
///
/// Used in: `application/app.rs`
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Pages shown on each side of the current page in the pagination control.
///
/// Used in: `ports/terminal.rs`
pub const PAGE_RANGE_DISPLAYED: u32 = 2;

/// Characters of note content shown per list item.
///
/// Used in: `ports/terminal.rs`
pub const CONTENT_PREVIEW_CHARS: usize = 80;
