//! Blog feed loading, normalization, and listing queries.
//!
//! The promo site ships its blog as a JSON array of posts. This module
//! parses that feed into typed records, normalizes the loosely authored
//! fields, and provides the pure queries the listing page needs: newest
//! first ordering, featured selection, category/search filtering.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PromoError;

/// One blog post as authored in the feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Post {
    #[serde(default)]
    pub slug: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// ISO-ish date string; posts with unparsable dates sort oldest.
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub minutes: Option<u32>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub content: String,
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

impl Post {
    /// Trim authored strings and drop empty tags.
    fn normalize(mut self) -> Self {
        self.slug = self.slug.trim().to_string();
        self.title = self.title.trim().to_string();
        self.excerpt = self.excerpt.trim().to_string();
        self.date = self.date.trim().to_string();
        self.category = self.category.trim().to_string();
        self.tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Sort key: seconds since epoch, or 0 when the date is unparsable.
    fn date_value(&self) -> i64 {
        parse_feed_date(&self.date)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0)
    }
}

/// Parse a feed date: RFC 3339 first, then plain `YYYY-MM-DD`.
fn parse_feed_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Load a feed from its JSON text.
///
/// Posts are normalized, posts without a slug are dropped, and the result
/// is sorted newest first.
///
/// # Errors
///
/// Returns [`PromoError::InvalidFeed`] when the text is not a JSON array
/// of posts.
pub fn load_posts(json: &str) -> Result<Vec<Post>, PromoError> {
    let raw: Vec<Post> =
        serde_json::from_str(json).map_err(|e| PromoError::InvalidFeed(e.to_string()))?;

    let mut posts: Vec<Post> = raw
        .into_iter()
        .map(Post::normalize)
        .filter(|p| !p.slug.is_empty())
        .collect();

    posts.sort_by_key(|p| std::cmp::Reverse(p.date_value()));
    Ok(posts)
}

/// The featured post: the first flagged one, else the newest.
pub fn featured(posts: &[Post]) -> Option<&Post> {
    posts.iter().find(|p| p.featured).or_else(|| posts.first())
}

/// Filter posts by category and free-text query.
///
/// `category` of `None` or `"all"` (case-insensitive) matches everything.
/// The query is a case-insensitive substring match over title, excerpt,
/// category, and tags.
pub fn filter<'a>(
    posts: &'a [Post],
    category: Option<&str>,
    query: Option<&str>,
) -> Vec<&'a Post> {
    let category = category
        .map(str::to_lowercase)
        .filter(|c| !c.is_empty() && c != "all");
    let query = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    posts
        .iter()
        .filter(|p| match &category {
            Some(c) => p.category.to_lowercase() == *c,
            None => true,
        })
        .filter(|p| match &query {
            Some(q) => {
                let haystack = format!(
                    "{} {} {} {}",
                    p.title,
                    p.excerpt,
                    p.category,
                    p.tags.join(" ")
                )
                .to_lowercase();
                haystack.contains(q.as_str())
            }
            None => true,
        })
        .collect()
}

/// Sorted, deduplicated category names.
pub fn unique_categories(posts: &[Post]) -> Vec<String> {
    let mut cats: Vec<String> = posts.iter().map(|p| p.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}

/// Format a feed date for display ("Mar 2, 2030"). Unparsable dates are
/// echoed back as written, or "—" when empty.
pub fn format_date(date: &str) -> String {
    match parse_feed_date(date) {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None if date.is_empty() => "—".to_string(),
        None => date.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
