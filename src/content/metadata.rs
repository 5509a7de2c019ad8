//! Post metadata and category handling
//!
//! These are the pure transforms the rest of the generator is built on:
//! turning front-matter into a [`BlogMetadata`] record, normalising category
//! names into slugs, collecting the distinct categories of a set of posts and
//! ordering posts newest first.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use super::FrontMatter;
use crate::helpers::parse_date;

/// Number of body characters used when a post has no `snippet`
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

lazy_static! {
    static ref NON_SLUG_RUN: Regex = Regex::new(r"[^A-Za-z0-9-]+").unwrap();
}

/// Metadata extraction errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetadataError {
    #[error("missing required front-matter field `{0}`")]
    MissingField(&'static str),
    #[error("slug {0:?} cannot be used as a route")]
    InvalidSlug(String),
}

/// A category a post is filed under.
///
/// Two categories are the same category when their slugs match, whatever
/// their display names.
#[derive(Debug, Clone, Serialize)]
pub struct BlogCategory {
    /// Name as written in the front-matter
    pub name: String,
    /// Normalised name, see [`sanitise_category`]
    pub slug: String,
}

impl BlogCategory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: sanitise_category(name),
        }
    }
}

impl PartialEq for BlogCategory {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for BlogCategory {}

impl Hash for BlogCategory {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

/// Listing metadata of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogMetadata {
    pub title: String,
    pub snippet: String,
    /// Routing key, unique across posts
    pub slug: String,
    pub categories: Vec<BlogCategory>,
    /// Date as written in the front-matter
    pub date: String,
}

impl BlogMetadata {
    /// The parsed publication date, if the date string is understood
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }

    /// Whether the post is filed under the category with this slug
    pub fn has_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }
}

/// Build a post's metadata from its front-matter.
///
/// When the front-matter carries no snippet, the first
/// [`DEFAULT_SNIPPET_LENGTH`] characters of `body` are used instead, or an
/// empty snippet without a body.
pub fn extract_blog_meta(
    front_matter: &FrontMatter,
    body: Option<&str>,
) -> Result<BlogMetadata, MetadataError> {
    extract_blog_meta_with_length(front_matter, body, DEFAULT_SNIPPET_LENGTH)
}

/// [`extract_blog_meta`] with a custom snippet length
pub fn extract_blog_meta_with_length(
    front_matter: &FrontMatter,
    body: Option<&str>,
    snippet_length: usize,
) -> Result<BlogMetadata, MetadataError> {
    let title = front_matter
        .title
        .clone()
        .ok_or(MetadataError::MissingField("title"))?;
    let slug = front_matter
        .slug
        .clone()
        .ok_or(MetadataError::MissingField("slug"))?;
    let date = front_matter
        .date
        .clone()
        .ok_or(MetadataError::MissingField("date"))?;

    let snippet = match (&front_matter.snippet, body) {
        (Some(snippet), _) => snippet.clone(),
        (None, Some(body)) => body.chars().take(snippet_length).collect(),
        (None, None) => String::new(),
    };

    let categories = front_matter
        .categories
        .iter()
        .map(|c| BlogCategory::new(c))
        .collect();

    Ok(BlogMetadata {
        title,
        snippet,
        slug,
        categories,
        date,
    })
}

/// Normalise a category name into a URL-safe slug.
///
/// Each run of characters other than ASCII letters, digits and `-` becomes a
/// single `-`, then the whole name is lowercased. Applying it twice changes
/// nothing.
pub fn sanitise_category(category: &str) -> String {
    NON_SLUG_RUN.replace_all(category, "-").to_lowercase()
}

/// Check that `slug` names a single route segment.
///
/// Slugs become a directory under the public directory and part of an
/// `href`. Path separators, `..`, whitespace, control characters and HTML or
/// URL metacharacters are refused.
pub fn check_slug(slug: &str) -> Result<(), MetadataError> {
    const RESERVED: &[char] = &['/', '\\', '"', '\'', '<', '>', '&', '?', '#', '%'];

    let invalid = slug.is_empty()
        || slug == "."
        || slug.contains("..")
        || slug
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(&c));

    if invalid {
        Err(MetadataError::InvalidSlug(slug.to_string()))
    } else {
        Ok(())
    }
}

/// Every category used by `posts`, once per slug, ordered by slug.
///
/// The first name seen for a slug is the one kept.
pub fn get_distinct_categories(posts: &[BlogMetadata]) -> Vec<BlogCategory> {
    let mut distinct: IndexMap<&str, &BlogCategory> = IndexMap::new();
    for category in posts.iter().flat_map(|p| &p.categories) {
        distinct.entry(category.slug.as_str()).or_insert(category);
    }

    let mut categories: Vec<BlogCategory> = distinct.into_values().cloned().collect();
    categories.sort_by(|a, b| a.slug.cmp(&b.slug));
    categories
}

/// Posts filed under the category `slug`, in their original order
pub fn filter_by_category(posts: Vec<BlogMetadata>, slug: &str) -> Vec<BlogMetadata> {
    posts.into_iter().filter(|p| p.has_category(slug)).collect()
}

/// Order posts newest first.
///
/// The sort is stable, so posts sharing a date keep their relative order.
/// Posts whose date cannot be parsed go last.
pub fn sort_blog_meta_descending(posts: &mut [BlogMetadata]) {
    posts.sort_by_cached_key(|p| std::cmp::Reverse(p.timestamp()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_matter(slug: &str, date: &str, categories: &[&str]) -> FrontMatter {
        FrontMatter {
            title: Some(format!("Post {}", slug)),
            slug: Some(slug.to_string()),
            date: Some(date.to_string()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn meta(slug: &str, date: &str, categories: &[&str]) -> BlogMetadata {
        extract_blog_meta(&front_matter(slug, date, categories), None).unwrap()
    }

    fn slugs(posts: &[BlogMetadata]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_extract_keeps_slug() {
        for slug in ["hello-world", "Mixed_Case", "2021/odd path", ""] {
            let fm = front_matter(slug, "2021-01-01", &[]);
            assert_eq!(extract_blog_meta(&fm, None).unwrap().slug, slug);
        }
    }

    #[test]
    fn test_extract_defaults() {
        let fm = front_matter("a", "2021-01-01", &[]);
        let meta = extract_blog_meta(&fm, None).unwrap();
        assert_eq!(meta.title, "Post a");
        assert_eq!(meta.snippet, "");
        assert!(meta.categories.is_empty());
        assert_eq!(meta.date, "2021-01-01");
    }

    #[test]
    fn test_extract_normalises_categories() {
        let fm = front_matter("a", "2021-01-01", &["Go Lang!", "Rust"]);
        let meta = extract_blog_meta(&fm, None).unwrap();
        assert_eq!(meta.categories[0].name, "Go Lang!");
        assert_eq!(meta.categories[0].slug, "go-lang-");
        assert_eq!(meta.categories[1].name, "Rust");
        assert_eq!(meta.categories[1].slug, "rust");
    }

    #[test]
    fn test_snippet_from_front_matter_wins() {
        let mut fm = front_matter("a", "2021-01-01", &[]);
        fm.snippet = Some("Short".to_string());
        let meta = extract_blog_meta(&fm, Some("A much longer body")).unwrap();
        assert_eq!(meta.snippet, "Short");
    }

    #[test]
    fn test_snippet_defaults_to_body_prefix() {
        let body = format!("Hello world...{}", "x".repeat(300));
        let fm = front_matter("a", "2021-01-01", &[]);
        let meta = extract_blog_meta(&fm, Some(&body)).unwrap();
        assert_eq!(meta.snippet.chars().count(), 200);
        assert_eq!(meta.snippet, body[..200]);
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let body = "é".repeat(250);
        let fm = front_matter("a", "2021-01-01", &[]);
        let meta = extract_blog_meta(&fm, Some(&body)).unwrap();
        assert_eq!(meta.snippet, "é".repeat(200));
    }

    #[test]
    fn test_short_body_is_whole_snippet() {
        let fm = front_matter("a", "2021-01-01", &[]);
        let meta = extract_blog_meta_with_length(&fm, Some("tiny"), 10).unwrap();
        assert_eq!(meta.snippet, "tiny");
    }

    #[test]
    fn test_missing_required_fields() {
        let mut fm = front_matter("a", "2021-01-01", &[]);
        fm.title = None;
        assert_eq!(
            extract_blog_meta(&fm, None),
            Err(MetadataError::MissingField("title"))
        );

        let mut fm = front_matter("a", "2021-01-01", &[]);
        fm.slug = None;
        assert_eq!(
            extract_blog_meta(&fm, None),
            Err(MetadataError::MissingField("slug"))
        );

        let mut fm = front_matter("a", "2021-01-01", &[]);
        fm.date = None;
        assert_eq!(
            extract_blog_meta(&fm, None),
            Err(MetadataError::MissingField("date"))
        );
    }

    #[test]
    fn test_sanitise_category() {
        assert_eq!(sanitise_category("Go Lang!"), "go-lang-");
        assert_eq!(sanitise_category("tech"), "tech");
        assert_eq!(sanitise_category("C++ & Rust"), "c-rust");
        assert_eq!(sanitise_category("already-a-slug"), "already-a-slug");
        assert_eq!(sanitise_category("Café au lait"), "caf-au-lait");
        assert_eq!(sanitise_category(""), "");
    }

    #[test]
    fn test_sanitise_category_is_idempotent() {
        for name in ["Go Lang!", "  spaced  out ", "UPPER_case", "日本語", "a--b", "-x-"] {
            let once = sanitise_category(name);
            assert_eq!(sanitise_category(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_category_equality_is_by_slug() {
        assert_eq!(BlogCategory::new("Go Lang"), BlogCategory::new("go lang"));
        assert_ne!(BlogCategory::new("Go"), BlogCategory::new("Rust"));
    }

    #[test]
    fn test_distinct_categories_of_nothing() {
        assert!(get_distinct_categories(&[]).is_empty());
        assert!(get_distinct_categories(&[meta("a", "2021-01-01", &[])]).is_empty());
    }

    #[test]
    fn test_distinct_categories_dedup_and_sort() {
        let posts = vec![
            meta("a", "2021-01-01", &["tech"]),
            meta("b", "2021-01-02", &["tech", "life"]),
        ];
        let categories = get_distinct_categories(&posts);
        let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["life", "tech"]);
    }

    #[test]
    fn test_distinct_categories_keep_first_name() {
        let posts = vec![
            meta("a", "2021-01-01", &["Web Dev"]),
            meta("b", "2021-01-02", &["web-dev"]),
        ];
        let categories = get_distinct_categories(&posts);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Web Dev");
        assert_eq!(categories[0].slug, "web-dev");
    }

    #[test]
    fn test_filter_by_category() {
        let posts = vec![
            meta("a", "2021-01-01", &["tech"]),
            meta("b", "2021-01-02", &["life"]),
            meta("c", "2021-01-03", &["Life", "tech"]),
        ];
        assert_eq!(slugs(&filter_by_category(posts.clone(), "life")), vec!["b", "c"]);
        assert_eq!(slugs(&filter_by_category(posts.clone(), "tech")), vec!["a", "c"]);
        assert!(filter_by_category(posts, "Life").is_empty());
    }

    #[test]
    fn test_sort_descending() {
        let mut posts = vec![meta("old", "2021-01-01", &[]), meta("new", "2022-01-01", &[])];
        sort_blog_meta_descending(&mut posts);
        assert_eq!(slugs(&posts), vec!["new", "old"]);
    }

    #[test]
    fn test_sort_compares_dates_not_strings() {
        let mut posts = vec![
            meta("slashes", "2021/06/01", &[]),
            meta("dashes", "2021-12-01", &[]),
            meta("timed", "2021-06-01 12:00", &[]),
        ];
        sort_blog_meta_descending(&mut posts);
        assert_eq!(slugs(&posts), vec!["dashes", "timed", "slashes"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut posts = vec![
            meta("first", "2021-01-01", &[]),
            meta("newest", "2023-01-01", &[]),
            meta("second", "2021-01-01", &[]),
            meta("third", "2021-01-01T00:00:00Z", &[]),
        ];
        sort_blog_meta_descending(&mut posts);
        assert_eq!(slugs(&posts), vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_puts_unparseable_dates_last() {
        let mut posts = vec![
            meta("bad", "someday", &[]),
            meta("old", "2001-01-01", &[]),
            meta("worse", "", &[]),
            meta("new", "2020-01-01", &[]),
        ];
        sort_blog_meta_descending(&mut posts);
        assert_eq!(slugs(&posts), vec!["new", "old", "bad", "worse"]);
    }

    #[test]
    fn test_check_slug() {
        for ok in ["hello-world", "2024_notes", "v1.2", "café"] {
            assert_eq!(check_slug(ok), Ok(()), "{}", ok);
        }
        for bad in [
            "",
            ".",
            "..",
            "../../escaped",
            "a/b",
            r"a\b",
            r#"x" onclick="alert(1)"#,
            "<b>",
            "two words",
            "q?x",
        ] {
            assert_eq!(
                check_slug(bad),
                Err(MetadataError::InvalidSlug(bad.to_string())),
                "{}",
                bad
            );
        }
    }
}
