//! Post and Page models

use serde::Serialize;
use std::path::PathBuf;

use super::BlogMetadata;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Listing metadata
    pub meta: BlogMetadata,

    /// Rendered HTML content
    pub content: String,

    /// Source file path
    pub source: PathBuf,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    /// Get the previous (older) post in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug() == self.slug())?;
        posts.get(pos + 1)
    }

    /// Get the next (newer) post in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug() == self.slug())?;
        pos.checked_sub(1).and_then(|i| posts.get(i))
    }
}

/// A standalone page from the miscellaneous directory
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// File stem, used as the route
    pub slug: String,

    /// Title from the front-matter, if any
    pub title: Option<String>,

    /// Rendered HTML content
    pub content: String,

    /// Source file path
    pub source: PathBuf,
}
