//! Content module - handles posts, pages, and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod metadata;
mod post;

pub use frontmatter::{FrontMatter, FrontMatterError};
pub use markdown::MarkdownRenderer;
pub use metadata::{
    check_slug, extract_blog_meta, extract_blog_meta_with_length, filter_by_category,
    get_distinct_categories, sanitise_category, sort_blog_meta_descending, BlogCategory,
    BlogMetadata, MetadataError, DEFAULT_SNIPPET_LENGTH,
};
pub use post::{Page, Post};
