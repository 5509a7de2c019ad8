//! Content loader - loads posts and pages from the source directories

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::metadata::{
    check_slug, extract_blog_meta_with_length, filter_by_category, sort_blog_meta_descending,
};
use super::{BlogMetadata, FrontMatter, MarkdownRenderer, Page, Post};
use crate::Blog;

/// Loads content from the posts and miscellaneous directories
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(&blog.config.highlight);
        Self { blog, renderer }
    }

    /// Names of the markdown files in the posts directory
    pub fn post_file_names(&self) -> Result<Vec<String>> {
        markdown_file_names(&self.blog.posts_dir)
    }

    /// Metadata of every post, optionally only those filed under the
    /// category slug `filter`. Posts keep file-name order.
    pub fn load_metadata(&self, filter: Option<&str>) -> Result<Vec<BlogMetadata>> {
        let mut metadata = Vec::new();
        for file_name in self.post_file_names()? {
            let path = self.blog.posts_dir.join(&file_name);
            let content = read(&path)?;
            let (meta, _) = self.parse_post(&path, &content)?;
            metadata.push(meta);
        }

        Ok(match filter {
            Some(slug) if !slug.is_empty() => filter_by_category(metadata, slug),
            _ => metadata,
        })
    }

    /// Load all posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for file_name in self.post_file_names()? {
            let post = self.load_post_file(&self.blog.posts_dir.join(&file_name))?;
            if let Some(other) = seen.insert(post.meta.slug.clone(), post.source.clone()) {
                bail!(
                    "Duplicate post slug {:?} in {:?} and {:?}",
                    post.meta.slug,
                    other,
                    post.source
                );
            }
            posts.push(post);
        }

        // Sort the metadata, then put the posts in the same order
        let mut order: Vec<BlogMetadata> = posts.iter().map(|p| p.meta.clone()).collect();
        sort_blog_meta_descending(&mut order);
        let mut by_slug: HashMap<String, Post> = posts
            .into_iter()
            .map(|p| (p.meta.slug.clone(), p))
            .collect();
        let posts = order
            .iter()
            .filter_map(|meta| by_slug.remove(&meta.slug))
            .collect();

        Ok(posts)
    }

    /// Load the post stored as `{slug}.md`
    pub fn load_post(&self, slug: &str) -> Result<Post> {
        self.load_post_file(&self.blog.posts_dir.join(format!("{}.md", slug)))
    }

    /// Load a single post from a file
    fn load_post_file(&self, path: &Path) -> Result<Post> {
        let content = read(path)?;
        let (meta, body) = self.parse_post(path, &content)?;

        let html = self
            .renderer
            .render(body)
            .with_context(|| format!("Failed to render {:?}", path))?;

        Ok(Post {
            meta,
            content: html,
            source: path.to_path_buf(),
        })
    }

    /// Split a post into metadata and markdown body
    fn parse_post<'c>(&self, path: &Path, content: &'c str) -> Result<(BlogMetadata, &'c str)> {
        let (mut fm, body) = FrontMatter::parse(content)
            .with_context(|| format!("Failed to parse front-matter of {:?}", path))?;

        // Posts without a slug are routed by file name
        if fm.slug.is_none() {
            fm.slug = file_stem(path);
        }

        let meta = extract_blog_meta_with_length(&fm, Some(body), self.blog.config.snippet_length)
            .with_context(|| format!("Invalid post {:?}", path))?;
        check_slug(&meta.slug).with_context(|| format!("Invalid post {:?}", path))?;

        if meta.timestamp().is_none() {
            tracing::warn!("Unrecognised date {:?} in {:?}", meta.date, path);
        }

        Ok((meta, body))
    }

    /// Load all pages from the miscellaneous directory
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        for file_name in markdown_file_names(&self.blog.miscellaneous_dir)? {
            let path = self.blog.miscellaneous_dir.join(&file_name);
            pages.push(self.load_page(&path)?);
        }

        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = read(path)?;
        let (fm, body) = FrontMatter::parse(&content)
            .with_context(|| format!("Failed to parse front-matter of {:?}", path))?;

        let slug = file_stem(path).with_context(|| format!("Invalid page name {:?}", path))?;
        check_slug(&slug).with_context(|| format!("Invalid page name {:?}", path))?;

        let html = self
            .renderer
            .render(body)
            .with_context(|| format!("Failed to render {:?}", path))?;

        Ok(Page {
            slug,
            title: fm.title,
            content: html,
            source: path.to_path_buf(),
        })
    }
}

/// Names of the markdown files directly inside `dir`, sorted.
/// A missing directory has no files.
pub fn markdown_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read directory {:?}", dir))?;
        let path = entry.path();
        if path.is_file() && is_markdown_file(path) {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    Ok(names)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
