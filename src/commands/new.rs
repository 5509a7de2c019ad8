//! Create a new post

use anyhow::{bail, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::check_slug;
use crate::Blog;

/// Front-matter written for a fresh post
#[derive(Serialize)]
struct NewPostFrontMatter<'a> {
    title: &'a str,
    slug: &'a str,
    date: String,
    categories: &'a [String],
}

/// Create a new post file and return its path
pub fn create_post(
    blog: &Blog,
    title: &str,
    slug: Option<&str>,
    categories: &[String],
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a slug from title {:?}, pass one explicitly", title);
    }
    check_slug(&slug)?;

    fs::create_dir_all(&blog.posts_dir)?;

    let file_path = blog.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let front_matter = NewPostFrontMatter {
        title,
        slug: &slug,
        date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        categories,
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&front_matter)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
