//! List site content

use anyhow::Result;
use std::io::Write;

use crate::content::loader::ContentLoader;
use crate::content::{get_distinct_categories, sort_blog_meta_descending};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, category: Option<&str>) -> Result<()> {
    let stdout = std::io::stdout();
    write_listing(blog, content_type, category, &mut stdout.lock())
}

/// Write the listing for `content_type` to `out`
pub fn write_listing<W: Write>(
    blog: &Blog,
    content_type: &str,
    category: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let loader = ContentLoader::new(blog);

    match content_type {
        "post" | "posts" => {
            let mut posts = loader.load_metadata(category)?;
            sort_blog_meta_descending(&mut posts);
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(out, "  {} - {} [{}]", post.date, post.title, post.slug)?;
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            writeln!(out, "Pages ({}):", pages.len())?;
            for page in pages {
                writeln!(
                    out,
                    "  {} [{}]",
                    page.title.as_deref().unwrap_or("(untitled)"),
                    page.slug
                )?;
            }
        }
        "category" | "categories" => {
            let posts = loader.load_metadata(None)?;
            let categories = get_distinct_categories(&posts);
            writeln!(out, "Categories ({}):", categories.len())?;
            for cat in categories {
                let count = posts.iter().filter(|p| p.has_category(&cat.slug)).count();
                writeln!(out, "  {} [{}] ({})", cat.name, cat.slug, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, category",
                content_type
            );
        }
    }

    Ok(())
}
