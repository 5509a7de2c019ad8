//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{bail, Context as _, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use tera::Context;

use crate::content::{filter_by_category, get_distinct_categories, BlogMetadata, Page, Post};
use crate::helpers::{category_path, date_xml, full_url_for, page_path, post_path};
use crate::templates::{CategoryData, NavPost, PostData, SiteData, TemplateRenderer};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
        })
    }

    /// Generate the entire site. `posts` must already be newest first.
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        let metadata: Vec<BlogMetadata> = posts.iter().map(|p| p.meta.clone()).collect();

        self.generate_index_page(&metadata)?;
        self.generate_post_pages(posts)?;
        self.generate_category_pages(&metadata)?;
        self.generate_page_pages(pages)?;

        if self.blog.config.feed.enable {
            self.generate_atom_feed(posts)?;
        }

        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::new(&self.blog.config));
        context.insert("generator_version", env!("CARGO_PKG_VERSION"));
        context
    }

    fn post_data(&self, posts: &[BlogMetadata]) -> Vec<PostData> {
        posts
            .iter()
            .map(|meta| PostData::new(&self.blog.config, meta))
            .collect()
    }

    /// Generate the home page listing every post and category
    fn generate_index_page(&self, posts: &[BlogMetadata]) -> Result<()> {
        let categories: Vec<CategoryData> = get_distinct_categories(posts)
            .iter()
            .map(|c| CategoryData::new(&self.blog.config, c))
            .collect();

        let mut context = self.create_base_context();
        context.insert("posts", &self.post_data(posts));
        context.insert("categories", &categories);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output("", &html)?;
        tracing::info!("Generated index page");

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        let config = &self.blog.config;

        for post in posts {
            let prev_post = post.prev(posts).map(|p| NavPost::new(config, &p.meta));
            let next_post = post.next(posts).map(|p| NavPost::new(config, &p.meta));

            let mut context = self.create_base_context();
            context.insert("post", &PostData::new(config, &post.meta));
            context.insert("content", &post.content);
            context.insert("prev_post", &prev_post);
            context.insert("next_post", &next_post);

            let html = self.renderer.render("post.html", &context)?;
            self.write_output(&post_path(config, post.slug()), &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate one listing page per distinct category
    fn generate_category_pages(&self, posts: &[BlogMetadata]) -> Result<()> {
        let config = &self.blog.config;
        let categories = get_distinct_categories(posts);

        for category in &categories {
            // `posts` is already newest first and filtering keeps order
            let category_posts = filter_by_category(posts.to_vec(), &category.slug);

            let mut context = self.create_base_context();
            context.insert("category", &CategoryData::new(config, category));
            context.insert("posts", &self.post_data(&category_posts));

            let html = self.renderer.render("category.html", &context)?;
            self.write_output(&category_path(config, &category.slug), &html)?;
        }

        tracing::info!("Generated {} category pages", categories.len());
        Ok(())
    }

    /// Generate standalone pages
    fn generate_page_pages(&self, pages: &[Page]) -> Result<()> {
        for page in pages {
            let mut context = self.create_base_context();
            context.insert("page_title", &page.title);
            context.insert("content", &page.content);

            let html = self.renderer.render("page.html", &context)?;
            self.write_output(&page_path(&page.slug), &html)?;
        }

        tracing::info!("Generated {} standalone pages", pages.len());
        Ok(())
    }

    /// Generate Atom feed
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.blog.config;
        let home = full_url_for(config, "");
        let updated = posts
            .iter()
            .find_map(|p| p.meta.timestamp())
            .unwrap_or_else(chrono::Utc::now);

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            escape_xml(&full_url_for(config, &config.feed.path))
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", escape_xml(&home)));
        feed.push_str(&format!("  <updated>{}</updated>\n", date_xml(&updated)));
        feed.push_str(&format!("  <id>{}</id>\n", escape_xml(&home)));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(config.feed.limit) {
            let url = escape_xml(&full_url_for(config, &post_path(config, post.slug())));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&post.meta.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
            feed.push_str(&format!("    <id>{}</id>\n", url));
            if let Some(date) = post.meta.timestamp() {
                feed.push_str(&format!("    <updated>{}</updated>\n", date_xml(&date)));
            }
            for category in &post.meta.categories {
                feed.push_str(&format!(
                    "    <category term=\"{}\" label=\"{}\"/>\n",
                    escape_xml(&category.slug),
                    escape_xml(&category.name)
                ));
            }
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&strip_invalid_xml_chars(&post.meta.snippet))
            ));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                strip_invalid_xml_chars(&post.content).replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.output_path(&config.feed.path)?;
        write_file(&output_path, &feed)?;
        tracing::info!("Generated {}", config.feed.path);

        Ok(())
    }

    fn output_path(&self, route: &str) -> Result<PathBuf> {
        resolve_output(&self.blog.public_dir, route)
    }

    /// Write `html` as the index.html of the route `path`
    fn write_output(&self, path: &str, html: &str) -> Result<()> {
        let output_path = self.output_path(path)?.join("index.html");
        write_file(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Resolve a route under the public directory. Only plain path segments are
/// accepted, so nothing is written outside it.
fn resolve_output(public_dir: &Path, route: &str) -> Result<PathBuf> {
    let relative = Path::new(route.trim_start_matches('/'));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        bail!("Route {:?} leaves the public directory", route);
    }
    Ok(public_dir.join(relative))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
