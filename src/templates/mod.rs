//! Built-in theme templates using Tera template engine
//!
//! The templates are embedded directly in the binary, so a site needs nothing
//! but its markdown sources.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{BlogCategory, BlogMetadata};
use crate::helpers::{category_path, post_path, url_for};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Templates are named *.html, so Tera escapes every variable unless
        // it is piped through `safe`
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("post.html", include_str!("default/post.html")),
            ("category.html", include_str!("default/category.html")),
            ("page.html", include_str!("default/page.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub home_url: String,
    pub feed_url: Option<String>,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            home_url: url_for(config, ""),
            feed_url: config
                .feed
                .enable
                .then(|| url_for(config, &config.feed.path)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub url: String,
}

impl CategoryData {
    pub fn new(config: &SiteConfig, category: &BlogCategory) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            url: url_for(config, &category_path(config, &category.slug)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub snippet: String,
    pub date: String,
    pub url: String,
    pub categories: Vec<CategoryData>,
}

impl PostData {
    pub fn new(config: &SiteConfig, meta: &BlogMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            slug: meta.slug.clone(),
            snippet: meta.snippet.clone(),
            date: meta.date.clone(),
            url: url_for(config, &post_path(config, &meta.slug)),
            categories: meta
                .categories
                .iter()
                .map(|c| CategoryData::new(config, c))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl NavPost {
    pub fn new(config: &SiteConfig, meta: &BlogMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            url: url_for(config, &post_path(config, &meta.slug)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{extract_blog_meta, FrontMatter};

    fn base_context(config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::new(config));
        context.insert("generator_version", "test");
        context
    }

    #[test]
    fn test_post_data_urls() {
        let mut config = SiteConfig::default();
        config.root = "/sub/".to_string();
        let fm = FrontMatter {
            title: Some("Hello".to_string()),
            slug: Some("hello".to_string()),
            date: Some("2021-01-01".to_string()),
            categories: vec!["Go Lang!".to_string()],
            ..Default::default()
        };
        let data = PostData::new(&config, &extract_blog_meta(&fm, None).unwrap());
        assert_eq!(data.url, "/sub/blog/hello/");
        assert_eq!(data.categories[0].url, "/sub/blog-category/go-lang-/");
        assert_eq!(data.categories[0].name, "Go Lang!");
    }

    #[test]
    fn test_feed_url_follows_config() {
        let mut config = SiteConfig::default();
        assert_eq!(SiteData::new(&config).feed_url.as_deref(), Some("/atom.xml"));
        config.feed.enable = false;
        assert!(SiteData::new(&config).feed_url.is_none());
    }

    #[test]
    fn test_render_page_escapes_title_not_content() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context(&config);
        context.insert("page_title", "Fish & Chips");
        context.insert("content", "<p>Body</p>");

        let html = renderer.render("page.html", &context).unwrap();
        assert!(html.contains("<title>Fish &amp; Chips | My Blog</title>"));
        assert!(html.contains("<section><p>Body</p></section>"));
        assert!(html.contains("Author: John Doe"));
    }
}
