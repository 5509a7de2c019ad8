//! URL helper functions
//!
//! Every route the generator writes is derived here from a post, category or
//! page slug, so pages and links cannot disagree.

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Output path of a post, relative to the public directory
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    format!("{}/{}/", config.blog_dir.trim_matches('/'), slug)
}

/// Output path of a category listing, relative to the public directory
pub fn category_path(config: &SiteConfig, slug: &str) -> String {
    format!("{}/{}/", config.category_dir.trim_matches('/'), slug)
}

/// Output path of a miscellaneous page, relative to the public directory
pub fn page_path(slug: &str) -> String {
    format!("{}/", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/blog/about/"
        );
    }

    #[test]
    fn test_routes() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "hello"), "blog/hello/");
        assert_eq!(category_path(&config, "go-lang-"), "blog-category/go-lang-/");
        assert_eq!(page_path("about"), "about/");
        assert_eq!(
            url_for(&config, &post_path(&config, "hello")),
            "/blog/hello/"
        );
    }
}
