//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# blogsmith configuration

# Site
title: My Blog
description: ''
author: John Doe

# URL
url: http://example.com
root: /

# Directory
posts_dir: posts
miscellaneous_dir: miscellaneous
public_dir: public
blog_dir: blog
category_dir: blog-category

# Writing
snippet_length: 200
highlight:
  theme: base16-ocean.dark
  line_number: false

# Feed
feed:
  enable: true
  path: atom.xml
  limit: 20
"#;

const ABOUT_PAGE: &str = r#"---
title: About
---

# About

This blog is generated by blogsmith. Edit `miscellaneous/about.md` to
introduce yourself.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("Site already initialized: {:?}", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("miscellaneous"))?;

    fs::write(&config_path, DEFAULT_CONFIG)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
slug: hello-world
date: {}
categories:
  - General
---

Welcome to your new blog! This is your very first post.

## Quick Start

### Create a new post

```bash
$ blogsmith new "My New Post" --category Notes
```

### Generate static files

```bash
$ blogsmith generate
```

The site is written to `public/`.
"#,
        now.format("%Y-%m-%d")
    );

    fs::write(target_dir.join("posts/hello-world.md"), sample_post)?;
    fs::write(target_dir.join("miscellaneous/about.md"), ABOUT_PAGE)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("posts/hello-world.md").is_file());
        assert!(dir.path().join("miscellaneous/about.md").is_file());

        let config = SiteConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.snippet_length, 200);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
