//! Clean the public directory

use anyhow::{bail, Context, Result};
use std::fs;

use crate::Blog;

/// Remove the public directory
pub fn run(blog: &Blog) -> Result<()> {
    if !blog.public_dir.exists() {
        return Ok(());
    }

    let public_dir = fs::canonicalize(&blog.public_dir)
        .with_context(|| format!("Failed to resolve {:?}", blog.public_dir))?;
    let base_dir = fs::canonicalize(&blog.base_dir)
        .with_context(|| format!("Failed to resolve {:?}", blog.base_dir))?;

    // Never delete the site sources along with the output
    if base_dir.starts_with(&public_dir) {
        bail!(
            "Refusing to clean {:?}: it contains the site directory {:?}",
            blog.public_dir,
            blog.base_dir
        );
    }

    fs::remove_dir_all(&blog.public_dir)
        .with_context(|| format!("Failed to delete {:?}", blog.public_dir))?;
    tracing::info!("Deleted: {:?}", blog.public_dir);

    Ok(())
}
