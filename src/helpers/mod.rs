//! Helper functions shared by the loader and the generator

mod date;
mod url;

pub use date::*;
pub use url::*;
