//! Helper functions shared by templates and pages

mod url;

pub use url::*;
