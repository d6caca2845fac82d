//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone inside a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Mount point of the blog pages
pub const BLOG_PATH: &str = "/blog";

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Path of a post's detail page
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/blog/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("{}/{}", BLOG_PATH, encode_segment(slug))
}
