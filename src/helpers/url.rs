//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in a query value
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// URL of a post page
pub fn post_url(slug: &str) -> String {
    format!("/post/{}", slug)
}

/// URL of the index filtered by a tag
pub fn tag_filter_url(tag: &str) -> String {
    format!("/?tag={}", utf8_percent_encode(tag, QUERY_VALUE))
}
