//! Tag list helpers for the index page

use indexmap::IndexMap;

use crate::content::Post;

/// Count how many posts carry each tag, in first-seen order
pub fn tag_frequencies(posts: &[Post]) -> IndexMap<String, usize> {
    let mut tags: IndexMap<String, usize> = IndexMap::new();

    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    tags
}

/// Tags ranked by count (descending), ties broken alphabetically
pub fn ranked_tags(posts: &[Post]) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = tag_frequencies(posts).into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// The `limit` most used tags
pub fn top_tags(posts: &[Post], limit: usize) -> Vec<String> {
    ranked_tags(posts)
        .into_iter()
        .take(limit)
        .map(|(tag, _)| tag)
        .collect()
}

/// Posts carrying `tag`, or all posts when no tag is given
pub fn filter_by_tag<'a>(posts: &'a [Post], tag: Option<&str>) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| tag.map_or(true, |t| post.has_tag(t)))
        .collect()
}
