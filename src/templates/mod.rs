//! Page chrome built with maud
//!
//! The post fragment produced by the content processor is inserted
//! unescaped into the article; everything else is escaped by maud.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::{SiteConfig, SocialLink};
use crate::content::Post;
use crate::helpers::{post_url, tag_filter_url, tag_label};

const TAILWIND_JS: &str = "https://cdn.tailwindcss.com";
const HIGHLIGHT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/atom-one-dark.min.css";
const HIGHLIGHT_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js";
const HIGHLIGHT_INIT: &str =
    "document.addEventListener('DOMContentLoaded', function () { hljs.highlightAll(); });";

/// Live reload client, reloads the page when the server says so
pub const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
"#;

const CONTAINER: &str = "max-w-4xl mx-auto px-4 py-8";
const BACK_LINK: &str = "← Back to Home";

/// Options shared by every page
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub live_reload: bool,
}

fn layout(config: &SiteConfig, title: &str, content: Markup, options: PageOptions) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if !config.author.is_empty() {
                    meta name="author" content=(config.author);
                }
                title { (title) }
                link rel="icon" type="image/x-icon" href="/images/favicon.ico";
                link rel="mask-icon" type="image/png" href="/images/apple-touch-icon.png";
                link rel="stylesheet" href=(HIGHLIGHT_CSS);
                script src=(TAILWIND_JS) {}
                script src=(HIGHLIGHT_JS) {}
                script { (PreEscaped(HIGHLIGHT_INIT)) }
            }
            body class="bg-white text-gray-900" {
                div class=(CONTAINER) { (content) }
                @if options.live_reload {
                    (PreEscaped(LIVE_RELOAD_SCRIPT))
                }
            }
        }
    }
}

fn social_link(link: &SocialLink) -> Markup {
    html! {
        a href=(link.url) target="_blank" rel="noopener noreferrer"
            class="hover:text-gray-500 duration-200" {
            div class="flex items-center space-x-2" {
                uk-icon icon=(link.icon) {}
                p class="text-sm font-medium" { (link.text) }
            }
        }
    }
}

fn tag_button(tag: &str, selected: bool) -> Markup {
    let state = if selected {
        "bg-gray-800 text-white"
    } else {
        "bg-gray-200 hover:bg-gray-300 text-gray-700"
    };
    let href = if selected {
        "/".to_string()
    } else {
        tag_filter_url(tag)
    };
    html! {
        a href=(href)
            class={ "px-3 py-1 rounded-full text-sm transition-colors duration-200 mr-2 mb-2 " (state) } {
            (tag_label(tag))
        }
    }
}

fn post_card(post: &Post) -> Markup {
    html! {
        a href=(post_url(&post.slug)) {
            div class="border rounded-lg p-6 hover:shadow-lg transition-shadow duration-200 h-full" {
                div class="flex flex-col space-y-2 h-full" {
                    h3 class="text-lg font-bold" { (post.title) }
                    p class="text-sm text-gray-500" { (post.date) }
                    p class="text-sm text-gray-500" { (post.summary) }
                    div class="flex flex-wrap mt-2" {
                        @for tag in &post.tags {
                            p class="text-xs text-gray-500 bg-gray-50 px-1.5 rounded mr-1" { (tag_label(tag)) }
                        }
                    }
                }
            }
        }
    }
}

/// Home page: header, tag filter and post cards
pub fn index_page(
    config: &SiteConfig,
    posts: &[&Post],
    top_tags: &[String],
    selected: Option<&str>,
    options: PageOptions,
) -> Markup {
    let content = html! {
        div class="flex flex-col items-center space-y-4" {
            a href="/" { h1 class="text-4xl font-bold mt-8" { (config.title) } }
            @if !config.tagline.is_empty() {
                p class="text-lg text-gray-500" { (config.tagline) }
            }
            @if !config.social.is_empty() {
                div class="flex items-center space-x-6 mt-4" {
                    @for link in &config.social { (social_link(link)) }
                }
            }
            hr class="my-8 w-full";
        }
        div class="flex flex-col items-center space-y-4" {
            h3 class="text-2xl font-semibold" { "Latest Posts" }
            div class="flex flex-wrap items-center" {
                @for tag in top_tags {
                    (tag_button(tag, selected == Some(tag.as_str())))
                }
            }
            div class="grid grid-cols-1 gap-6 w-full" {
                @for post in posts { (post_card(post)) }
            }
        }
    };
    layout(config, &config.title, content, options)
}

/// A single post; `body_html` is the processor's output
pub fn post_page(config: &SiteConfig, post: &Post, body_html: &str, options: PageOptions) -> Markup {
    let content = html! {
        div class="flex flex-col w-full" {
            a href="/" class="hover:text-gray-600 mb-8" { (BACK_LINK) }
            h1 class="text-4xl font-bold" { (post.title) }
            p class="text-lg text-gray-500 mt-2" { (post.date) }
            hr class="my-8";
        }
        article class="prose max-w-none" { (PreEscaped(body_html)) }
    };
    let title = format!("{} - {}", post.title, config.title);
    layout(config, &title, content, options)
}

/// Page for an unknown slug
pub fn not_found_page(config: &SiteConfig, options: PageOptions) -> Markup {
    let content = html! {
        h1 class="text-4xl font-bold mt-8" { "404 - Aw, man!" }
        p class="text-lg text-gray-500" {
            "The post you're looking for doesn't exist but I bet it would have been a good one."
        }
        a href="/" class="text-black hover:text-gray-600 mt-4" { (BACK_LINK) }
    };
    layout(config, "404 - Aw, man!", content, options)
}

/// Page for a post that exists but cannot be loaded
pub fn load_error_page(
    config: &SiteConfig,
    slug: &str,
    message: &str,
    options: PageOptions,
) -> Markup {
    let content = html! {
        h1 class="text-4xl font-bold mt-8" { "This post is broken" }
        p class="text-lg text-gray-500" { "Could not load " code { (slug) } ": " (message) }
        a href="/" class="text-black hover:text-gray-600 mt-4" { (BACK_LINK) }
    };
    layout(config, "Broken post", content, options)
}
