//! Outbound link rewriting for rendered prose

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::config::ExternalLinkConfig;

lazy_static! {
    /// Opening `<a>` tag with its attribute list
    static ref ANCHOR_RE: Regex = Regex::new(r"(?is)<a(\s[^>]*)?>").unwrap();
    /// One attribute: name and optional value, double-quoted, single-quoted
    /// or bare. Quoted values are consumed whole, so text inside them is
    /// never taken for another attribute.
    static ref ATTR_RE: Regex =
        Regex::new(r#"(?s)\s+([^\s=>/"']+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s>"']+))?"#).unwrap();
}

/// Attributes added to outbound anchors
const OUTBOUND_ATTRS: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// An attribute of an opening tag
struct Attr<'h> {
    name: &'h str,
    value: Option<&'h str>,
    /// Source text including leading whitespace
    text: &'h str,
}

/// Parse an attribute list. Also reports whether the tag is self-closing.
fn parse_attrs(attrs: &str) -> (Vec<Attr<'_>>, bool) {
    let mut parsed = Vec::new();
    let mut end = 0;

    for caps in ATTR_RE.captures_iter(attrs) {
        let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = caps.get(2).map(|m| {
            let v = m.as_str();
            v.strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| v.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(v)
        });
        parsed.push(Attr {
            name: name.as_str(),
            value,
            text: all.as_str(),
        });
        end = all.end();
    }

    let self_closing = attrs[end..].trim() == "/";
    (parsed, self_closing)
}

fn is_target_or_rel(name: &str) -> bool {
    name.eq_ignore_ascii_case("target") || name.eq_ignore_ascii_case("rel")
}

/// Makes links leaving the site open in a new browsing context without
/// access to `window.opener`
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    enable: bool,
    exclude: Vec<String>,
}

impl LinkRewriter {
    pub fn new(config: &ExternalLinkConfig) -> Self {
        Self {
            enable: config.enable,
            exclude: config.exclude.clone(),
        }
    }

    /// Whether `href` points into the site (or is excluded from rewriting)
    fn is_internal(&self, href: &str) -> bool {
        let same_site = href.starts_with('/') && !href.starts_with("//");
        same_site || self.exclude.iter().any(|prefix| href.starts_with(prefix.as_str()))
    }

    /// Rewrite every outbound anchor in `html`. Same-site anchors are left
    /// byte-for-byte untouched.
    pub fn rewrite<'h>(&self, html: &'h str) -> Cow<'h, str> {
        if !self.enable {
            return Cow::Borrowed(html);
        }

        ANCHOR_RE.replace_all(html, |caps: &Captures| {
            let (attrs, self_closing) = parse_attrs(caps.get(1).map_or("", |m| m.as_str()));
            let href = attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case("href"))
                .and_then(|a| a.value)
                .unwrap_or("");

            if self.is_internal(href) {
                return caps[0].to_string();
            }

            let kept: String = attrs
                .iter()
                .filter(|a| !is_target_or_rel(a.name))
                .map(|a| a.text)
                .collect();
            let close = if self_closing { " />" } else { ">" };
            format!("<a{}{}{}", kept, OUTBOUND_ATTRS, close)
        })
    }
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::new(&ExternalLinkConfig::default())
    }
}
