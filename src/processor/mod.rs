//! Content processor: turns a raw post body into one HTML fragment
//!
//! The body is split on code fences. Prose goes through the markdown
//! renderer; each code segment is dispatched on its directive line:
//!
//! | Directive     | Listing                    | Runs | Output |
//! |---------------|----------------------------|------|--------|
//! | plain         | verbatim, language label   | no   | no     |
//! | `show:run`    | result line removed        | yes  | yes    |
//! | `show:run:call` | result line as bare call | yes  | yes    |
//! | `run`         | none                       | yes  | yes    |
//!
//! A failing snippet turns into an error block; the rest of the post still
//! renders.

pub mod display;
pub mod evaluator;
pub mod links;
pub mod markdown;
pub mod segment;

use std::sync::Arc;

pub use display::{display_code, ListingMode};
pub use evaluator::{Evaluator, ExecError};
pub use links::LinkRewriter;
pub use markdown::{CodeHighlighter, MarkdownRenderer};
pub use segment::{split_segments, CodeBlock, Directive, Markers, Segment};

use crate::config::SiteConfig;
use crate::helpers::html_escape;
use crate::Blog;

/// Vertical space after a listing
pub const SPACER: &str = r#"<div class="my-4"></div>"#;

/// Caption under live output
pub const LIVE_CAPTION: &str =
    r#"<div class="text-gray-400 text-sm mt-2 italic">↑ Live rendered output</div>"#;

/// Vertical space closing a live output section
pub const TRAILING_SPACER: &str = r#"<div class="mb-8"></div>"#;

/// Renders post bodies. Holds only immutable state, so one instance can
/// serve any number of requests.
pub struct ContentProcessor {
    markdown: MarkdownRenderer,
    markers: Markers,
    /// Label of live listings
    language: String,
    evaluator: Arc<dyn Evaluator>,
}

impl ContentProcessor {
    /// Create a processor using `evaluator` for live snippets
    pub fn new(config: &SiteConfig, evaluator: Arc<dyn Evaluator>) -> Self {
        let markdown = MarkdownRenderer::new(
            CodeHighlighter::new(&config.highlight),
            LinkRewriter::new(&config.external_link),
        );
        let language = evaluator
            .listing_language()
            .unwrap_or(&config.exec.language)
            .to_string();
        Self {
            markdown,
            markers: Markers::new(&config.exec.language),
            language,
            evaluator,
        }
    }

    /// Create a processor with the evaluator selected in the blog's config
    pub fn for_blog(blog: &Blog) -> Self {
        let evaluator = evaluator::from_config(&blog.config.exec, &blog.base_dir);
        Self::new(&blog.config, evaluator)
    }

    /// Render a raw post body to an HTML fragment
    pub fn render(&self, raw_body: &str) -> String {
        let mut html = String::with_capacity(raw_body.len() * 2);

        for segment in split_segments(raw_body, &self.markers) {
            match segment {
                Segment::Prose(text) => html.push_str(&self.markdown.render(text)),
                Segment::Code(block) => self.render_code(&block, &mut html),
            }
        }

        html
    }

    fn render_code(&self, block: &CodeBlock<'_>, out: &mut String) {
        tracing::debug!(
            "Code segment {:?} ({} bytes, executes: {})",
            block.directive,
            block.code.len(),
            block.directive.executes()
        );

        match block.directive {
            Directive::Plain { language } => {
                out.push_str(&self.markdown.highlighter().code_block(block.code, language));
                out.push_str(SPACER);
            }
            Directive::ShowRun => self.render_live(block.code, Some(ListingMode::HideCapture), out),
            Directive::ShowRunCall => self.render_live(block.code, Some(ListingMode::ShowCall), out),
            Directive::Run => self.render_live(block.code, None, out),
        }
    }

    /// Listing (if any), then the snippet's output with its caption.
    /// The snippet always runs unmodified.
    fn render_live(&self, code: &str, listing: Option<ListingMode>, out: &mut String) {
        if let Some(mode) = listing {
            let shown = display_code(code, mode);
            out.push_str(&self.markdown.highlighter().code_block(&shown, &self.language));
            out.push_str(SPACER);
        }

        match self.evaluator.evaluate(code) {
            Ok(output) => {
                out.push_str(output.as_deref().unwrap_or_default());
                out.push_str(LIVE_CAPTION);
                out.push_str(TRAILING_SPACER);
            }
            Err(e) => {
                tracing::warn!("Snippet failed ({} backend): {}", self.evaluator.name(), e);
                out.push_str(&error_block(&e));
            }
        }
    }
}

/// Visible replacement for the output of a failed snippet
fn error_block(error: &ExecError) -> String {
    format!(
        r#"<pre class="error">Error executing code: {}</pre>"#,
        html_escape(&error.to_string())
    )
}
