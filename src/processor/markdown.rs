//! Markdown rendering for prose segments, and code block markup

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::links::LinkRewriter;
use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Produces `<pre><code class="language-…">` blocks.
///
/// By default the code is emitted verbatim and highlighting is left to
/// highlight.js in the browser. With `server_side` enabled the code is
/// highlighted by syntect into escaped, inline-styled spans.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    server_side: bool,
}

impl CodeHighlighter {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            server_side: config.server_side,
        }
    }

    pub fn server_side(&self) -> bool {
        self.server_side
    }

    /// Wrap `code` in a code block labelled `lang` (may be empty)
    pub fn code_block(&self, code: &str, lang: &str) -> String {
        let body = if self.server_side {
            self.highlight(code, lang).unwrap_or_else(|| html_escape(code))
        } else {
            code.to_string()
        };
        format!(r#"<pre><code class="language-{}">{}</code></pre>"#, lang, body)
    }

    /// Highlight a code block, `None` if syntect fails
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, self.theme()?);
        let mut output = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(regions) => regions,
                Err(e) => {
                    tracing::debug!("Highlighting {} failed: {}", lang, e);
                    return None;
                }
            };
            output.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
        }
        Some(output)
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

/// Markdown renderer for prose segments
pub struct MarkdownRenderer {
    highlighter: CodeHighlighter,
    links: LinkRewriter,
}

impl MarkdownRenderer {
    pub fn new(highlighter: CodeHighlighter, links: LinkRewriter) -> Self {
        Self { highlighter, links }
    }

    pub fn highlighter(&self) -> &CodeHighlighter {
        &self.highlighter
    }

    /// Render markdown to HTML, then rewrite outbound links
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, content) of the code block being collected
        let mut code_block: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) if self.highlighter.server_side() => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, content)) = code_block.as_mut() {
                        content.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    if let Some((lang, content)) = code_block.take() {
                        let highlighted = self.highlighter.code_block(&content, &lang);
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.links.rewrite(&html_output).into_owned()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(
            CodeHighlighter::new(&HighlightConfig::default()),
            LinkRewriter::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_side() -> CodeHighlighter {
        CodeHighlighter::new(&HighlightConfig {
            server_side: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::default();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_rewrites_links() {
        let renderer = MarkdownRenderer::default();
        let html = renderer.render("[out](https://example.com) and [in](/about)");
        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">out</a>"#
        ));
        assert!(html.contains(r#"<a href="/about">in</a>"#));
    }

    #[test]
    fn test_render_rewrites_raw_html_links() {
        let renderer = MarkdownRenderer::default();
        let html = renderer.render(r#"<a href="https://example.com">raw</a>"#);
        assert!(html.contains("noopener noreferrer"));
    }

    #[test]
    fn test_code_block_verbatim_by_default() {
        let highlighter = CodeHighlighter::new(&HighlightConfig::default());
        assert_eq!(
            highlighter.code_block("code here", "lang"),
            r#"<pre><code class="language-lang">code here</code></pre>"#
        );
        assert_eq!(
            highlighter.code_block("a < b", ""),
            r#"<pre><code class="language-">a < b</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_server_side_is_escaped() {
        let html = server_side().code_block("if a < b { x }\n", "rust");
        assert!(html.starts_with(r#"<pre><code class="language-rust">"#));
        assert!(html.contains("<span style="));
        assert!(html.contains("&lt;"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_prose_code_block_server_side() {
        let renderer = MarkdownRenderer::new(server_side(), LinkRewriter::default());
        let html = renderer.render("    let x = 1;\n");
        assert!(html.contains(r#"<pre><code class="language-">"#));
        assert!(html.contains("<span style="));
    }

    #[test]
    fn test_prose_code_block_default_is_escaped_by_markdown() {
        let renderer = MarkdownRenderer::default();
        let html = renderer.render("~~~html\n<b>x</b>\n~~~\n");
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }
}
