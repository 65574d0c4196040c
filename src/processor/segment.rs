//! Splitting a post body into prose and fenced code segments

/// Fence marker delimiting code segments
pub const FENCE: &str = "```";

/// One contiguous unit of a post body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Markdown text between fences
    Prose(&'a str),
    /// Text between an opening and a closing fence
    Code(CodeBlock<'a>),
}

/// How a code segment is displayed and whether it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Regular listing; the first line is the language label (may be empty)
    Plain { language: &'a str },
    /// Show the listing without its result-capture line, run it, show the output
    ShowRun,
    /// Like `ShowRun`, but the result-capture line stays visible as a bare call
    ShowRunCall,
    /// Run without showing the listing
    Run,
}

impl Directive<'_> {
    /// Whether the segment is executed
    pub fn executes(&self) -> bool {
        !matches!(self, Directive::Plain { .. })
    }
}

/// A fenced code segment with its directive line removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub directive: Directive<'a>,
    /// Everything after the first line
    pub code: &'a str,
}

/// Directive markers for one scripting language, e.g. `python:show:run`
#[derive(Debug, Clone)]
pub struct Markers {
    show_run_call: String,
    show_run: String,
    run: String,
}

impl Markers {
    pub fn new(language: &str) -> Self {
        Self {
            show_run_call: format!("{language}:show:run:call"),
            show_run: format!("{language}:show:run"),
            run: format!("{language}:run"),
        }
    }

    /// Pick the directive selected by the first line of a code segment
    pub fn classify<'a>(&self, first_line: &'a str) -> Directive<'a> {
        if first_line.starts_with(&self.show_run_call) {
            Directive::ShowRunCall
        } else if first_line.starts_with(&self.show_run) {
            Directive::ShowRun
        } else if first_line.trim_end() == self.run {
            Directive::Run
        } else {
            Directive::Plain {
                language: first_line.trim(),
            }
        }
    }

    /// Parse the text between two fences
    pub fn code_block<'a>(&self, text: &'a str) -> CodeBlock<'a> {
        let (first_line, code) = text.split_once('\n').unwrap_or((text, ""));
        CodeBlock {
            directive: self.classify(first_line),
            code,
        }
    }
}

/// Split a post body on fence markers.
///
/// Segments alternate prose, code, prose, ... and always start and end with
/// prose, possibly empty. With an odd number of fences the last fence has no
/// partner: it and everything after it stay in the final prose segment, so
/// the unterminated region is never executed.
pub fn split_segments<'a>(body: &'a str, markers: &Markers) -> Vec<Segment<'a>> {
    let fences: Vec<usize> = body.match_indices(FENCE).map(|(pos, _)| pos).collect();
    let paired = fences.len() - fences.len() % 2;
    if paired < fences.len() {
        tracing::warn!(
            "Unterminated code fence at byte {}, rendering the rest as prose",
            fences[paired]
        );
    }

    let mut segments = Vec::with_capacity(paired + 1);
    let mut start = 0;
    for (i, &pos) in fences[..paired].iter().enumerate() {
        let text = &body[start..pos];
        if i % 2 == 0 {
            segments.push(Segment::Prose(text));
        } else {
            segments.push(Segment::Code(markers.code_block(text)));
        }
        start = pos + FENCE.len();
    }
    segments.push(Segment::Prose(&body[start..]));

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::new("python")
    }

    #[test]
    fn test_classify_directives() {
        let m = markers();
        assert_eq!(m.classify("python:show:run:call"), Directive::ShowRunCall);
        assert_eq!(m.classify("python:show:run"), Directive::ShowRun);
        assert_eq!(m.classify("python:show:run extra"), Directive::ShowRun);
        assert_eq!(m.classify("python:run"), Directive::Run);
        assert_eq!(m.classify("python:run\r"), Directive::Run);
        assert_eq!(
            m.classify("python:run:later"),
            Directive::Plain {
                language: "python:run:later"
            }
        );
        assert_eq!(m.classify("rust"), Directive::Plain { language: "rust" });
        assert_eq!(m.classify(""), Directive::Plain { language: "" });
    }

    #[test]
    fn test_markers_follow_language() {
        let m = Markers::new("js");
        assert_eq!(m.classify("js:run"), Directive::Run);
        assert_eq!(
            m.classify("python:run"),
            Directive::Plain {
                language: "python:run"
            }
        );
    }

    #[test]
    fn test_code_block_strips_first_line() {
        let block = markers().code_block("lang\ncode here");
        assert_eq!(block.directive, Directive::Plain { language: "lang" });
        assert_eq!(block.code, "code here");

        let block = markers().code_block("python:show:run\nx = 1\n_result = x\n");
        assert_eq!(block.directive, Directive::ShowRun);
        assert_eq!(block.code, "x = 1\n_result = x\n");

        let block = markers().code_block("inline");
        assert_eq!(block.code, "");
    }

    #[test]
    fn test_split_alternates_prose_first() {
        let body = "intro\n```rust\nfn main() {}\n```\nmiddle\n```python:run\n_result = 1\n```\nend";
        let segments = split_segments(body, &markers());
        assert_eq!(segments.len(), 5);
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Prose(_) => assert_eq!(i % 2, 0),
                Segment::Code(_) => assert_eq!(i % 2, 1),
            }
        }
        assert_eq!(segments[0], Segment::Prose("intro\n"));
        assert_eq!(segments[4], Segment::Prose("\nend"));
    }

    #[test]
    fn test_split_counts_for_even_fences() {
        let m = markers();
        for n in 0..5 {
            let body = "p\n```x\ny\n```\n".repeat(n);
            let segments = split_segments(&body, &m);
            let code = segments
                .iter()
                .filter(|s| matches!(s, Segment::Code(_)))
                .count();
            assert_eq!(code, n);
            assert_eq!(segments.len() - code, n + 1);
        }
    }

    #[test]
    fn test_split_empty_prose_at_edges() {
        let segments = split_segments("```python:run\n_result = 1\n```", &markers());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Prose(""));
        assert_eq!(segments[2], Segment::Prose(""));
    }

    #[test]
    fn test_unterminated_fence_stays_prose() {
        let body = "before\n```python:run\n_result = 1\n```\nafter\n```python:run\nboom()";
        let segments = split_segments(body, &markers());
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[2],
            Segment::Prose("\nafter\n```python:run\nboom()")
        );
    }
}
