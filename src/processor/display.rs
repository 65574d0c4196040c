//! Listings shown for executed snippets
//!
//! The last meaningful line of a snippet usually hands its value to the
//! page (`_result = ...` or `set_output(...)`). That plumbing is hidden or
//! reduced to the bare expression before the listing is shown; the snippet
//! itself always runs unmodified.

/// Reserved name whose final value becomes the snippet's output
pub const RESULT_NAME: &str = "_result";

/// Output function available to snippets
pub const SET_OUTPUT: &str = "set_output";

/// What to do with the result-capture line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// Drop the line (and any blank lines after it)
    HideCapture,
    /// Keep only the captured expression
    ShowCall,
}

/// Right-hand side of an assignment to `_result` anywhere in `line`
/// (`_result = x`, `var _result = x`, `let _result = x;`)
fn result_assignment(line: &str) -> Option<&str> {
    line.match_indices(RESULT_NAME).find_map(|(pos, _)| {
        let before = line[..pos].chars().next_back();
        if before.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            return None;
        }
        let rhs = line[pos + RESULT_NAME.len()..]
            .trim_start()
            .strip_prefix('=')?;
        // `==`, `===` and `=>` are not assignments
        if rhs.starts_with(['=', '>']) {
            return None;
        }
        Some(rhs.trim().trim_end_matches(';').trim_end())
    })
}

/// The expression captured by a result line, if `line` is one
fn captured_expression(line: &str) -> Option<&str> {
    if let Some(expression) = result_assignment(line) {
        return Some(expression);
    }

    let args = line
        .trim()
        .strip_prefix(SET_OUTPUT)?
        .trim_start()
        .strip_prefix('(')?;
    let args = args.trim_end().trim_end_matches(';').trim_end();
    args.strip_suffix(')').map(str::trim)
}

/// Listing of `code` as the reader should see it
pub fn display_code(code: &str, mode: ListingMode) -> String {
    let lines: Vec<&str> = code.split('\n').collect();

    let Some(last) = lines.iter().rposition(|line| !line.trim().is_empty()) else {
        return code.to_string();
    };
    let Some(expression) = captured_expression(lines[last]) else {
        return code.to_string();
    };

    match mode {
        ListingMode::HideCapture => lines[..last].join("\n"),
        ListingMode::ShowCall => {
            let mut shown = lines;
            shown[last] = expression;
            shown.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_result_line() {
        assert_eq!(display_code("x = 1\n_result = x", ListingMode::HideCapture), "x = 1");
        assert_eq!(
            display_code("x = 1\n_result = x\n\n", ListingMode::HideCapture),
            "x = 1"
        );
    }

    #[test]
    fn test_show_call_keeps_expression() {
        assert_eq!(
            display_code("_result = greet(\"world\")", ListingMode::ShowCall),
            "greet(\"world\")"
        );
        assert_eq!(
            display_code("def f():\n    pass\n    _result = f()\n", ListingMode::ShowCall),
            "def f():\n    pass\nf()\n"
        );
    }

    #[test]
    fn test_set_output_line() {
        let code = "card = Card(\"hi\")\nset_output(Div(card));\n";
        assert_eq!(display_code(code, ListingMode::HideCapture), "card = Card(\"hi\")");
        assert_eq!(
            display_code(code, ListingMode::ShowCall),
            "card = Card(\"hi\")\nDiv(card)\n"
        );
    }

    #[test]
    fn test_no_result_line_shows_everything() {
        let code = "x = 1\nprint(x)\n";
        assert_eq!(display_code(code, ListingMode::HideCapture), code);
        assert_eq!(display_code(code, ListingMode::ShowCall), code);
    }

    #[test]
    fn test_declared_result_line() {
        assert_eq!(display_code("x = 1\nvar _result = x", ListingMode::HideCapture), "x = 1");
        assert_eq!(
            display_code("const items = [1];\nlet _result = Ul(items);\n", ListingMode::HideCapture),
            "const items = [1];"
        );
        assert_eq!(
            display_code("let _result = greet(\"world\");", ListingMode::ShowCall),
            "greet(\"world\")"
        );
    }

    #[test]
    fn test_similar_names_are_not_captures() {
        let code = "my_result = 3";
        assert_eq!(display_code(code, ListingMode::HideCapture), code);
        assert_eq!(display_code("f = _result => 1", ListingMode::HideCapture), "f = _result => 1");
    }

    #[test]
    fn test_comparison_is_not_a_capture() {
        let code = "_result == 3";
        assert_eq!(display_code(code, ListingMode::HideCapture), code);
    }

    #[test]
    fn test_only_last_meaningful_line_counts() {
        let code = "_result = 1\nx = 2";
        assert_eq!(display_code(code, ListingMode::HideCapture), code);
    }

    #[test]
    fn test_blank_code() {
        assert_eq!(display_code("", ListingMode::HideCapture), "");
        assert_eq!(display_code("\n  \n", ListingMode::ShowCall), "\n  \n");
    }
}
