pub mod agency;
pub mod block;
pub mod calendar;
pub mod metadata;
pub mod route;
pub mod shape;
pub mod stop;
pub mod stop_time;
pub mod trip;

/// `?, ?, ...` for an IN clause or a multi-row VALUES list. Values always
/// travel through bind parameters; only the placeholder text is generated.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Builds the FTS5 MATCH expression for a route search: the input is split
/// on whitespace, each token lowercased, embedded quotes doubled, and the
/// token wrapped as a quoted prefix (`"tok"*`); tokens are AND-joined.
/// Returns `None` for inputs with no tokens, which callers must treat as an
/// empty result rather than an error.
pub fn full_text_match_expression(input: &str) -> Option<String> {
    let tokens: Vec<String> = input
        .split_whitespace()
        .map(|token| token.to_lowercase().replace('"', "\"\""))
        .filter(|token| !token.is_empty())
        .map(|token| format!("\"{}\"*", token))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_expression_quotes_and_joins_tokens() {
        assert_eq!(
            full_text_match_expression("Market Street").as_deref(),
            Some("\"market\"* AND \"street\"*")
        );
    }

    #[test]
    fn match_expression_escapes_embedded_quotes() {
        assert_eq!(
            full_text_match_expression("4th\"st").as_deref(),
            Some("\"4th\"\"st\"*")
        );
    }

    #[test]
    fn match_expression_of_blank_input_is_none() {
        assert_eq!(full_text_match_expression(""), None);
        assert_eq!(full_text_match_expression("   \t"), None);
    }

    #[test]
    fn placeholders_render_comma_separated() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
