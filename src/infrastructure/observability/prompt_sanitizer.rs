const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PREFIXES: [&str; 5] = ["Bearer ", "api_key=", "password=", "secret=", "token="];

/// Sanitizes a transcription prompt for safe logging.
///
/// Whitespace runs (including newlines) collapse to single spaces, the text is
/// cut at a character boundary and credential-looking values are redacted.
pub fn sanitize_prompt(prompt: &str) -> String {
    let collapsed = prompt.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = collapsed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let cut: String = collapsed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", cut, total_chars)
    } else {
        collapsed
    };

    redact_sensitive_values(&visible)
}

fn redact_sensitive_values(text: &str) -> String {
    let mut result = text.to_string();
    for prefix in SENSITIVE_PREFIXES {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(prefix) {
            let value_start = search_from + found + prefix.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(value_start..value_end, "[REDACTED]");
            search_from = value_start + "[REDACTED]".len();
        }
    }
    result
}
