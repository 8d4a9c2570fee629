/// Removes a surrounding markdown code fence (```json ... ```), if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Removes a leading list marker such as `1.`, `2)`, `-` or `*`.
pub fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(['.', ')', ':']) {
            return rest.trim_start();
        }
    }
    line
}

/// Text after the first of `starts` found, cut at the earliest of `ends`.
/// Returns `None` when no start marker occurs.
pub fn section<'a>(text: &'a str, starts: &[&str], ends: &[&str]) -> Option<&'a str> {
    let after = starts.iter().find_map(|marker| {
        text.find(marker).map(|pos| &text[pos + marker.len()..])
    })?;
    let cut = ends
        .iter()
        .filter_map(|marker| after.find(marker))
        .min()
        .unwrap_or(after.len());
    Some(after[..cut].trim())
}

/// Non-empty lines with list markers removed.
pub fn list_items(block: &str) -> Vec<String> {
    block
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a comma or newline separated list, dropping empty entries.
pub fn split_list(block: &str) -> Vec<String> {
    block
        .split([',', '\n'])
        .map(strip_list_marker)
        .map(|item| item.trim_matches(['"', '[', ']']).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trims whitespace and one layer of surrounding double quotes.
pub fn strip_quotes(value: &str) -> String {
    value.trim().trim_matches('"').trim().to_string()
}
