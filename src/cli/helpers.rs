//! Shared helper functions for CLI commands

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a dollar amount with thousands separators, e.g. `$12,500,000`
pub fn format_money(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Split a shell line into words
///
/// Whitespace separates words; single or double quotes group them and a
/// backslash escapes the next character. Returns `None` on an unclosed quote.
pub fn split_line(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Flügelholm-Baugruppe", 8), "Flüge...");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12_500_000.0), "$12,500,000");
        assert_eq!(format_money(85_000.0), "$85,000");
        assert_eq!(format_money(999.0), "$999");
        assert_eq!(format_money(0.0), "$0");
    }

    #[test]
    fn test_split_line_plain_and_quoted() {
        assert_eq!(
            split_line("part list --search wing").unwrap(),
            vec!["part", "list", "--search", "wing"]
        );
        assert_eq!(
            split_line(r#"aircraft new model="Boeing 787" 'serial_number=AC 9'"#).unwrap(),
            vec!["aircraft", "new", "model=Boeing 787", "serial_number=AC 9"]
        );
        assert_eq!(split_line(r#"notes=\"x\""#).unwrap(), vec![r#"notes="x""#]);
        assert_eq!(split_line(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_line_edge_cases() {
        assert_eq!(split_line("   ").unwrap(), Vec::<String>::new());
        assert!(split_line("login \"admin").is_none());
    }
}
