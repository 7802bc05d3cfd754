//! Content panels: the staff pool on the left, the board grid on the right.

pub mod board;
pub mod pool;

/// Truncate to `max_len` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let cleaned = s.replace('\t', " ");
    let cleaned = cleaned.trim();
    if cleaned.chars().count() <= max_len {
        cleaned.to_string()
    } else {
        let kept: String = cleaned.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Alice", 10), "Alice");
        assert_eq!(truncate("Alexandria", 6), "Alexa…");
        assert_eq!(truncate("\tBen ", 3), "Ben");
        assert_eq!(truncate("Zoë Åberg", 4), "Zoë…");
    }
}
