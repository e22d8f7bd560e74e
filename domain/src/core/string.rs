//! Text helpers shared by the prompt formatters.

const ELLIPSIS: &str = "...";

/// Clip `text` so the result, marker included, fits in `max_bytes`.
///
/// The cut always lands on a `char` boundary. Text that already fits is
/// returned unchanged.
pub fn clip_to_bytes(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }

    let budget = max_bytes.saturating_sub(ELLIPSIS.len());
    let end = text
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= budget)
        .last()
        .unwrap_or(0);

    let mut clipped = String::with_capacity(end + ELLIPSIS.len());
    clipped.push_str(&text[..end]);
    clipped.push_str(ELLIPSIS);
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(clip_to_bytes("GATTACA", 7), "GATTACA");
        assert_eq!(clip_to_bytes("", 0), "");
    }

    #[test]
    fn test_long_answer_gets_marker() {
        let clipped = clip_to_bytes("BRCA1 is a tumor suppressor", 11);
        assert_eq!(clipped, "BRCA1 is...");
        assert_eq!(clipped.len(), 11);
    }

    #[test]
    fn test_cut_backs_off_to_char_boundary() {
        // "µ" is two bytes; a 4-byte budget would split the second one
        assert_eq!(clip_to_bytes("5µµµL of buffer", 7), "5µ...");
        assert_eq!(clip_to_bytes("µµ", 3), "...");
    }
}
