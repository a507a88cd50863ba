//! Speech text preparation
//!
//! Synthesis engines read emoji code points aloud by their Unicode names,
//! which is noise for a listener. Item text is run through an explicit
//! denylist of pictograph block ranges before every utterance.

/// Unicode block ranges stripped before synthesis (inclusive)
pub const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // Emoticons
    (0x1F300, 0x1F5FF), // Misc symbols and pictographs
    (0x1F680, 0x1F6FF), // Transport and map symbols
    (0x1F1E0, 0x1F1FF), // Regional indicators (flags)
    (0x2600, 0x26FF),   // Misc symbols
    (0x2700, 0x27BF),   // Dingbats
];

/// Is this character in a denied emoji block?
pub fn is_emoji(ch: char) -> bool {
    let code = ch as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Remove emoji/pictograph code points from text before synthesis
pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|&ch| !is_emoji(ch)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emoticons() {
        assert_eq!(strip_emoji("Great job \u{1F600}!"), "Great job !");
        assert_eq!(strip_emoji("\u{1F680} launch"), " launch");
    }

    #[test]
    fn test_strips_flags_and_dingbats() {
        assert_eq!(strip_emoji("done \u{2705}"), "done ");
        assert_eq!(strip_emoji("\u{1F1FA}\u{1F1F8} news"), " news");
    }

    #[test]
    fn test_preserves_ordinary_text() {
        let text = "café naïve 世界 100%";
        assert_eq!(strip_emoji(text), text);
    }

    #[test]
    fn test_range_boundaries() {
        assert!(is_emoji('\u{2600}'));
        assert!(is_emoji('\u{26FF}'));
        assert!(!is_emoji('\u{25FF}'));
        assert!(!is_emoji('\u{27C0}'));
    }
}
