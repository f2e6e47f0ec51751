//! Emoji stripping for canned responses.
//!
//! Replies are delivered over plain-text channels, so pictographic
//! characters are removed before a response leaves the responder.

/// Remove emoji and pictograph characters from text.
///
/// Plain ASCII text passes through unchanged.
///
/// # Examples
///
/// ```
/// use kaisang::responder::emoji::remove_emojis;
///
/// assert_eq!(remove_emojis("\u{1F600}hello\u{1F600}"), "hello");
/// assert_eq!(remove_emojis("hello"), "hello");
/// ```
pub fn remove_emojis(text: &str) -> String {
    text.chars().filter(|&c| !is_emoji(c)).collect()
}

/// Whether a character falls in one of the stripped Unicode ranges.
fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}'   // emoticons
        | '\u{1F300}'..='\u{1F5FF}' // symbols & pictographs
        | '\u{1F680}'..='\u{1F6FF}' // transport & map symbols
        | '\u{1F1E0}'..='\u{1F1FF}' // regional indicators (flags)
        | '\u{2700}'..='\u{27BF}'   // dingbats
        | '\u{1F926}'..='\u{1F937}' // gestures
        | '\u{10000}'..='\u{10FFFF}' // supplementary planes
        | '\u{2640}'..='\u{2642}'   // gender symbols
        | '\u{2600}'..='\u{2B55}'   // miscellaneous symbols
        | '\u{200D}'                // zero width joiner
        | '\u{23CF}'                // eject
        | '\u{23E9}'                // fast forward
        | '\u{231A}'                // watch
        | '\u{FE0F}'                // variation selector
        | '\u{3030}'                // wavy dash
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_surrounding_emoji() {
        assert_eq!(remove_emojis("😀hello😀"), "hello");
    }

    #[test]
    fn test_ascii_is_untouched() {
        let text = "Hello, world! 123 ~@#$%";
        assert_eq!(remove_emojis(text), text);
    }

    #[test]
    fn test_strips_mixed_categories() {
        // pictograph, transport, flag pair, dingbat, ZWJ sequence
        assert_eq!(remove_emojis("a🌀b🚀c🇯🇵d✈️e👩‍🚀f"), "abcdef");
    }

    #[test]
    fn test_keeps_non_emoji_unicode() {
        assert_eq!(remove_emojis("café こんにちは"), "café こんにちは");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(remove_emojis(""), "");
    }
}
