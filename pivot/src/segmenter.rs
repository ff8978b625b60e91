//! Sentence segmentation

/// Sentence delimiters; a run of them counts as one boundary
const DELIMITERS: [char; 7] = ['。', '．', '！', '？', '!', '?', '\n'];

pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Split `text` into trimmed candidate sentences of at least `min_chars`
/// characters, in source order.
///
/// With `split` disabled the whole trimmed text is the only candidate; the
/// length floor still applies.
pub fn split_sentences(text: &str, split: bool, min_chars: usize) -> Vec<String> {
    let keep = |s: &str| !s.is_empty() && s.chars().count() >= min_chars;

    if !split {
        let whole = text.trim();
        return if keep(whole) {
            vec![whole.to_string()]
        } else {
            Vec::new()
        };
    }

    text.split(is_delimiter)
        .map(str::trim)
        .filter(|s| keep(*s))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_on_mixed_delimiters() {
        let text = "毎回Excelの入力作業で困っている。自動化できたらとても助かる！！\n来年は担当者が変わるかもしれない?";
        assert_eq!(
            split_sentences(text, true, 5),
            vec![
                "毎回Excelの入力作業で困っている",
                "自動化できたらとても助かる",
                "来年は担当者が変わるかもしれない",
            ]
        );
    }

    #[test]
    fn test_short_fragments_dropped() {
        let text = "はい。そうですね。毎日システムが止まって本当に大変だ。";
        assert_eq!(
            split_sentences(text, true, 10),
            vec!["毎日システムが止まって本当に大変だ"]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 10 characters, 30 bytes
        let sentence = "あいうえおかきくけこ";
        assert_eq!(split_sentences(sentence, true, 10), vec![sentence]);
        assert!(split_sentences("あいうえおかきくけ", true, 10).is_empty());
    }

    #[test]
    fn test_unsplit_keeps_whole_text() {
        let text = "  一つ目の文です。二つ目の文です。  ";
        assert_eq!(
            split_sentences(text, false, 10),
            vec!["一つ目の文です。二つ目の文です。"]
        );
        assert!(split_sentences("短い", false, 10).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("", true, 10).is_empty());
        assert!(split_sentences("。。\n！", true, 1).is_empty());
    }
}
