//! Label Wrapping
//!
//! Pure word-wrap over a caller-supplied measurement function, so the same
//! helper serves both live rendering (egui font metrics) and offscreen
//! export (fontdue metrics).

/// Wrap `text` into lines no wider than `max_width` pixels.
///
/// Greedy by words; a single word wider than `max_width` is hard-broken by
/// character so no line ever exceeds the limit. Always returns at least one
/// line.
pub fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word) <= max_width {
            current = word.to_string();
        } else {
            // Oversized word: break by character
            for ch in word.chars() {
                let mut attempt = current.clone();
                attempt.push(ch);
                if !current.is_empty() && measure(&attempt) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = attempt;
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_width(s: &str) -> f32 {
        s.chars().count() as f32 * 7.0
    }

    #[test]
    fn short_label_stays_on_one_line() {
        let lines = wrap_lines("Hello", 100.0, char_width);
        assert_eq!(lines, vec!["Hello".to_string()]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // 10 chars fit per line at width 70
        let lines = wrap_lines("one two three four", 70.0, char_width);
        assert_eq!(lines, vec!["one two".to_string(), "three four".to_string()]);
        for line in &lines {
            assert!(char_width(line) <= 70.0);
        }
    }

    #[test]
    fn oversized_word_is_hard_broken() {
        let lines = wrap_lines("abcdefghijklmnop", 35.0, char_width);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(char_width(line) <= 35.0, "line too wide: {line}");
        }
        assert_eq!(lines.concat(), "abcdefghijklmnop");
    }

    #[test]
    fn empty_label_yields_single_empty_line() {
        let lines = wrap_lines("", 100.0, char_width);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        let lines = wrap_lines("a   b\t c", 1000.0, char_width);
        assert_eq!(lines, vec!["a b c".to_string()]);
    }
}
