// src/core/segmenter.rs
use crate::core::types::{Case, ESCAPE_MARKER};

/// Letters that may appear inside a word token.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

/// Apostrophes and hyphens stay inside a word when a letter follows them,
/// so `it's` and `studding-sail` reach the dictionary whole.
fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '’' | '-')
}

/// Splits the next token off the front of `remaining`.
///
/// A token starting with anything other than a letter or the escape marker
/// is exactly that one symbol. Otherwise the token runs over letters,
/// escape markers and in-word joiners, then over any symbols trailing the
/// word, and stops before the next whitespace or letter. Trailing
/// punctuation thus measures and wraps together with its word. Word tokens
/// come back in `case`.
///
/// Whitespace is the caller's to consume: a `remaining` that starts with
/// whitespace yields an empty token and is returned unchanged.
pub fn next_token(remaining: &str, case: Case) -> (String, &str) {
    let mut chars = remaining.char_indices().peekable();
    let first = match chars.next() {
        Some((_, c)) if c.is_whitespace() => return (String::new(), remaining),
        Some((_, c)) => c,
        None => return (String::new(), remaining),
    };

    if !is_letter(first) && first != ESCAPE_MARKER {
        let end = first.len_utf8();
        return (first.to_string(), &remaining[end..]);
    }

    let mut end = remaining.len();
    let mut in_suffix = false;
    while let Some((i, c)) = chars.next() {
        let in_word = is_letter(c) || c == ESCAPE_MARKER;
        if c.is_whitespace() || (in_suffix && in_word) {
            end = i;
            break;
        }
        if in_word {
            continue;
        }
        let letter_follows = matches!(chars.peek(), Some(&(_, next)) if is_letter(next));
        if !in_suffix && is_joiner(c) && letter_follows {
            continue;
        }
        in_suffix = true;
    }

    let word = remaining[..end].replace('’', "'");
    (case.apply(&word), &remaining[end..])
}

/// Removes `%X` disambiguation suffixes from literal text.
pub fn strip_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE_MARKER {
            if matches!(chars.peek(), Some(next) if next.is_ascii_alphabetic()) {
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(mut s: &str, case: Case) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            s = s.trim_start();
            if s.is_empty() {
                return out;
            }
            let (token, rest) = next_token(s, case);
            out.push(token);
            s = rest;
        }
    }

    #[test]
    fn trailing_punctuation_stays_with_its_word() {
        assert_eq!(next_token("cat.", Case::Upper), ("CAT.".to_string(), ""));
        assert_eq!(next_token("cat.\" and", Case::Upper), ("CAT.\"".to_string(), " and"));
        assert_eq!(next_token(". cat", Case::Upper), (".".to_string(), " cat"));
        assert_eq!(
            tokens("Twinkle, twinkle, little star", Case::Upper),
            vec!["TWINKLE,", "TWINKLE,", "LITTLE", "STAR"]
        );
    }

    #[test]
    fn a_letter_after_punctuation_starts_a_new_word() {
        assert_eq!(tokens("cat,dog", Case::Upper), vec!["CAT,", "DOG"]);
        assert_eq!(tokens("end.(Aside)", Case::Lower), vec!["end.(", "aside)"]);
    }

    #[test]
    fn keeps_in_word_joiners() {
        assert_eq!(tokens("it's here", Case::Upper), vec!["IT'S", "HERE"]);
        assert_eq!(tokens("it’s", Case::Upper), vec!["IT'S"]);
        assert_eq!(tokens("studding-sail", Case::Upper), vec!["STUDDING-SAIL"]);
        assert_eq!(tokens("stars' - light", Case::Lower), vec!["stars'", "-", "light"]);
        assert_eq!(tokens("go--now", Case::Lower), vec!["go--", "now"]);
    }

    #[test]
    fn escape_marker_stays_in_the_token() {
        assert_eq!(next_token("lead%e the", Case::Upper), ("LEAD%E".to_string(), " the"));
        assert_eq!(next_token("%e", Case::Upper), ("%E".to_string(), ""));
    }

    #[test]
    fn whitespace_is_left_to_the_caller() {
        assert_eq!(next_token(" cat", Case::Upper), (String::new(), " cat"));
        assert_eq!(next_token("", Case::Upper), (String::new(), ""));
        assert_eq!(next_token("cat\nhat", Case::Lower), ("cat".to_string(), "\nhat"));
    }

    #[test]
    fn non_ascii_symbols_are_single_tokens() {
        assert_eq!(next_token("…and", Case::Upper), ("…".to_string(), "and"));
        assert_eq!(next_token("café!", Case::Upper), ("CAFÉ!".to_string(), ""));
    }

    #[test]
    fn strips_disambiguation_suffixes() {
        assert_eq!(strip_escapes("I read%i the lead%e pipe"), "I read the lead pipe");
        assert_eq!(strip_escapes("100% sure"), "100% sure");
    }
}
