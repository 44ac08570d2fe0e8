//! Name handling for EPG lookups and placeholder artwork

use regex::Regex;
use std::sync::LazyLock;

static NON_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.]").expect("valid id regex"));
static CET_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}/\d{2}/\d{2}\s*-\s*\d{2}:\d{2}\s*\(CET\)").expect("valid timestamp regex")
});
static LEADING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(?:\s+|$)").expect("valid year regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const MAX_IMAGE_NAME_CHARS: usize = 30;
const TRUNCATED_NAME_CHARS: usize = 27;
const ELLIPSIS: &str = "...";
const NO_NAME: &str = "No Name";

/// Normalize an EPG linkage id: lower-case, keep word characters and dots, trim
pub fn normalize_id(id: &str) -> String {
    NON_ID_CHARS
        .replace_all(&id.to_lowercase(), "")
        .trim()
        .to_string()
}

/// Reduce a channel name to the short text drawn on a placeholder image.
///
/// A name that already has the shape of a truncation result (clean text of at
/// most 27 characters followed by `...`) is returned unchanged, so running the
/// function on its own output is stable. A clean source name that happens to
/// end in `...` keeps its dots for the same reason.
pub fn clean_name_for_image(name: &str) -> String {
    let trimmed = name.trim_end();
    if let Some(body) = trimmed.strip_suffix(ELLIPSIS)
        && !body.is_empty()
        && body.chars().count() <= TRUNCATED_NAME_CHARS
        && clean_body(body) == body
    {
        return trimmed.to_string();
    }

    let cleaned = clean_body(name);
    if cleaned.is_empty() {
        return NO_NAME.to_string();
    }
    if cleaned.chars().count() > MAX_IMAGE_NAME_CHARS {
        return format!("{}{}", whole_word_prefix(&cleaned, TRUNCATED_NAME_CHARS), ELLIPSIS);
    }
    cleaned
}

/// Timestamp, leading year, punctuation and trailing " - " sections removed
fn clean_body(name: &str) -> String {
    let without_timestamp = CET_TIMESTAMP.replace_all(name, "");
    let filtered: String = without_timestamp
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let collapsed = WHITESPACE.replace_all(&filtered, " ");
    let without_year = LEADING_YEAR.replace(collapsed.trim_start(), "");
    without_year
        .split(" - ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Longest prefix made of whole words within `limit` characters
fn whole_word_prefix(text: &str, limit: usize) -> String {
    let mut prefix = String::new();
    for word in text.split(' ') {
        let candidate_len = if prefix.is_empty() {
            word.chars().count()
        } else {
            prefix.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > limit {
            break;
        }
        if !prefix.is_empty() {
            prefix.push(' ');
        }
        prefix.push_str(word);
    }

    if prefix.is_empty() {
        // A single word longer than the limit gets cut mid-word
        text.chars().take(limit).collect()
    } else {
        prefix
    }
}

/// Deterministic placeholder image URL for a channel name
pub fn placeholder_image(base: &str, size: &str, name: &str) -> String {
    format!(
        "{}/{}/590b8a/ffffff.jpg&text={}",
        base.trim_end_matches('/'),
        size,
        urlencoding::encode(&clean_name_for_image(name))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024 Serie A - 12/05/24 - 20:45 (CET)", "Serie A")]
    #[case("Rai 1 HD", "Rai 1 HD")]
    #[case("Sky Sport *Uno* (backup)", "Sky Sport Uno backup")]
    #[case("Canale   5", "Canale 5")]
    #[case("Premier League - Arsenal vs Chelsea", "Premier League")]
    #[case("", "No Name")]
    #[case("!!!", "No Name")]
    #[case("2024", "No Name")]
    #[case(
        "Campionato Italiano di Calcio Serie A Femminile",
        "Campionato Italiano di..."
    )]
    #[case("Supercalifragilisticexpialidocious-Channel", "Supercalifragilisticexpiali...")]
    fn test_clean_name_for_image(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_name_for_image(input), expected);
    }

    #[rstest]
    #[case("2024 Serie A - 12/05/24 - 20:45 (CET)")]
    #[case("Campionato Italiano di Calcio Serie A Femminile")]
    #[case("(2024) Film")]
    #[case("Sky Sport *Uno*")]
    fn test_clean_name_for_image_is_idempotent(#[case] input: &str) {
        let once = clean_name_for_image(input);
        assert_eq!(clean_name_for_image(&once), once);
    }

    #[rstest]
    #[case("2024 1999 Film", "1999 Film")]
    #[case("Sky Sport!...", "Sky Sport")]
    #[case("Stay tuned...", "Stay tuned...")]
    #[case("...", "No Name")]
    fn test_year_and_ellipsis_handling(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_name_for_image(input), expected);
    }

    #[test]
    fn test_truncated_name_fits_limit() {
        let cleaned = clean_name_for_image("Campionato Italiano di Calcio Serie A Femminile");
        assert!(cleaned.chars().count() <= MAX_IMAGE_NAME_CHARS);
    }

    #[rstest]
    #[case("Rai1.it", "rai1.it")]
    #[case(" Sky Sport (HD) ", "skysporthd")]
    #[case("Canale-5.it", "canale5.it")]
    #[case("RAI_1", "rai_1")]
    fn test_normalize_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_id(input), expected);
    }

    #[test]
    fn test_placeholder_image_encodes_clean_name() {
        let url = placeholder_image("https://dummyimage.com/", "500x500", "2024 Serie A");
        assert_eq!(
            url,
            "https://dummyimage.com/500x500/590b8a/ffffff.jpg&text=Serie%20A"
        );
    }
}
