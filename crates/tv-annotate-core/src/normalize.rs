//! Title canonicalization used as the join key between broadcast titles and
//! catalog titles.

use chrono::Datelike;

/// Oldest year a film can plausibly carry.
pub const MIN_FILM_YEAR: u16 = 1888;

/// Project a raw title onto its normalized matching key.
///
/// Letters and digits are lowercased per codepoint (Cyrillic and Latin alike,
/// no transliteration); every other codepoint becomes a space; space runs
/// collapse; the result carries no leading or trailing space. Total and
/// idempotent.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            out.extend(ch.to_lowercase());
            pending_space = false;
        } else {
            pending_space = true;
        }
    }
    out
}

/// First standalone 4-digit token in `text` that is a plausible release year.
///
/// Tokens outside `[MIN_FILM_YEAR, current_year + 1]` are skipped, not
/// treated as terminal. Digit runs longer or shorter than 4 never count,
/// nor do runs glued to letters on either side.
pub fn extract_year(text: &str) -> Option<u16> {
    year_in_text(text, max_plausible_year())
}

fn max_plausible_year() -> u16 {
    (chrono::Utc::now().year() + 1) as u16
}

fn year_in_text(text: &str, max_year: u16) -> Option<u16> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let bounded_left = start == 0 || !chars[start - 1].is_alphanumeric();
        let bounded_right = i == chars.len() || !chars[i].is_alphanumeric();
        if i - start == 4 && bounded_left && bounded_right {
            let value = chars[start..i]
                .iter()
                .fold(0u32, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0));
            if (MIN_FILM_YEAR as u32..=max_year as u32).contains(&value) {
                return Some(value as u16);
            }
        }
    }
    None
}

/// Strips trailing season/episode markers from series titles.
///
/// Schedule rows routinely append suffixes like "Сезон 3, Епизод 5"; the
/// stripped base title is what gets matched against the film catalog. The
/// marker set comes from configuration so new languages are a data change.
pub struct SuffixStripper {
    markers: Vec<Vec<char>>,
}

impl SuffixStripper {
    pub fn new(markers: &[String]) -> Self {
        Self {
            markers: markers
                .iter()
                .map(|m| m.chars().flat_map(|c| c.to_lowercase()).collect())
                .filter(|m: &Vec<char>| !m.is_empty())
                .collect(),
        }
    }

    /// Remove a trailing `<marker> <number>…` tail, along with any run of
    /// commas/spaces directly before it. Markers match case-insensitively at
    /// a word boundary and must be followed by a digit (optionally after
    /// whitespace). Titles without such a tail come back trimmed, unchanged.
    pub fn strip<'a>(&self, title: &'a str) -> &'a str {
        let chars: Vec<(usize, char)> = title.char_indices().collect();
        for pos in 0..chars.len() {
            if pos > 0 && chars[pos - 1].1.is_alphanumeric() {
                continue;
            }
            for marker in &self.markers {
                if let Some(after) = self.marker_matches(&chars, pos, marker) {
                    if self.digits_follow(&chars, after) {
                        let cut = self.cut_point(&chars, pos);
                        return title[..cut].trim();
                    }
                }
            }
        }
        title.trim()
    }

    /// Case-folded comparison of `marker` against the title at `pos`;
    /// returns the char position just past the marker on a match.
    fn marker_matches(&self, chars: &[(usize, char)], pos: usize, marker: &[char]) -> Option<usize> {
        let mut i = pos;
        let mut m = marker.iter();
        let mut expected = m.next();
        while let Some(&want) = expected {
            let (_, have) = *chars.get(i)?;
            let mut folded = have.to_lowercase();
            // Multi-char lowercase expansions never occur in marker text
            if folded.next() != Some(want) || folded.next().is_some() {
                return None;
            }
            i += 1;
            expected = m.next();
        }
        Some(i)
    }

    fn digits_follow(&self, chars: &[(usize, char)], mut pos: usize) -> bool {
        while let Some(&(_, ch)) = chars.get(pos) {
            if ch.is_whitespace() {
                pos += 1;
            } else {
                return ch.is_ascii_digit();
            }
        }
        false
    }

    /// Walk back over the `[, ]*` run preceding the marker.
    fn cut_point(&self, chars: &[(usize, char)], marker_pos: usize) -> usize {
        let mut pos = marker_pos;
        while pos > 0 {
            let ch = chars[pos - 1].1;
            if ch == ',' || ch == ' ' {
                pos -= 1;
            } else {
                break;
            }
        }
        chars.get(pos).map(|&(b, _)| b).unwrap_or(0)
    }
}
