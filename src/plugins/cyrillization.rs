/*!
 * Serbian Latin to Cyrillic transliteration.
 *
 * Works word by word. Markup spans are left alone, and words that look
 * foreign (letters Serbian does not use, known loan words, Roman numerals)
 * are kept in Latin script. Cyrillic input is never matched as a word, so
 * running the transform twice changes nothing.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CYRILLIZATION, ParamValues, PipelineContext, SubtitlePlugin};
use crate::markup::{Segment, split_markup};
use crate::subtitle_processor::SubtitleEntry;

/// Runs of Latin letters (Serbian diacritics included) and digits
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9ČčĆćĐđŠšŽž]+").unwrap()
});

/// Uppercase Roman numerals (IV, XII, MCMXCIX)
static ROMAN_NUMERAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").unwrap()
});

/// Letters absent from the Serbian alphabet
const FOREIGN_LETTERS: &[char] = &['w', 'q', 'y', 'W', 'Q', 'Y'];

/// Whole words never transliterated, compared case-insensitively
pub const FOREIGN_WORDS: &[&str] = &[
    "about", "air", "alpha", "and", "back", "bitcoin", "brainz",
    "celebrities", "co2", "conditions", "cpu", "creative", "disclaimer",
    "discord", "dj", "electronics", "entertainment", "files", "fresh",
    "fun", "geographic", "gmbh", "green", "h2o", "hair", "have", "home",
    "idj", "idjtv", "latest", "life", "like", "live",
    "login", "made", "makeup", "must", "national", "previous", "public",
    "punk", "reserved", "score", "screen", "terms", "the", "url",
    "visa",
];

/// Lowercase word prefixes ending on a morpheme boundary that a digraph
/// would otherwise straddle, with the character offset of the boundary
pub const DIGRAPH_SPLIT_PREFIXES: &[(&str, usize)] = &[
    ("nadž", 3),   // nad|živeti
    ("injekc", 2), // in|jekcija
    ("konjuk", 3), // kon|juktura
    ("konjug", 3), // kon|jugacija
    ("tanjug", 3), // tan|jug
];

fn digraph(first: char, second: char) -> Option<char> {
    match (first, second) {
        ('l', 'j') => Some('љ'),
        ('L', 'j') | ('L', 'J') => Some('Љ'),
        ('n', 'j') => Some('њ'),
        ('N', 'j') | ('N', 'J') => Some('Њ'),
        ('d', 'ž') => Some('џ'),
        ('D', 'ž') | ('D', 'Ž') => Some('Џ'),
        _ => None,
    }
}

fn single(ch: char) -> Option<char> {
    let mapped = match ch {
        'a' => 'а', 'A' => 'А', 'b' => 'б', 'B' => 'Б',
        'c' => 'ц', 'C' => 'Ц', 'č' => 'ч', 'Č' => 'Ч',
        'ć' => 'ћ', 'Ć' => 'Ћ', 'd' => 'д', 'D' => 'Д',
        'đ' => 'ђ', 'Đ' => 'Ђ', 'e' => 'е', 'E' => 'Е',
        'f' => 'ф', 'F' => 'Ф', 'g' => 'г', 'G' => 'Г',
        'h' => 'х', 'H' => 'Х', 'i' => 'и', 'I' => 'И',
        'j' => 'ј', 'J' => 'Ј', 'k' => 'к', 'K' => 'К',
        'l' => 'л', 'L' => 'Л', 'm' => 'м', 'M' => 'М',
        'n' => 'н', 'N' => 'Н', 'o' => 'о', 'O' => 'О',
        'p' => 'п', 'P' => 'П', 'r' => 'р', 'R' => 'Р',
        's' => 'с', 'S' => 'С', 'š' => 'ш', 'Š' => 'Ш',
        't' => 'т', 'T' => 'Т', 'u' => 'у', 'U' => 'У',
        'v' => 'в', 'V' => 'В', 'z' => 'з', 'Z' => 'З',
        'ž' => 'ж', 'Ž' => 'Ж',
        _ => return None,
    };
    Some(mapped)
}

/// Transliterate a run of characters, digraphs first
fn cyrillize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        if let Some(mapped) = chars.get(i + 1).and_then(|&next| digraph(chars[i], next)) {
            result.push(mapped);
            i += 2;
            continue;
        }
        result.push(single(chars[i]).unwrap_or(chars[i]));
        i += 1;
    }
    result
}

fn cyrillize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    for (prefix, split_at) in DIGRAPH_SPLIT_PREFIXES {
        if lower.starts_with(prefix) {
            let boundary = word
                .char_indices()
                .nth(*split_at)
                .map_or(word.len(), |(idx, _)| idx);
            let (head, tail) = word.split_at(boundary);
            return cyrillize(head) + &cyrillize(tail);
        }
    }
    cyrillize(word)
}

fn is_roman_numeral(word: &str) -> bool {
    word.chars().count() >= 2 && ROMAN_NUMERAL_REGEX.is_match(word)
}

/// Whether a word must stay in Latin script
fn is_excluded(word: &str) -> bool {
    if word.contains(FOREIGN_LETTERS) {
        return true;
    }
    let lower = word.to_lowercase();
    if FOREIGN_WORDS.contains(&lower.as_str()) {
        return true;
    }
    is_roman_numeral(word)
}

fn cyrillize_text(text: &str) -> String {
    WORD_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            let word = &caps[0];
            if is_excluded(word) {
                word.to_string()
            } else {
                cyrillize_word(word)
            }
        })
        .into_owned()
}

/// Transliterate one subtitle line, passing markup through unchanged
pub fn cyrillize_line(line: &str) -> String {
    split_markup(line)
        .into_iter()
        .map(|segment| match segment {
            Segment::Tag(tag) => tag.to_string(),
            Segment::Text(text) => cyrillize_text(text),
        })
        .collect()
}

pub struct CyrillizationPlugin;

impl SubtitlePlugin for CyrillizationPlugin {
    fn id(&self) -> &'static str {
        CYRILLIZATION
    }

    fn name(&self) -> &'static str {
        "Cyrillization"
    }

    fn description(&self) -> &'static str {
        "Converts subtitle text from Serbian Latin to Cyrillic. Handles digraphs (lj→љ, nj→њ, dž→џ). Preserves formatting tags."
    }

    fn run(
        &self,
        mut entries: Vec<SubtitleEntry>,
        _params: &ParamValues,
        _context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        for entry in entries.iter_mut() {
            entry.lines = entry.lines.iter().map(|line| cyrillize_line(line)).collect();
        }
        entries
    }

    fn summary(&self, _changed: usize) -> String {
        "Transliterated to Cyrillic".to_string()
    }
}
