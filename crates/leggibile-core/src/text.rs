//! Italian tokenization.
//!
//! Provides sentence splitting, treebank-style word tokenization, and the
//! cleaned word list used by the metrics engine.

use regex::Regex;
use std::sync::LazyLock;

use crate::dictionaries::abbreviations::is_abbreviation;

/// Regex for initials (A., G.B., etc.) as collected before a period.
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}(?:\.\p{Lu})*$").expect("valid regex"));

/// Words made only of Unicode letters (categories Lu, Ll, Lt, Lm, Lo).
static LETTERS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}+$").expect("valid regex"));

/// Sentences and cleaned words of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Sentences in order, trimmed, original case preserved.
    pub sentences: Vec<String>,
    /// Lower-cased words made only of alphabetic characters.
    pub words: Vec<String>,
}

/// Split `text` into sentences and cleaned words.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn tokenize(text: &str) -> Tokens {
    let sentences = split_sentences(text);
    let words = sentences
        .iter()
        .flat_map(|s| sentence_tokens(s))
        .filter(|w| is_alphabetic_word(w))
        .map(|w| w.to_lowercase())
        .collect();

    Tokens { sentences, words }
}

/// Split text into sentences with abbreviation, decimal, and ellipsis awareness.
///
/// Uses a character-by-character scan with context-based boundary detection.
/// A terminator only ends a sentence when whitespace or the end of the text
/// follows it, so decimals (`3.14`), URLs, and `s.p.a.` stay whole.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if !is_sentence_terminator(ch) {
            current.push(ch);
            i += 1;
            continue;
        }

        // Absorb the whole terminator run ("?!", "...") and any closers after it.
        let mut run_end = i;
        while run_end < chars.len() && is_sentence_terminator(chars[run_end]) {
            run_end += 1;
        }
        let mut end = run_end;
        while end < chars.len() && is_closing_punctuation(chars[end]) {
            end += 1;
        }
        current.extend(&chars[i..end]);

        let context = extract_context(&chars, i, run_end, end);
        if is_sentence_boundary(&context) {
            push_sentence(&mut sentences, &current);
            current.clear();
        }

        i = end;
    }

    // Remaining text
    push_sentence(&mut sentences, &current);

    sentences
}

/// Tokenize text into words and punctuation, Italian treebank style.
///
/// The text is split into sentences first, so only sentence-final periods
/// are separated; `ecc.` in mid-sentence stays a single token. Apostrophed
/// forms (`l'acqua`, `dell'anno`) are kept whole.
pub fn tokenize_words(text: &str) -> Vec<String> {
    split_sentences(text)
        .iter()
        .flat_map(|s| sentence_tokens(s))
        .collect()
}

/// Whether `word` is non-empty and every character is a letter.
///
/// Letter numbers such as `Ⅷ` and combining marks do not count.
pub fn is_alphabetic_word(word: &str) -> bool {
    LETTERS_PATTERN.is_match(word)
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '…')
}

const fn is_closing_punctuation(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '»' | '”' | '’' | ')' | ']' | '}')
}

/// Context around a potential sentence boundary.
struct SentenceContext {
    run: String,
    word_before: String,
    char_after: Option<char>,
    followed_by_space: bool,
    is_end_of_text: bool,
}

fn extract_context(chars: &[char], start: usize, run_end: usize, end: usize) -> SentenceContext {
    let mut after_start = end;
    while after_start < chars.len() && chars[after_start].is_whitespace() {
        after_start += 1;
    }

    SentenceContext {
        run: chars[start..run_end].iter().collect(),
        word_before: get_word_before(chars, start),
        char_after: chars.get(after_start).copied(),
        followed_by_space: chars.get(end).is_some_and(|c| c.is_whitespace()),
        is_end_of_text: after_start == chars.len(),
    }
}

fn get_word_before(chars: &[char], pos: usize) -> String {
    let mut word_chars = Vec::new();
    let mut i = pos;

    // Collect letters, digits, and inner periods ("s.p.a", "prof.ssa")
    while i > 0 {
        i -= 1;
        if chars[i].is_alphanumeric() || chars[i] == '.' {
            word_chars.push(chars[i]);
        } else {
            break;
        }
    }

    word_chars.reverse();
    word_chars.iter().collect()
}

fn is_sentence_boundary(context: &SentenceContext) -> bool {
    if context.is_end_of_text {
        return true;
    }

    if !context.followed_by_space {
        return false;
    }

    // ! and ? always close a sentence
    if context.run.contains(['!', '?']) {
        return true;
    }

    if is_ellipsis(&context.run) {
        return context.char_after.is_some_and(char::is_uppercase);
    }

    // For periods, apply heuristics
    if is_likely_abbreviation(&context.word_before) || is_likely_initial(&context.word_before) {
        return false;
    }

    // Numbered lists and split decimals ("punto 3. 4 casi")
    if let Some(next_char) = context.char_after
        && next_char.is_ascii_digit()
        && context
            .word_before
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_digit())
    {
        return false;
    }

    !context.char_after.is_some_and(char::is_lowercase)
}

fn is_ellipsis(run: &str) -> bool {
    run.contains('…') || run.chars().filter(|&c| c == '.').count() > 1
}

fn is_likely_abbreviation(word: &str) -> bool {
    let word_clean = word.trim_end_matches('.');
    !word_clean.is_empty() && is_abbreviation(word_clean)
}

fn is_likely_initial(word: &str) -> bool {
    INITIALS_PATTERN.is_match(word.trim_end_matches('.'))
}

/// Tokenize a single sentence.
fn sentence_tokens(sentence: &str) -> Vec<String> {
    let chunks: Vec<&str> = sentence.split_whitespace().collect();
    let last = chunks.len().saturating_sub(1);
    let mut tokens = Vec::new();

    for (idx, chunk) in chunks.iter().enumerate() {
        split_chunk(chunk, idx == last, &mut tokens);
    }

    tokens
}

const fn is_opening_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\'' | '«' | '“' | '‘' | '(' | '[' | '{' | '<' | '¡' | '¿'
    )
}

const fn is_trailing_punctuation(ch: char) -> bool {
    matches!(
        ch,
        ',' | ';' | ':' | '!' | '?' | '…' | '"' | '\'' | '»' | '”' | '’' | ')' | ']' | '}' | '>'
    )
}

const fn is_always_split(ch: char) -> bool {
    matches!(
        ch,
        ';' | '!'
            | '?'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '"'
            | '«'
            | '»'
            | '“'
            | '”'
            | '@'
            | '#'
            | '$'
            | '%'
            | '&'
            | '…'
            | '—'
            | '–'
    )
}

/// Split one whitespace-delimited chunk into tokens.
fn split_chunk(chunk: &str, sentence_final: bool, out: &mut Vec<String>) {
    let mut body: Vec<char> = chunk.chars().collect();

    // Leading quotes and brackets
    let mut lead = 0;
    while lead < body.len() && is_opening_punctuation(body[lead]) {
        out.push(body[lead].to_string());
        lead += 1;
    }
    body.drain(..lead);

    // Trailing punctuation, collected back to front
    let mut tail: Vec<String> = Vec::new();
    let mut only_closers = true;
    let mut period_split = false;
    while let Some(&last) = body.last() {
        if body.ends_with(&['.', '.', '.']) {
            tail.push("...".to_string());
            body.truncate(body.len() - 3);
            only_closers = false;
        } else if is_trailing_punctuation(last) {
            if !is_closing_punctuation(last) {
                only_closers = false;
            }
            tail.push(last.to_string());
            body.pop();
        } else if last == '.'
            && sentence_final
            && only_closers
            && !period_split
            && body.len() > 1
            && body[body.len() - 2] != '.'
        {
            tail.push(".".to_string());
            body.pop();
            period_split = true;
        } else {
            break;
        }
    }

    split_inner(&body, out);
    out.extend(tail.into_iter().rev());
}

/// Split the inside of a chunk on always-split punctuation, ellipses, and
/// commas or colons that are not between digits.
fn split_inner(body: &[char], out: &mut Vec<String>) {
    let mut current = String::new();
    let mut i = 0;

    while i < body.len() {
        let ch = body[i];
        let prev_digit = i > 0 && body[i - 1].is_ascii_digit();
        let next_digit = body.get(i + 1).is_some_and(char::is_ascii_digit);

        if body[i..].starts_with(&['.', '.', '.']) {
            flush(&mut current, out);
            out.push("...".to_string());
            i += 3;
            continue;
        }

        if is_always_split(ch) || (matches!(ch, ',' | ':') && !(prev_digit && next_digit)) {
            flush(&mut current, out);
            out.push(ch.to_string());
        } else {
            current.push(ch);
        }
        i += 1;
    }

    flush(&mut current, out);
}

fn flush(current: &mut String, out: &mut Vec<String>) {
    if !current.is_empty() {
        out.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences(
            "Il gatto corre veloce nel giardino. La pioggia cade lentamente sulla città.",
        );
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Il gatto corre veloce nel giardino.");
        assert_eq!(sentences[1], "La pioggia cade lentamente sulla città.");
    }

    #[test]
    fn abbreviations_not_split() {
        let sentences = split_sentences("Il sig. Rossi è arrivato. Ha portato il pane.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("sig. Rossi"));
    }

    #[test]
    fn compound_abbreviations_not_split() {
        let sentences =
            split_sentences("La prof.ssa Bianchi lavora per la Acme s.p.a. Milano è lontana.");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn initials_not_split() {
        let sentences = split_sentences("Ho letto G. Verga ieri sera. Mi è piaciuto.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("G. Verga"));
    }

    #[test]
    fn decimal_numbers_not_split() {
        let sentences = split_sentences("Il prezzo è 3.14 euro. Costa poco.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split_sentences("Sei sicuro? Non ci credo! È fantastico.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn ellipsis_splits_only_before_capital() {
        let sentences = split_sentences("Aspetta... poi vediamo. Va bene... Arrivo.");
        assert_eq!(
            sentences,
            vec!["Aspetta... poi vediamo.", "Va bene...", "Arrivo."]
        );
    }

    #[test]
    fn lowercase_after_period_does_not_split() {
        let sentences = split_sentences("Vedi il punto. poi continua.");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn closing_quote_stays_with_sentence() {
        let sentences = split_sentences("Disse: \"Vado via.\" Poi uscì.");
        assert_eq!(sentences, vec!["Disse: \"Vado via.\"", "Poi uscì."]);
    }

    #[test]
    fn text_without_terminator_is_one_sentence() {
        let sentences = split_sentences("una frase senza punto finale");
        assert_eq!(sentences, vec!["una frase senza punto finale"]);
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn tokenize_words_keeps_apostrophes() {
        let tokens = tokenize_words("Il gatto, l'acqua e la città.");
        assert_eq!(
            tokens,
            vec!["Il", "gatto", ",", "l'acqua", "e", "la", "città", "."]
        );
    }

    #[test]
    fn tokenize_words_keeps_numbers_whole() {
        let tokens = tokenize_words("Nel 2024 erano 3,5 milioni: tanti.");
        assert_eq!(
            tokens,
            vec!["Nel", "2024", "erano", "3,5", "milioni", ":", "tanti", "."]
        );
    }

    #[test]
    fn mid_sentence_abbreviation_keeps_period() {
        let tokens = tokenize_words("Mele, pere ecc. sono frutti.");
        assert!(tokens.contains(&"ecc.".to_string()));
        assert_eq!(tokens.last().map(String::as_str), Some("."));
    }

    #[test]
    fn quotes_and_brackets_split() {
        let tokens = tokenize_words("«Ciao» (disse) lui!");
        assert_eq!(
            tokens,
            vec!["«", "Ciao", "»", "(", "disse", ")", "lui", "!"]
        );
    }

    #[test]
    fn cleaned_words_drop_non_alphabetic() {
        let tokens = tokenize("L'acqua è fresca, costa 2 euro.");
        assert_eq!(tokens.words, vec!["è", "fresca", "costa", "euro"]);
        assert_eq!(tokens.sentences.len(), 1);
    }

    #[test]
    fn letter_numbers_are_not_words() {
        assert!(!is_alphabetic_word("Ⅷ"));
        assert!(!is_alphabetic_word("e\u{0300}"));
        assert!(is_alphabetic_word("perché"));
        assert!(!is_alphabetic_word(""));

        let tokens = tokenize("Ⅷ re.");
        assert_eq!(tokens.words, vec!["re"]);
    }

    #[test]
    fn cleaned_words_are_lowercase() {
        let tokens = tokenize("Roma È Bella.");
        assert_eq!(tokens.words, vec!["roma", "è", "bella"]);
    }

    #[test]
    fn numeric_only_has_no_words() {
        let tokens = tokenize("123 456");
        assert!(tokens.words.is_empty());
        assert_eq!(tokens.sentences.len(), 1);
    }
}
