//! Porter stemmer (Porter, 1980) used to collapse morphological variants of
//! tag words, so "love", "loved" and "loving" count as one term.
//!
//! Operates on lowercase ASCII words. Anything containing other characters is
//! returned unchanged.

/// Suffix rewrites for step 2, longest overlapping suffix first
const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Reduces a lowercase word to its stem
    pub fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        let mut w = word.as_bytes().to_vec();
        step1a(&mut w);
        step1b(&mut w);
        step1c(&mut w);
        apply_rules(&mut w, STEP2_RULES);
        apply_rules(&mut w, STEP3_RULES);
        step4(&mut w);
        step5(&mut w);

        // only ASCII bytes were ever written
        String::from_utf8(w).unwrap_or_else(|_| word.to_string())
    }
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `w`
fn measure(w: &[u8]) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;
    for i in 0..w.len() {
        let vowel = !is_consonant(w, i);
        if !vowel && prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    count
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant ending where the last consonant is not w, x or y
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 1)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 3)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn replace_suffix(w: &mut Vec<u8>, suffix_len: usize, replacement: &str) {
    w.truncate(w.len() - suffix_len);
    w.extend_from_slice(replacement.as_bytes());
}

fn step1a(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"s") && !w.ends_with(b"ss") {
        w.pop();
    }
}

fn step1b(w: &mut Vec<u8>) {
    if w.ends_with(b"eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }
        return;
    }

    let suffix_len = if w.ends_with(b"ed") {
        2
    } else if w.ends_with(b"ing") {
        3
    } else {
        return;
    };

    if !has_vowel(&w[..w.len() - suffix_len]) {
        return;
    }
    w.truncate(w.len() - suffix_len);

    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_double_consonant(w) && !matches!(w[w.len() - 1], b'l' | b's' | b'z') {
        w.pop();
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

fn step1c(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && has_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

/// First matching suffix wins; it is rewritten only when the stem has measure > 0
fn apply_rules(w: &mut Vec<u8>, rules: &[(&str, &str)]) {
    for (suffix, replacement) in rules {
        if w.ends_with(suffix.as_bytes()) {
            if measure(&w[..w.len() - suffix.len()]) > 0 {
                replace_suffix(w, suffix.len(), replacement);
            }
            return;
        }
    }
}

fn step4(w: &mut Vec<u8>) {
    for suffix in STEP4_SUFFIXES {
        if !w.ends_with(suffix.as_bytes()) {
            continue;
        }
        let stem_len = w.len() - suffix.len();
        if *suffix == "ion" && !matches!(stem_len.checked_sub(1).map(|i| w[i]), Some(b's' | b't')) {
            continue;
        }
        if measure(&w[..stem_len]) > 1 {
            w.truncate(stem_len);
        }
        return;
    }
}

fn step5(w: &mut Vec<u8>) {
    if w.ends_with(b"e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }

    if w.ends_with(b"ll") && measure(w) > 1 {
        w.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word)
    }

    #[test]
    fn test_plurals() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("caress"), "caress");
    }

    #[test]
    fn test_ed_and_ing() {
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("filing"), "file");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("feed"), "feed");
    }

    #[test]
    fn test_love_variants_collapse() {
        assert_eq!(stem("love"), "love");
        assert_eq!(stem("loved"), "love");
        assert_eq!(stem("loving"), "love");
    }

    #[test]
    fn test_derivational_suffixes() {
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("generalization"), "gener");
    }

    #[test]
    fn test_short_and_non_ascii_words_untouched() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem(""), "");
        assert_eq!(stem("café"), "café");
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure(b"tree"), 0);
        assert_eq!(measure(b"trouble"), 1);
        assert_eq!(measure(b"troubles"), 2);
        assert_eq!(measure(b"oaten"), 2);
    }
}
