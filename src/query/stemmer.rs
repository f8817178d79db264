//! Porter stemming for term rewriting.
//!
//! The part-assignment pass replaces term text with its stem when a
//! stemmed postings part exists, so the same algorithm must be used at
//! index and query time. Only ASCII letters are stemmed; other words are
//! returned lower-cased.

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Martin Porter's 1980 suffix-stripping algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

const STEP2: &[(&str, &str)] = &[
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

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

impl PorterStemmer {
    pub fn new() -> Self {
        PorterStemmer
    }
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `w`.
fn measure(w: &[u8]) -> usize {
    let n = w.len();
    let mut i = 0;
    let mut m = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i >= n {
            return m;
        }
        while i < n && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
    }
}

fn contains_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn stem_of<'a>(w: &'a [u8], suffix: &str) -> Option<&'a [u8]> {
    w.strip_suffix(suffix.as_bytes())
}

fn replace(w: &mut Vec<u8>, suffix_len: usize, replacement: &str) {
    w.truncate(w.len() - suffix_len);
    w.extend_from_slice(replacement.as_bytes());
}

fn step1ab(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if !w.ends_with(b"ss") && w.ends_with(b"s") {
        w.pop();
    }

    let stripped = if let Some(stem) = stem_of(w, "eed") {
        if measure(stem) > 0 {
            w.pop();
        }
        false
    } else if stem_of(w, "ed").is_some_and(contains_vowel) {
        w.truncate(w.len() - 2);
        true
    } else if stem_of(w, "ing").is_some_and(contains_vowel) {
        w.truncate(w.len() - 3);
        true
    } else {
        false
    };

    if stripped {
        if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
            w.push(b'e');
        } else if ends_double_consonant(w) && !matches!(w[w.len() - 1], b'l' | b's' | b'z') {
            w.pop();
        } else if measure(w) == 1 && ends_cvc(w) {
            w.push(b'e');
        }
    }
}

fn step1c(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && contains_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

/// First matching suffix decides; it is replaced only if the remaining stem
/// has measure > 0.
fn replace_first(w: &mut Vec<u8>, rules: &[(&str, &str)]) {
    for (suffix, replacement) in rules {
        if let Some(stem) = stem_of(w, suffix) {
            if measure(stem) > 0 {
                replace(w, suffix.len(), replacement);
            }
            return;
        }
    }
}

fn step4(w: &mut Vec<u8>) {
    for suffix in STEP4 {
        let Some(stem) = stem_of(w, suffix) else {
            continue;
        };
        if *suffix == "ion" && !matches!(stem.last(), Some(b's') | Some(b't')) {
            continue;
        }
        let keep = stem.len();
        if measure(stem) > 1 {
            w.truncate(keep);
        }
        return;
    }
}

fn step5(w: &mut Vec<u8>) {
    if let Some(stem) = stem_of(w, "e") {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }
    if w.ends_with(b"ll") && measure(w) > 1 {
        w.pop();
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.len() <= 2 || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
            return lower;
        }

        let mut w = lower.into_bytes();
        step1ab(&mut w);
        step1c(&mut w);
        replace_first(&mut w, STEP2);
        replace_first(&mut w, STEP3);
        step4(&mut w);
        step5(&mut w);

        // Only ASCII bytes were touched.
        String::from_utf8(w).unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}
