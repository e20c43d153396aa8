//! Synthetic textual metadata for output files.
//!
//! Scrubbed PNGs with no text at all look unusual, so each output gets a
//! handful of random key/value entries. Keys are drawn fresh for every image
//! so the batch shares no fixed field names.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Hidden marker, stored reversed.
const REVERSED_MARKER: &str = "gnihton rebmemer slexip";

/// Number of plain random key/value pairs in a bundle.
pub const RANDOM_PAIR_COUNT: usize = 5;

/// Total entries: random pairs, the phrase pair and the marker pair.
pub const FORGED_ENTRY_COUNT: usize = RANDOM_PAIR_COUNT + 2;

/// A generated set of text entries, ready to embed at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeMetadata {
    entries: Vec<(String, String)>,
    marker_key: String,
}

impl FakeMetadata {
    /// The decoded hidden marker value.
    pub fn marker() -> String {
        REVERSED_MARKER.chars().rev().collect()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key the marker was stored under.
    pub fn marker_key(&self) -> &str {
        &self.marker_key
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}

/// Generate a fresh bundle.
pub fn forge_metadata<R: Rng + ?Sized>(rng: &mut R) -> FakeMetadata {
    let mut entries: Vec<(String, String)> = Vec::with_capacity(FORGED_ENTRY_COUNT);

    for _ in 0..RANDOM_PAIR_COUNT {
        let key = unique_key(rng, &entries);
        let value = random_word(rng);
        entries.push((key, value));
    }

    let phrase = format!(
        "{}{} {}{}",
        random_word(rng),
        random_number(rng),
        random_word(rng),
        random_number(rng)
    );
    let phrase_key = unique_key(rng, &entries);
    entries.push((phrase_key, phrase));

    let marker_key = unique_key(rng, &entries);
    entries.push((marker_key.clone(), FakeMetadata::marker()));

    FakeMetadata {
        entries,
        marker_key,
    }
}

fn unique_key<R: Rng + ?Sized>(rng: &mut R, taken: &[(String, String)]) -> String {
    loop {
        let key = title_case(&random_word(rng));
        if !taken.iter().any(|(k, _)| *k == key) {
            return key;
        }
    }
}

/// A random word of 5 to 15 characters.
///
/// Alphabet: letters only (70%), letters and digits (20%), letters, digits
/// and symbols (10%).
pub fn random_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    let length = rng.gen_range(5..=15);
    let roll: f64 = rng.gen();

    let mut alphabet = LETTERS.to_vec();
    if roll >= 0.7 {
        alphabet.extend_from_slice(DIGITS);
    }
    if roll >= 0.9 {
        alphabet.extend_from_slice(SYMBOLS);
    }

    random_string(rng, &alphabet, length)
}

/// A random number rendered as decimal (40%), upper-case hex (30%),
/// binary (20%) or a short alphanumeric run (10%).
pub fn random_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let roll: f64 = rng.gen();

    if roll < 0.4 {
        let digits: u32 = rng.gen_range(1..=6);
        let low = 10u32.pow(digits - 1);
        let high = 10u32.pow(digits) - 1;
        rng.gen_range(low..=high).to_string()
    } else if roll < 0.7 {
        format!("{:X}", rng.gen_range(1000u32..=999_999))
    } else if roll < 0.9 {
        format!("{:b}", rng.gen_range(100u32..=9999))
    } else {
        let mut alphabet = LETTERS.to_vec();
        alphabet.extend_from_slice(DIGITS);
        let length = rng.gen_range(3..=6);
        random_string(rng, &alphabet, length)
    }
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    (0..length)
        .filter_map(|_| alphabet.choose(&mut *rng).map(|&b| b as char))
        .collect()
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut in_run = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if in_run {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
