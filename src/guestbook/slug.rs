//! Guest slug derivation.
//!
//! `"John Doe"` becomes `john-doe-` followed by a random `[a-z0-9]` token.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase, collapse every run outside `[a-z0-9]` into one `-`, and trim
/// hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Random base-36 token of `len` characters.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// Full slug: `slugify(name)` plus `-<suffix>`. A name with no usable
/// characters yields the suffix alone.
pub fn generate_with<R: Rng + ?Sized>(name: &str, suffix_len: usize, rng: &mut R) -> String {
    let base = slugify(name);
    let suffix = random_suffix(rng, suffix_len);
    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// [`generate_with`] using the thread-local RNG.
pub fn generate(name: &str, suffix_len: usize) -> String {
    generate_with(name, suffix_len, &mut rand::thread_rng())
}
