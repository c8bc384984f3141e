//! Throwaway strings for filling in test forms.
//!
//! Not suitable for secrets: the generator draws from a non-cryptographic
//! thread-local RNG and makes no uniqueness guarantee.

use rand::seq::SliceRandom;
use rand::Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

pub const LETTER_COUNT: usize = 6;
pub const DIGIT_COUNT: usize = 3;

/// Six random letters then three random digits, reversed: three digits
/// followed by six letters, e.g. `652DRoeGs`.
pub fn generate_random_test_string() -> String {
    generate_random_test_string_with(&mut rand::thread_rng())
}

/// [`generate_random_test_string`] drawing from `rng`.
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use valuescout_testgen::generate_random_test_string_with;
///
/// let a = generate_random_test_string_with(&mut StdRng::seed_from_u64(7));
/// let b = generate_random_test_string_with(&mut StdRng::seed_from_u64(7));
/// assert_eq!(a, b);
/// ```
pub fn generate_random_test_string_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(LETTER_COUNT + DIGIT_COUNT);
    out.extend(draw(rng, LETTERS, LETTER_COUNT));
    out.extend(draw(rng, DIGITS, DIGIT_COUNT));
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// A random value for name fields.
pub fn generate_random_full_name() -> String {
    generate_random_test_string()
}

fn draw<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], n: usize) -> Vec<u8> {
    (0..n)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect()
}
