//! Join-code generation and validation.

use rand::Rng;

/// Codes are short enough to read off a screen and type on a phone.
pub const CODE_LEN: usize = 4;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a random join code (e.g. "KQZM").
///
/// No global-uniqueness check here: the session insert fails with a
/// Conflict on the unlikely collision and the caller retries.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// True when `code` has the expected shape (length and alphabet).
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generated_codes_are_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let code = generate_code(&mut rng);
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn validation_rejects_wrong_shapes() {
        assert!(is_valid_code("ABCD"));
        assert!(!is_valid_code("abc"));
        assert!(!is_valid_code("ABCDE"));
        assert!(!is_valid_code("AB1D"));
        assert!(!is_valid_code(""));
    }
}
