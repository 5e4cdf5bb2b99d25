//! Avatar emoji palette for players who do not pick one themselves.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const EMOJIS: &[&str] = &[
    "😀", "😎", "🤖", "👻", "👽", "👾", "🐱", "🐴", "🦊", "🦁", "🦄", "🐲", "😇", "🤩", "🥳",
    "🤯", "🤠", "🤡", "😈", "👹", "👺", "🙈", "🙉", "🙊", "🐼", "🐻", "🐨", "🐯", "🐷", "🐸",
    "🐒", "🦍", "🐔", "🐧", "🐦", "🦉", "🦋", "🐢", "🐍", "🐙", "🦀", "🐠", "🐳", "🐬", "🦖",
    "🐉", "🧚", "🧜", "🧙", "🧛", "🧟", "🧞",
];

/// Pick a random avatar from the palette.
pub fn random_emoji<R: Rng + ?Sized>(rng: &mut R) -> String {
    EMOJIS
        .choose(rng)
        .copied()
        .unwrap_or("🤖")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_emoji_comes_from_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let e = random_emoji(&mut rng);
            assert!(EMOJIS.contains(&e.as_str()));
        }
    }
}
