use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// One-slot preview buffer for the next piece.
///
/// The buffer is empty only until the first spawn of a session. Every
/// [`Self::pop_next`] returns the previewed kind (or draws one if the buffer
/// is empty) and immediately refills the slot, so the preview is always one
/// piece ahead of the falling piece.
///
/// # Example
///
/// ```
/// use laserfall_engine::PieceBuffer;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(1);
/// let mut buffer = PieceBuffer::new();
/// assert_eq!(buffer.peek_next(), None);
///
/// let first = buffer.pop_next(&mut rng);
/// let preview = buffer.peek_next().unwrap();
/// let second = buffer.pop_next(&mut rng);
/// assert_eq!(preview, second);
/// # let _ = first;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PieceBuffer {
    next: Option<PieceKind>,
}

impl PieceBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: None }
    }

    /// Returns the previewed kind, if one has been drawn.
    #[must_use]
    pub const fn peek_next(&self) -> Option<PieceKind> {
        self.next
    }

    /// Takes the previewed kind and draws a new preview.
    pub fn pop_next<R>(&mut self, rng: &mut R) -> PieceKind
    where
        R: Rng + ?Sized,
    {
        let current = self.next.take().unwrap_or_else(|| rng.random());
        self.next = Some(rng.random());
        current
    }

    pub fn clear(&mut self) {
        self.next = None;
    }
}

/// Seed for deterministic sessions.
///
/// This is a 128-bit (16-byte) seed used to initialize the [`Pcg32`](rand_pcg::Pcg32)
/// generator that draws pieces and special-mode rolls. Using the same seed
/// and the same inputs reproduces the same game, which makes simulations
/// and bug reports replayable.
///
/// Seeds serialize as 32 hex characters and parse from the same format.
///
/// # Example
///
/// ```
/// use laserfall_engine::{GameSeed, GameSession};
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
///
/// let mut first = GameSession::with_seed(seed);
/// let mut second = GameSession::with_seed(seed);
/// first.new_game();
/// second.new_game();
/// assert_eq!(first.next_piece(), second.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        // `from_str_radix` tolerates a leading sign, which is not valid hex.
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseSeedError {
                reason: format!("{s} contains non-hex characters"),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_buffer_is_one_piece_ahead() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut buffer = PieceBuffer::new();
        assert_eq!(buffer.peek_next(), None);

        buffer.pop_next(&mut rng);
        for _ in 0..20 {
            let preview = buffer.peek_next().unwrap();
            assert_eq!(buffer.pop_next(&mut rng), preview);
            assert!(buffer.peek_next().is_some());
        }

        buffer.clear();
        assert_eq!(buffer.peek_next(), None);
    }

    #[test]
    fn test_same_rng_same_sequence() {
        let mut rng1 = Pcg32::seed_from_u64(3);
        let mut rng2 = Pcg32::seed_from_u64(3);
        let mut buffer1 = PieceBuffer::new();
        let mut buffer2 = PieceBuffer::new();
        for _ in 0..50 {
            assert_eq!(buffer1.pop_next(&mut rng1), buffer2.pop_next(&mut rng2));
        }
    }

    mod game_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: GameSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: GameSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = GameSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed: GameSeed = serde_json::from_str("\"00000000000000000000000000000000\"").unwrap();
            assert_eq!(seed.to_bytes(), [0; 16]);
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: GameSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_bytes()[0], 0x01);
            assert_eq!(seed.to_bytes()[15], 0x10);
        }

        #[test]
        fn test_rejects_invalid_input() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+0123456789abcdef0123456789abcde",
            ] {
                let err = input.parse::<GameSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{input:?}");
            }
            let result = serde_json::from_str::<GameSeed>("\"xyz\"");
            assert!(result.is_err());
        }
    }
}
