use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Animal, EngineConfig, Piece, ShapeKind};

/// Seed for deterministic sessions.
///
/// A 128-bit seed for the session's random number generator. Using the same
/// seed and the same command sequence reproduces the same game: piece order,
/// overlay layout and black sheep tie-breaks.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use herdfall_engine::{EngineConfig, GameSession, SessionSeed};
/// use rand::Rng as _;
///
/// let seed: SessionSeed = rand::rng().random();
///
/// let a = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
/// let b = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
/// assert_eq!(a.current_piece(), b.current_piece());
/// assert_eq!(a.overlay(), b.overlay());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSeed([u8; 16]);

impl SessionSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn to_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for SessionSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for SessionSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for SessionSeed {
    type Err = String;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for SessionSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Allows generating random `SessionSeed` values with `rng.random()`.
impl Distribution<SessionSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SessionSeed(seed)
    }
}

/// Produces falling pieces using weighted randomness.
///
/// Each spawn draws the piece kind first: wolves with probability
/// `wolves_weight`, black sheep with `black_sheep_weight`, otherwise a normal
/// piece whose shape and animal are then drawn uniformly and independently.
///
/// The generator holds no random state of its own; the caller supplies the
/// generator so the whole session shares a single stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceGenerator {
    cols: usize,
    wolves_weight: f64,
    black_sheep_weight: f64,
}

impl PieceGenerator {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cols: config.cols,
            wolves_weight: config.wolves_weight,
            black_sheep_weight: config.black_sheep_weight,
        }
    }

    /// Anchor column of a freshly spawned normal (4-wide) piece.
    #[must_use]
    pub fn normal_spawn_col(&self) -> i32 {
        spawn_col(self.cols) - 2
    }

    /// Anchor column of a freshly spawned special (2-wide) piece.
    #[must_use]
    pub fn special_spawn_col(&self) -> i32 {
        spawn_col(self.cols) - 1
    }

    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Piece {
        let roll: f64 = rng.random();
        if roll < self.wolves_weight {
            return Piece::wolves(self.special_spawn_col(), 0);
        }
        if roll < self.wolves_weight + self.black_sheep_weight {
            return Piece::black_sheep(self.special_spawn_col(), 0);
        }
        let shape: ShapeKind = rng.random();
        let animal: Animal = rng.random();
        Piece::normal(shape, animal, self.normal_spawn_col(), 0)
    }
}

fn spawn_col(cols: usize) -> i32 {
    i32::try_from(cols / 2).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use crate::PieceKind;

    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> SessionSeed {
        SessionSeed(bytes)
    }

    #[test]
    fn test_format_is_32_char_hex_string() {
        let seed: SessionSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let hex_str = serialized.trim_matches('"');
        assert_eq!(hex_str.len(), 32);
        assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex_str, seed.to_string());
    }

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = seed_from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        let deserialized: SessionSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_deserialize_uppercase_hex() {
        let parsed: SessionSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(parsed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_invalid_seeds() {
        for json in [
            "\"\"",
            "\"0123456789abcdef0123456789abcde\"",
            "\"0123456789abcdef0123456789abcdef0\"",
            "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
        ] {
            let err = serde_json::from_str::<SessionSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"), "{json}");
        }
    }

    #[test]
    fn test_spawn_positions() {
        let generator = PieceGenerator::new(&EngineConfig::default());
        assert_eq!(generator.normal_spawn_col(), 3);
        assert_eq!(generator.special_spawn_col(), 4);

        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let piece = generator.spawn(&mut rng);
            assert_eq!(piece.row(), 0);
            match piece.kind() {
                PieceKind::Normal(_) => {
                    assert_eq!(piece.col(), 3);
                    assert_eq!(piece.matrix().size(), 4);
                    assert!(piece.rotates());
                }
                PieceKind::Wolves | PieceKind::BlackSheep => {
                    assert_eq!(piece.col(), 4);
                    assert_eq!(piece.matrix().size(), 2);
                    assert!(!piece.rotates());
                }
            }
        }
    }

    #[test]
    fn test_deterministic_generation() {
        let seed = seed_from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);
        let generator = PieceGenerator::new(&EngineConfig::default());
        let mut rng1 = seed.to_rng();
        let mut rng2 = seed.to_rng();
        for _ in 0..50 {
            assert_eq!(generator.spawn(&mut rng1), generator.spawn(&mut rng2));
        }
    }

    #[test]
    fn test_kind_frequencies_follow_weights() {
        let generator = PieceGenerator::new(&EngineConfig::default());
        let mut rng = Pcg32::seed_from_u64(42);
        let trials = 20_000;
        let (mut wolves, mut black_sheep) = (0, 0);
        for _ in 0..trials {
            match generator.spawn(&mut rng).kind() {
                PieceKind::Wolves => wolves += 1,
                PieceKind::BlackSheep => black_sheep += 1,
                PieceKind::Normal(_) => {}
            }
        }
        // Expected 800 wolves and 1600 black sheep.
        assert!((600..1000).contains(&wolves), "wolves: {wolves}");
        assert!((1350..1850).contains(&black_sheep), "black sheep: {black_sheep}");
    }

    #[test]
    fn test_zero_weights_only_spawn_normal_pieces() {
        let config = EngineConfig {
            wolves_weight: 0.0,
            black_sheep_weight: 0.0,
            ..EngineConfig::default()
        };
        let generator = PieceGenerator::new(&config);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!((0..500).all(|_| generator.spawn(&mut rng).kind().is_normal()));
    }
}
