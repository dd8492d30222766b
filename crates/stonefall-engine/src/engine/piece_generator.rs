use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the kind of each newly generated piece.
///
/// [`GameSession`](super::GameSession) owns one source for its whole
/// lifetime; tests plug in a scripted source to get deterministic games.
pub trait PieceSource: fmt::Debug + Send {
    fn next_kind(&mut self) -> PieceKind;
}

/// Draws piece kinds uniformly at random from the 7-piece catalog.
///
/// Unlike a bag randomizer, every draw is independent, so the same kind may
/// repeat any number of times.
///
/// # Example
///
/// ```
/// use stonefall_engine::{PieceSource, RandomPieceSource};
///
/// let seed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let mut a = RandomPieceSource::with_seed(seed);
/// let mut b = RandomPieceSource::with_seed(seed);
/// assert_eq!(a.next_kind(), b.next_kind());
/// ```
#[derive(Debug, Clone)]
pub struct RandomPieceSource {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for RandomPieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieceSource {
    /// Creates a source seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl PieceSource for RandomPieceSource {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed written as 32 hexadecimal digits, both on the command line
/// and in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hexadecimal digits")]
pub struct ParsePieceSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Replays a fixed list of kinds, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedPieceSource {
    kinds: Vec<PieceKind>,
    index: usize,
}

#[cfg(test)]
impl ScriptedPieceSource {
    pub(crate) fn new(kinds: &[PieceKind]) -> Self {
        assert!(!kinds.is_empty());
        Self {
            kinds: kinds.to_vec(),
            index: 0,
        }
    }
}

#[cfg(test)]
impl PieceSource for ScriptedPieceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }
}
