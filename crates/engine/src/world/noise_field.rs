use std::fmt;

use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

const FNV1A_OFFSET_BASIS_64: u64 = 0xcbf2_9ce4_8422_2325;
const FNV1A_PRIME_64: u64 = 0x0000_0100_0000_01b3;

/// Deterministic, continuous 2D noise in `[-1, 1]`.
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<N: NoiseField + ?Sized> NoiseField for &N {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

impl<N: NoiseField + ?Sized> NoiseField for Box<N> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    Elevation,
    Moisture,
    River,
    Objects,
}

impl NoiseChannel {
    pub const ALL: [NoiseChannel; 4] = [
        NoiseChannel::Elevation,
        NoiseChannel::Moisture,
        NoiseChannel::River,
        NoiseChannel::Objects,
    ];

    fn salt(self) -> &'static [u8] {
        match self {
            NoiseChannel::Elevation => b"elevation",
            NoiseChannel::Moisture => b"moisture",
            NoiseChannel::River => b"river",
            NoiseChannel::Objects => b"objects",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(pub u64);

impl WorldSeed {
    pub fn random() -> Self {
        Self(rand::random::<u64>())
    }

    /// Per-channel seed; distinct channels of one world never share a lattice.
    pub fn channel_seed(self, channel: NoiseChannel) -> u32 {
        let mut hash = FNV1A_OFFSET_BASIS_64;
        for byte in self.0.to_le_bytes().iter().chain(channel.salt()) {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV1A_PRIME_64);
        }
        ((hash >> 32) ^ (hash & 0xffff_ffff)) as u32
    }
}

impl fmt::Display for WorldSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct SimplexField {
    seed: u32,
    simplex: Simplex,
}

impl SimplexField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Clone for SimplexField {
    fn clone(&self) -> Self {
        Self::new(self.seed)
    }
}

impl fmt::Debug for SimplexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexField")
            .field("seed", &self.seed)
            .finish()
    }
}

impl NoiseField for SimplexField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let value = self.simplex.get([x, y]);
        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The four independently seeded channels the generator reads.
#[derive(Debug, Clone)]
pub struct NoiseChannels<N> {
    pub elevation: N,
    pub moisture: N,
    pub river: N,
    pub objects: N,
}

impl NoiseChannels<SimplexField> {
    pub fn from_seed(seed: WorldSeed) -> Self {
        Self {
            elevation: SimplexField::new(seed.channel_seed(NoiseChannel::Elevation)),
            moisture: SimplexField::new(seed.channel_seed(NoiseChannel::Moisture)),
            river: SimplexField::new(seed.channel_seed(NoiseChannel::River)),
            objects: SimplexField::new(seed.channel_seed(NoiseChannel::Objects)),
        }
    }
}

impl<N: NoiseField> NoiseChannels<N> {
    pub fn channel(&self, channel: NoiseChannel) -> &N {
        match channel {
            NoiseChannel::Elevation => &self.elevation,
            NoiseChannel::Moisture => &self.moisture,
            NoiseChannel::River => &self.river,
            NoiseChannel::Objects => &self.objects,
        }
    }
}
