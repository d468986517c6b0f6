//! Ring identifiers.
//!
//! An [Id] is a value of the cyclic group `Z/2^m`, where the bit length `m` is carried by the id
//! itself. Addition and subtraction wrap around the ring. Since there is no meaningful total order
//! on a ring, ids are compared through [BiasId], which observes every id relative to a chosen
//! zero point, or through [Id::is_within], which tests membership of a clockwise arc.

use std::ops::Add;
use std::ops::Neg;
use std::ops::Sub;

use serde::Deserialize;
use serde::Serialize;

use crate::consts::MAX_BITS;
use crate::error::Error;
use crate::error::Result;

/// Id is a value of the finite ring R(P) where P = 2^bits.
#[derive(Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Debug, Serialize, Deserialize, Hash)]
pub struct Id {
    value: u64,
    bits: u8,
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Id {
    /// Create an id, failing when `bits` is not in `[1, 64]` or `value` does not fit.
    pub fn new(value: u64, bits: u8) -> Result<Self> {
        if bits == 0 || bits > MAX_BITS {
            return Err(Error::InvalidBitLength(bits));
        }
        if u128::from(value) >= modulus(bits) {
            return Err(Error::InvalidId(value, bits));
        }
        Ok(Self { value, bits })
    }

    /// Zero of a ring of `bits` bits.
    pub fn zero(bits: u8) -> Result<Self> {
        Self::new(0, bits)
    }

    /// Raw value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Bit length of the ring this id belongs to.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Fail unless `other` lives on the same ring.
    pub fn ensure_same_ring(&self, other: &Id) -> Result<()> {
        if self.bits != other.bits {
            return Err(Error::BitLengthMismatch(self.bits, other.bits));
        }
        Ok(())
    }

    /// Clockwise distance from `self` to `to`.
    pub fn distance(&self, to: Id) -> u64 {
        wrap(i128::from(to.value) - i128::from(self.value), self.bits)
    }

    /// `self + 2^i`. Fails when `i` is not below the bit length.
    pub fn add_pow2(&self, i: u8) -> Result<Self> {
        Ok(Self {
            value: wrap(i128::from(self.value) + self.pow2(i)?, self.bits),
            bits: self.bits,
        })
    }

    /// `self - 2^i`. Fails when `i` is not below the bit length.
    pub fn sub_pow2(&self, i: u8) -> Result<Self> {
        Ok(Self {
            value: wrap(i128::from(self.value) - self.pow2(i)?, self.bits),
            bits: self.bits,
        })
    }

    fn pow2(&self, i: u8) -> Result<i128> {
        if i >= self.bits {
            return Err(Error::FingerIndexOutOfRange(i as usize, self.bits as usize));
        }
        Ok(1i128 << i)
    }

    /// Test whether `self` lies on the clockwise arc from `lower` to `upper`.
    ///
    /// When `lower == upper` the arc is the whole ring: every other id is inside, and `lower`
    /// itself is inside iff either bound is inclusive.
    pub fn is_within(
        &self,
        lower: Id,
        lower_inclusive: bool,
        upper: Id,
        upper_inclusive: bool,
    ) -> bool {
        let dx = u128::from(lower.distance(*self));
        if dx == 0 {
            return lower_inclusive || (lower == upper && upper_inclusive);
        }
        let d = match lower.distance(upper) {
            0 => modulus(self.bits),
            d => u128::from(d),
        };
        dx < d || (dx == d && upper_inclusive)
    }

    /// Observe `self` with `bias` as the zero point.
    pub fn bias(&self, bias: Id) -> BiasId {
        BiasId::new(bias, *self)
    }
}

fn modulus(bits: u8) -> u128 {
    1u128 << bits
}

fn wrap(v: i128, bits: u8) -> u64 {
    // Every result is below 2^64.
    v.rem_euclid(modulus(bits) as i128) as u64
}

/// The right hand side is taken modulo the ring of the left hand side.
impl Add for Id {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: wrap(i128::from(self.value) + i128::from(rhs.value), self.bits),
            bits: self.bits,
        }
    }
}

/// The right hand side is taken modulo the ring of the left hand side.
impl Sub for Id {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: wrap(i128::from(self.value) - i128::from(rhs.value), self.bits),
            bits: self.bits,
        }
    }
}

impl Neg for Id {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            value: wrap(-i128::from(self.value), self.bits),
            bits: self.bits,
        }
    }
}

/// An [Id] observed from a zero point `bias`, ordered by clockwise distance from it.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Hash)]
pub struct BiasId {
    /// the zero point.
    bias: Id,
    /// id minus bias.
    pos: Id,
}

impl BiasId {
    /// Wrap an id with given bias.
    pub fn new(bias: Id, id: Id) -> Self {
        Self {
            bias,
            pos: id - bias,
        }
    }

    /// Get the original id back.
    pub fn to_id(self) -> Id {
        self.pos + self.bias
    }

    /// Clockwise distance from the bias.
    pub fn pos(&self) -> Id {
        self.pos
    }
}

impl PartialOrd for BiasId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BiasId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if other.bias != self.bias {
            let rebased = BiasId::new(self.bias, other.to_id());
            self.pos.value.cmp(&rebased.pos.value)
        } else {
            self.pos.value.cmp(&other.pos.value)
        }
    }
}

impl From<BiasId> for Id {
    fn from(id: BiasId) -> Id {
        id.to_id()
    }
}

/// Ordering with an id reference.
pub trait SortRing {
    /// Sort clockwise starting from `id`.
    fn sort(&mut self, id: Id);
}

impl SortRing for Vec<Id> {
    fn sort(&mut self, id: Id) {
        self.sort_by_key(|x| x.bias(id));
    }
}
