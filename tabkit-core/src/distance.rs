//! Metric distance split into meters, centimeters and millimeters

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::error::{Error, Result};

const MM_PER_CM: i64 = 10;
const CM_PER_M: i64 = 100;
const MM_PER_M: i64 = MM_PER_CM * CM_PER_M;

/// A non-negative distance kept in normalized form
///
/// After construction centimeters are below 100 and millimeters below 10.
/// Excess millimeters carry into centimeters, excess centimeters into
/// meters, and the total length in millimeters is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Distance {
    meters: i64,
    centimeters: i64,
    millimeters: i64,
}

impl Distance {
    /// Create a normalized distance
    ///
    /// Any negative component is rejected.
    pub fn new(meters: i64, centimeters: i64, millimeters: i64) -> Result<Self> {
        if meters < 0 || centimeters < 0 || millimeters < 0 {
            return Err(Error::Config(
                "meters, centimeters and millimeters must be non-negative integers".to_string(),
            ));
        }

        let centimeters = centimeters
            .checked_add(millimeters / MM_PER_CM)
            .ok_or_else(overflow)?;
        let meters = meters
            .checked_add(centimeters / CM_PER_M)
            .ok_or_else(overflow)?;

        let distance = Self {
            meters,
            centimeters: centimeters % CM_PER_M,
            millimeters: millimeters % MM_PER_CM,
        };
        distance.checked_total().ok_or_else(overflow)?;

        Ok(distance)
    }

    /// Create a distance from a length in millimeters
    pub fn from_millimeters(total: i64) -> Result<Self> {
        Self::new(0, 0, total)
    }

    /// Whole meters
    pub fn meters(&self) -> i64 {
        self.meters
    }

    /// Centimeters, below 100
    pub fn centimeters(&self) -> i64 {
        self.centimeters
    }

    /// Millimeters, below 10
    pub fn millimeters(&self) -> i64 {
        self.millimeters
    }

    /// Total length in millimeters
    pub fn total_millimeters(&self) -> i64 {
        self.meters * MM_PER_M + self.centimeters * MM_PER_CM + self.millimeters
    }

    fn checked_total(&self) -> Option<i64> {
        self.meters
            .checked_mul(MM_PER_M)?
            .checked_add(self.centimeters * MM_PER_CM + self.millimeters)
    }

    /// Replace the meters component and renormalize
    pub fn set_meters(&mut self, meters: i64) -> Result<()> {
        *self = Self::new(meters, self.centimeters, self.millimeters)?;
        Ok(())
    }

    /// Replace the centimeters component and renormalize
    pub fn set_centimeters(&mut self, centimeters: i64) -> Result<()> {
        *self = Self::new(self.meters, centimeters, self.millimeters)?;
        Ok(())
    }

    /// Replace the millimeters component and renormalize
    pub fn set_millimeters(&mut self, millimeters: i64) -> Result<()> {
        *self = Self::new(self.meters, self.centimeters, millimeters)?;
        Ok(())
    }

    /// Sum of two distances
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Distance) -> Result<Distance> {
        let total = self
            .total_millimeters()
            .checked_add(other.total_millimeters())
            .ok_or_else(overflow)?;
        Self::from_millimeters(total)
    }

    /// Add `other` to this distance
    pub fn add_in_place(&mut self, other: Distance) -> Result<()> {
        *self = Distance::add(*self, other)?;
        Ok(())
    }

    /// Difference of two distances
    ///
    /// Fails if `other` is longer than `self`.
    pub fn subtract(self, other: Distance) -> Result<Distance> {
        let total = self.total_millimeters() - other.total_millimeters();
        if total < 0 {
            return Err(Error::NegativeResult("Resulting distance cannot be negative".to_string()));
        }
        Self::from_millimeters(total)
    }

    /// Subtract `other` from this distance
    ///
    /// On failure the distance is left unchanged.
    pub fn subtract_in_place(&mut self, other: Distance) -> Result<()> {
        *self = self.subtract(other)?;
        Ok(())
    }
}

fn overflow() -> Error {
    Error::Config("distance is too large to represent".to_string())
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}cm {}mm", self.meters, self.centimeters, self.millimeters)
    }
}

impl Add for Distance {
    type Output = Result<Distance>;

    fn add(self, other: Distance) -> Result<Distance> {
        Distance::add(self, other)
    }
}

impl AddAssign for Distance {
    /// Adds in place
    ///
    /// # Panics
    ///
    /// Panics if the sum does not fit in `i64` millimeters.
    fn add_assign(&mut self, other: Distance) {
        if let Err(err) = self.add_in_place(other) {
            panic!("{err}");
        }
    }
}
