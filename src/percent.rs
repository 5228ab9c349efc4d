//! # A percentage unit for motor settings (speed, speed scale, zeropoint)
//!
//! The board divides these values by 100 before applying them, so one byte
//! on the wire carries a whole percent.

use std::fmt;

/// A whole percentage as sent to the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent {
    value: u8,
}

impl Percent {
    pub fn from_percent(pc: u8) -> Percent {
        Percent { value: pc }
    }

    pub fn as_percent(&self) -> u8 {
        self.value
    }

    /// The value the board ends up applying, e.g. 0.5 for 50%.
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.value) / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}


// End of file
