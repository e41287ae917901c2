//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A match always has exactly two participants: `Host` and `Away`.
//!
//! ## SeatMap
//!
//! Per-seat data storage with O(1) access, indexable by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two match participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Host,
    Away,
}

impl Seat {
    /// Both seats, host first.
    pub const ALL: [Seat; 2] = [Seat::Host, Seat::Away];

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Seat {
        match self {
            Seat::Host => Seat::Away,
            Seat::Away => Seat::Host,
        }
    }

    /// Index into per-seat storage (host = 0, away = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::Host => 0,
            Seat::Away => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::Host => write!(f, "host"),
            Seat::Away => write!(f, "away"),
        }
    }
}

/// Per-seat data storage.
///
/// ## Example
///
/// ```
/// use duelcore::core::{Seat, SeatMap};
///
/// let mut life: SeatMap<i32> = SeatMap::with_value(8000);
/// life[Seat::Away] -= 500;
///
/// assert_eq!(life[Seat::Host], 8000);
/// assert_eq!(life[Seat::Away], 7500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::Host), factory(Seat::Away)],
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs, host first.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::ALL.iter().map(move |&s| (s, self.get(s)))
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
