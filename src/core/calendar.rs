//! Calendar system for sprint time
//!
//! A tick is one working slot (an hour by default) inside a working day.
//! Days and slots are both 1-based.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SprintError};

/// A single point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick {
    pub day: u32,
    pub slot: u32,
}

impl Tick {
    pub fn new(day: u32, slot: u32, ticks_per_day: u32) -> Result<Self> {
        if day < 1 || slot < 1 || slot > ticks_per_day {
            return Err(SprintError::InvalidTick {
                day,
                slot,
                ticks_per_day,
            });
        }
        Ok(Self { day, slot })
    }

    /// Human-readable label, e.g. "Day 2, Hour 5"
    pub fn label(&self) -> String {
        format!("Day {}, Hour {}", self.day, self.slot)
    }

    /// Number of ticks elapsed since the start of the run, this one included
    pub fn elapsed(&self, ticks_per_day: u32) -> u32 {
        self.day.saturating_sub(1) * ticks_per_day + self.slot
    }
}

/// Yields every tick of a bounded run in day-major order
#[derive(Debug, Clone)]
pub struct Calendar {
    ticks_per_day: u32,
    max_days: u32,
    day: u32,
    slot: u32,
}

impl Calendar {
    pub fn new(ticks_per_day: u32, max_days: u32) -> Self {
        Self {
            ticks_per_day,
            max_days,
            day: 1,
            slot: 1,
        }
    }

    pub fn ticks_per_day(&self) -> u32 {
        self.ticks_per_day
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Upper bound on the number of ticks this calendar can produce
    pub fn total_ticks(&self) -> u64 {
        self.max_days as u64 * self.ticks_per_day as u64
    }
}

impl Iterator for Calendar {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.ticks_per_day == 0 || self.day > self.max_days {
            return None;
        }

        let tick = Tick {
            day: self.day,
            slot: self.slot,
        };

        self.slot += 1;
        if self.slot > self.ticks_per_day {
            self.slot = 1;
            self.day += 1;
        }

        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_label() {
        let tick = Tick::new(1, 3, 8).unwrap();
        assert_eq!(tick.label(), "Day 1, Hour 3");
    }

    #[test]
    fn test_tick_elapsed() {
        assert_eq!(Tick::new(1, 1, 8).unwrap().elapsed(8), 1);
        assert_eq!(Tick::new(2, 4, 8).unwrap().elapsed(8), 12);
    }

    #[test]
    fn test_elapsed_on_unchecked_day_zero() {
        let tick = Tick { day: 0, slot: 3 };
        assert_eq!(tick.elapsed(8), 3);
    }

    #[test]
    fn test_tick_rejects_out_of_range() {
        assert!(matches!(
            Tick::new(0, 1, 8),
            Err(SprintError::InvalidTick { day: 0, .. })
        ));
        assert!(Tick::new(1, 0, 8).is_err());
        assert!(Tick::new(1, 9, 8).is_err());
        assert!(Tick::new(1, 8, 8).is_ok());
    }

    #[test]
    fn test_tick_ordering() {
        let a = Tick::new(1, 8, 8).unwrap();
        let b = Tick::new(2, 1, 8).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_calendar_yields_every_tick() {
        let ticks: Vec<Tick> = Calendar::new(4, 3).collect();
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0], Tick { day: 1, slot: 1 });
        assert_eq!(ticks[3], Tick { day: 1, slot: 4 });
        assert_eq!(ticks[4], Tick { day: 2, slot: 1 });
        assert_eq!(ticks[11], Tick { day: 3, slot: 4 });
    }

    #[test]
    fn test_calendar_zero_days() {
        assert_eq!(Calendar::new(8, 0).count(), 0);
        assert_eq!(Calendar::new(8, 0).total_ticks(), 0);
    }

    #[test]
    fn test_calendar_elapsed_matches_position() {
        for (i, tick) in Calendar::new(8, 2).enumerate() {
            assert_eq!(tick.elapsed(8) as usize, i + 1);
        }
    }
}
