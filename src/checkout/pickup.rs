//! Pickup time selection.

use jiff::{Timestamp, Zoned};
use thiserror::Error;

/// Granularity of the pickup time picker.
pub const PICKUP_MINUTE_STEP: i8 = 15;

#[derive(Debug, Error)]
pub enum PickupSlotError {
    #[error("pickup hour {0} is out of range")]
    InvalidHour(i8),

    #[error("pickup minute {0} is not aligned to {PICKUP_MINUTE_STEP} minutes")]
    UnalignedMinute(i8),

    #[error("pickup time is not representable on this date")]
    Unrepresentable(#[source] jiff::Error),
}

/// A same-day pickup time: an hour and a 15-minute-aligned minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupSlot {
    hour: i8,
    minute: i8,
}

impl PickupSlot {
    /// Validate an hour/minute pair from the picker.
    ///
    /// # Errors
    ///
    /// Returns [`PickupSlotError::InvalidHour`] for hours outside 0–23 and
    /// [`PickupSlotError::UnalignedMinute`] for minutes that are not a
    /// multiple of 15.
    pub fn new(hour: i8, minute: i8) -> Result<Self, PickupSlotError> {
        if !(0..=23).contains(&hour) {
            return Err(PickupSlotError::InvalidHour(hour));
        }

        if !(0..60).contains(&minute) || minute % PICKUP_MINUTE_STEP != 0 {
            return Err(PickupSlotError::UnalignedMinute(minute));
        }

        Ok(Self { hour, minute })
    }

    #[must_use]
    pub fn hour(&self) -> i8 {
        self.hour
    }

    #[must_use]
    pub fn minute(&self) -> i8 {
        self.minute
    }

    /// Combine the slot with today's date in the caller's zone into an
    /// absolute instant.
    ///
    /// # Errors
    ///
    /// Returns [`PickupSlotError::Unrepresentable`] when the wall-clock time
    /// does not exist on that date (for example inside a DST gap).
    pub fn resolve(&self, now: &Zoned) -> Result<Timestamp, PickupSlotError> {
        let pickup = now
            .with()
            .hour(self.hour)
            .minute(self.minute)
            .second(0)
            .subsec_nanosecond(0)
            .build()
            .map_err(PickupSlotError::Unrepresentable)?;

        Ok(pickup.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn morning() -> Zoned {
        "2025-04-24T09:12:33+08:00[+08:00]"
            .parse()
            .expect("fixed test time should parse")
    }

    #[test]
    fn aligned_slot_is_accepted() -> TestResult {
        let slot = PickupSlot::new(12, 45)?;

        assert_eq!(slot.hour(), 12);
        assert_eq!(slot.minute(), 45);

        Ok(())
    }

    #[test]
    fn unaligned_minute_is_rejected() {
        let result = PickupSlot::new(12, 50);

        assert!(
            matches!(result, Err(PickupSlotError::UnalignedMinute(50))),
            "expected UnalignedMinute, got {result:?}"
        );
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let result = PickupSlot::new(24, 0);

        assert!(
            matches!(result, Err(PickupSlotError::InvalidHour(24))),
            "expected InvalidHour, got {result:?}"
        );
    }

    #[test]
    fn resolve_combines_slot_with_todays_date() -> TestResult {
        let slot = PickupSlot::new(12, 45)?;

        let pickup = slot.resolve(&morning())?;

        // 12:45 at +08:00 is 04:45 UTC.
        assert_eq!(pickup, "2025-04-24T04:45:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn resolve_drops_seconds_from_now() -> TestResult {
        let slot = PickupSlot::new(9, 0)?;

        let pickup = slot.resolve(&morning())?;

        assert_eq!(pickup, "2025-04-24T01:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }
}
