//! Bit-packed calendar timestamps
//!
//! The protocol never ships raw Unix timestamps for calendar-facing
//! fields; it ships a bit-packed calendar structure in one u32:
//!
//! ```text
//! bits  0..6   minute       (0-59)
//! bits  6..11  hour         (0-23)
//! bits 11..14  weekday      (0-6, Sunday = 0)
//! bits 14..20  day of month (0-30, i.e. day - 1)
//! bits 20..24  month        (0-11)
//! bits 24..32  year offset  (year - 2000)
//! ```
//!
//! Seconds are not representable; packing rounds down to the minute.
//! Representable years are 2000 through 2255.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use wowsrv_core::{Result, WireError};

/// Base year of the packed encoding
const EPOCH_YEAR: i32 = 2000;

/// A calendar timestamp in its wire form.
///
/// Holds the packed u32 verbatim; field accessors unpack on demand.
/// Construct from a Unix timestamp with [`PackedTime::from_unix`] or
/// from wire bytes via [`crate::reader::BitReader::read_packed_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedTime(u32);

impl PackedTime {
    /// Pack a Unix timestamp (UTC)
    ///
    /// Fails with [`WireError::TimeOutOfRange`] when the timestamp falls
    /// outside the representable years.
    pub fn from_unix(unix: i64) -> Result<Self> {
        let dt: DateTime<Utc> = Utc
            .timestamp_opt(unix, 0)
            .single()
            .ok_or(WireError::TimeOutOfRange(unix))?;
        let year = dt.year();
        if !(EPOCH_YEAR..EPOCH_YEAR + 256).contains(&year) {
            return Err(WireError::TimeOutOfRange(unix));
        }
        let packed = dt.minute()
            | dt.hour() << 6
            | dt.weekday().num_days_from_sunday() << 11
            | (dt.day() - 1) << 14
            | dt.month0() << 20
            | ((year - EPOCH_YEAR) as u32) << 24;
        Ok(Self(packed))
    }

    /// Wrap a packed value taken verbatim from the wire
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub const fn minute(&self) -> u32 {
        self.0 & 0x3F
    }

    pub const fn hour(&self) -> u32 {
        (self.0 >> 6) & 0x1F
    }

    /// Day of week, Sunday = 0
    pub const fn weekday(&self) -> u32 {
        (self.0 >> 11) & 0x7
    }

    /// Day of month, 1-based
    pub const fn day(&self) -> u32 {
        ((self.0 >> 14) & 0x3F) + 1
    }

    /// Month, 1-based
    pub const fn month(&self) -> u32 {
        ((self.0 >> 20) & 0xF) + 1
    }

    pub const fn year(&self) -> i32 {
        (self.0 >> 24) as i32 + EPOCH_YEAR
    }

    /// Reconstruct the Unix timestamp (seconds are lost in packing)
    ///
    /// Fails when the wire carried impossible calendar fields, e.g. a
    /// month of 13 or February 30.
    pub fn to_unix(&self) -> Result<i64> {
        Utc.with_ymd_and_hms(self.year(), self.month(), self.day(), self.hour(), self.minute(), 0)
            .single()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| {
                WireError::Malformed(format!(
                    "impossible packed time {:#010x} ({}-{:02}-{:02} {:02}:{:02})",
                    self.0,
                    self.year(),
                    self.month(),
                    self.day(),
                    self.hour(),
                    self.minute()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_date_fields() {
        // 2010-11-23 14:05:00 UTC was a Tuesday
        let t = PackedTime::from_unix(1_290_521_100).unwrap();
        assert_eq!(t.year(), 2010);
        assert_eq!(t.month(), 11);
        assert_eq!(t.day(), 23);
        assert_eq!(t.weekday(), 2);
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 5);
    }

    #[test]
    fn test_roundtrip_minute_precision() {
        let unix = 1_290_521_100; // already on a minute boundary
        let t = PackedTime::from_unix(unix).unwrap();
        assert_eq!(t.to_unix().unwrap(), unix);
    }

    #[test]
    fn test_seconds_round_down() {
        let t = PackedTime::from_unix(1_290_521_100 + 42).unwrap();
        assert_eq!(t.to_unix().unwrap(), 1_290_521_100);
    }

    #[test]
    fn test_pre_epoch_rejected() {
        // 1999-12-31
        assert!(matches!(
            PackedTime::from_unix(946_598_400),
            Err(WireError::TimeOutOfRange(_))
        ));
    }

    #[test]
    fn test_impossible_wire_fields_rejected() {
        // month0 = 13
        let raw = 13u32 << 20;
        assert!(PackedTime::from_u32(raw).to_unix().is_err());
    }

    #[test]
    fn test_wire_value_preserved_verbatim() {
        let raw = 0x0AB7_39C5;
        assert_eq!(PackedTime::from_u32(raw).as_u32(), raw);
    }
}
