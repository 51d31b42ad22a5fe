use serde::*;

/// Epoch-seconds instant used for binning and series arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Truncate down to the start of the enclosing time bin.
    /// Bins are `bin_minutes` wide and aligned to the epoch.
    pub fn truncate_to_bin(&self, bin_minutes: u32) -> Self {
        let width = i64::from(bin_minutes.max(1)) * 60;
        Self(self.0 - self.0.rem_euclid(width))
    }

    /// Convert to chrono DateTime<Utc>.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(self.0, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt.timestamp())
    }
}

impl From<i64> for UnixSeconds {
    fn from(v: i64) -> Self {
        UnixSeconds::new(v)
    }
}

/// Round a value to a fixed number of decimal places.
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
