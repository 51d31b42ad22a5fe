//! Vessel reference data and the closed organization filter.

use serde::{Deserialize, Serialize};

use super::report::Mmsi;

/// Organization code of the primary fleet.
pub const ORG_PRIMARY: &str = "QF2";

/// Organizations making up the search-and-rescue coalition.
pub const SAR_ORGS: [&str; 3] = ["QF2", "AVCG", "VMR"];

/// Slow-changing descriptive data for a vessel, looked up per MMSI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselInfo {
    pub mmsi: Mmsi,
    pub name: String,
    pub org: String,
    pub fleet: String,
    pub color: String,
}

impl VesselInfo {
    /// Synthesized entry for a vessel absent from the registry. A join miss
    /// is recovered here, never surfaced as an error.
    pub fn fallback(mmsi: Mmsi) -> Self {
        VesselInfo {
            mmsi,
            name: mmsi.to_string(),
            org: "Other".to_string(),
            fleet: "Other".to_string(),
            color: "gray".to_string(),
        }
    }
}

/// The closed set of supported organization filters.
///
/// Any other code (including "ALL") applies no filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrgFilter {
    /// Primary fleet only.
    Primary,
    /// The search-and-rescue coalition (QF2, AVCG, VMR).
    Sar,
}

impl OrgFilter {
    /// Resolve a query code into a filter. Unrecognized codes mean
    /// "no filter", matching the feed's behavior.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "QF2" => Some(OrgFilter::Primary),
            "SAR" => Some(OrgFilter::Sar),
            _ => None,
        }
    }

    /// The query code this filter answers to.
    pub fn code(&self) -> &'static str {
        match self {
            OrgFilter::Primary => "QF2",
            OrgFilter::Sar => "SAR",
        }
    }

    pub fn matches(&self, info: &VesselInfo) -> bool {
        match self {
            OrgFilter::Primary => info.org == ORG_PRIMARY,
            OrgFilter::Sar => SAR_ORGS.contains(&info.org.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_info() {
        let info = VesselInfo::fallback(Mmsi::new(503_000_001));
        assert_eq!(info.name, "503000001");
        assert_eq!(info.org, "Other");
        assert_eq!(info.fleet, "Other");
        assert_eq!(info.color, "gray");
    }

    #[test]
    fn test_org_filter_parse() {
        assert_eq!(OrgFilter::parse("QF2"), Some(OrgFilter::Primary));
        assert_eq!(OrgFilter::parse("SAR"), Some(OrgFilter::Sar));
        assert_eq!(OrgFilter::parse("ALL"), None);
        assert_eq!(OrgFilter::parse("qf2"), None);
    }

    #[test]
    fn test_org_filter_matches() {
        let mut info = VesselInfo::fallback(Mmsi::new(503_000_001));

        info.org = "QF2".to_string();
        assert!(OrgFilter::Primary.matches(&info));
        assert!(OrgFilter::Sar.matches(&info));

        info.org = "VMR".to_string();
        assert!(!OrgFilter::Primary.matches(&info));
        assert!(OrgFilter::Sar.matches(&info));

        info.org = "Other".to_string();
        assert!(!OrgFilter::Primary.matches(&info));
        assert!(!OrgFilter::Sar.matches(&info));
    }
}
