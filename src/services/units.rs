use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magnitude above which `Auto` reads a cash change as cents.
pub const AUTO_CENTS_THRESHOLD: f64 = 10_000.0;

/// Unit of settlement cash changes.
///
/// Producers disagree: some send dollars, some cents. `Auto` guesses from
/// magnitude and silently misreads large dollar amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashUnit {
    #[default]
    Dollars,
    Cents,
    Auto,
}

impl CashUnit {
    /// Convert a raw cash amount to dollars.
    pub fn to_dollars(self, raw: f64) -> f64 {
        match self {
            CashUnit::Dollars => raw,
            CashUnit::Cents => raw / 100.0,
            CashUnit::Auto if raw.abs() > AUTO_CENTS_THRESHOLD => raw / 100.0,
            CashUnit::Auto => raw,
        }
    }
}

impl FromStr for CashUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dollars" | "usd" => Ok(CashUnit::Dollars),
            "cents" => Ok(CashUnit::Cents),
            "auto" => Ok(CashUnit::Auto),
            other => Err(format!("unknown cash unit: {}", other)),
        }
    }
}

impl fmt::Display for CashUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashUnit::Dollars => write!(f, "dollars"),
            CashUnit::Cents => write!(f, "cents"),
            CashUnit::Auto => write!(f, "auto"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_passthrough() {
        assert_eq!(CashUnit::Dollars.to_dollars(25_000.0), 25_000.0);
    }

    #[test]
    fn test_cents() {
        assert_eq!(CashUnit::Cents.to_dollars(-1_250.0), -12.5);
    }

    #[test]
    fn test_auto_threshold() {
        assert_eq!(CashUnit::Auto.to_dollars(10_000.0), 10_000.0);
        assert_eq!(CashUnit::Auto.to_dollars(12_000.0), 120.0);
        assert_eq!(CashUnit::Auto.to_dollars(-50_000.0), -500.0);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Cents".parse::<CashUnit>(), Ok(CashUnit::Cents));
        assert!("pounds".parse::<CashUnit>().is_err());
        assert_eq!(CashUnit::Auto.to_string(), "auto");
    }
}
