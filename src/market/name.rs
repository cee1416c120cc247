use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of parameterized market data a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDataKind {
    Curve,
    Surface,
    Other,
}

impl Default for MarketDataKind {
    fn default() -> Self {
        Self::Curve
    }
}

/// Identifies the parameterized data a sensitivity was computed against.
///
/// Names order by kind first and then by the name itself, so all curve
/// sensitivities sort ahead of surface sensitivities.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::market::name::MarketDataName;
///
/// let gbp = MarketDataName::curve("GBP-Discount");
/// let usd = MarketDataName::curve("USD-Discount");
/// let vols = MarketDataName::surface("GBP-Vol");
/// assert!(gbp < usd);
/// assert!(usd < vols);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketDataName {
    #[serde(default)]
    kind: MarketDataKind,
    name: String,
}

impl MarketDataName {
    pub fn new(kind: MarketDataKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn curve(name: impl Into<String>) -> Self {
        Self::new(MarketDataKind::Curve, name)
    }

    pub fn surface(name: impl Into<String>) -> Self {
        Self::new(MarketDataKind::Surface, name)
    }

    pub fn kind(&self) -> MarketDataKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MarketDataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for MarketDataName {
    fn from(s: &str) -> Self {
        Self::curve(s)
    }
}
