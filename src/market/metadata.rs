use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized form. Unknown keys and unparseable dates are errors.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMetadata {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    label: Option<String>,
}

impl From<RawMetadata> for ParameterMetadata {
    fn from(raw: RawMetadata) -> Self {
        match (raw.date, raw.label) {
            (Some(date), Some(label)) => Self::Date { date, label },
            (Some(date), None) => Self::Date {
                date,
                label: date.to_string(),
            },
            (None, Some(label)) => Self::Label { label },
            (None, None) => Self::Empty {},
        }
    }
}

/// Describes one parameter of some parameterized market data.
///
/// `Empty` is the placeholder used when nothing is known about a parameter
/// beyond its position. A dated parameter without a label is labelled with
/// its date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawMetadata")]
pub enum ParameterMetadata {
    Date { date: NaiveDate, label: String },
    Label { label: String },
    Empty {},
}

impl ParameterMetadata {
    pub fn empty() -> Self {
        Self::Empty {}
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }

    pub fn date(date: NaiveDate, label: impl Into<String>) -> Self {
        Self::Date {
            date,
            label: label.into(),
        }
    }

    /// `n` placeholders.
    pub fn list_of_empty(n: usize) -> Vec<Self> {
        vec![Self::empty(); n]
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty {})
    }

    /// Human readable label; the placeholder's label is the empty string.
    pub fn label_str(&self) -> &str {
        match self {
            Self::Date { label, .. } | Self::Label { label } => label,
            Self::Empty {} => "",
        }
    }
}

impl Default for ParameterMetadata {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ParameterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_str())
    }
}
