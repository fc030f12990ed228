//! Score to label mapping.

use serde::Serialize;

/// Human-readable quality band. Bands are lower-bound inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum QualityLabel {
    /// Score below 40.
    #[serde(rename = "Very Poor")]
    VeryPoor,
    /// Score 40-59.
    Poor,
    /// Score 60-74.
    Acceptable,
    /// Score 75-89.
    Good,
    /// Score 90 and above.
    Excellent,
}

/// Colour family used when rendering a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTone {
    /// Excellent.
    Green,
    /// Good.
    Blue,
    /// Acceptable.
    Yellow,
    /// Poor.
    Orange,
    /// Very poor.
    Red,
}

impl QualityLabel {
    /// Classify a score. Total over every `u8`; scores above 100 are Excellent.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => QualityLabel::Excellent,
            75..=89 => QualityLabel::Good,
            60..=74 => QualityLabel::Acceptable,
            40..=59 => QualityLabel::Poor,
            _ => QualityLabel::VeryPoor,
        }
    }

    /// Label text.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Good => "Good",
            QualityLabel::Acceptable => "Acceptable",
            QualityLabel::Poor => "Poor",
            QualityLabel::VeryPoor => "Very Poor",
        }
    }

    /// Display tone for UI layers.
    pub fn tone(&self) -> LabelTone {
        match self {
            QualityLabel::Excellent => LabelTone::Green,
            QualityLabel::Good => LabelTone::Blue,
            QualityLabel::Acceptable => LabelTone::Yellow,
            QualityLabel::Poor => LabelTone::Orange,
            QualityLabel::VeryPoor => LabelTone::Red,
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
