use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// Named grading tables. The two presets are independent and do not agree
/// on where their boundaries fall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradingScale {
    /// Six-notch credit-style scale, AAA down to B.
    #[default]
    Institutional,
    /// Four-step investor scale, Excellent down to Poor.
    Basic,
}

/// Presentation colour band for a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeTone {
    Positive,
    Neutral,
    Caution,
    Negative,
}

/// Ordinal quality label for a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealGrade {
    pub scale: GradingScale,
    /// Short code, e.g. `AAA` or `Excellent`
    pub rating: String,
    pub label: String,
    pub description: String,
    pub tone: GradeTone,
    /// Position within the scale; higher is better, lowest tier is 0
    pub rank: u8,
}

/// One row of a threshold table: applies when cash-on-cash >= `min`.
#[derive(Debug, Clone, Copy)]
pub struct GradeBand {
    pub min: Option<Percent>,
    pub rating: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub tone: GradeTone,
}

const INSTITUTIONAL_BANDS: [GradeBand; 6] = [
    GradeBand {
        min: Some(dec!(15)),
        rating: "AAA",
        label: "Institutional Grade",
        description: "Exceptional leveraged yield suitable for institutional capital",
        tone: GradeTone::Positive,
    },
    GradeBand {
        min: Some(dec!(12)),
        rating: "AA",
        label: "Premium Asset",
        description: "Well above market cash yield",
        tone: GradeTone::Positive,
    },
    GradeBand {
        min: Some(dec!(9)),
        rating: "A",
        label: "Strong Performance",
        description: "Comfortably above market cash yield",
        tone: GradeTone::Neutral,
    },
    GradeBand {
        min: Some(dec!(6)),
        rating: "BBB",
        label: "Market Rate",
        description: "Cash yield in line with the market",
        tone: GradeTone::Neutral,
    },
    GradeBand {
        min: Some(dec!(3)),
        rating: "BB",
        label: "Below Market",
        description: "Thin cash yield; relies on appreciation",
        tone: GradeTone::Caution,
    },
    GradeBand {
        min: None,
        rating: "B",
        label: "High Risk",
        description: "Little or negative cash yield on invested capital",
        tone: GradeTone::Negative,
    },
];

const BASIC_BANDS: [GradeBand; 4] = [
    GradeBand {
        min: Some(dec!(12)),
        rating: "Excellent",
        label: "Excellent",
        description: "Strong cash-on-cash return",
        tone: GradeTone::Positive,
    },
    GradeBand {
        min: Some(dec!(8)),
        rating: "Good",
        label: "Good",
        description: "Healthy cash-on-cash return",
        tone: GradeTone::Neutral,
    },
    GradeBand {
        min: Some(Decimal::ZERO),
        rating: "Fair",
        label: "Fair",
        description: "Cash flow positive with a modest return",
        tone: GradeTone::Caution,
    },
    GradeBand {
        min: None,
        rating: "Poor",
        label: "Poor",
        description: "Cash flow negative",
        tone: GradeTone::Negative,
    },
];

impl GradingScale {
    /// Threshold table, highest band first. The last band has no minimum.
    pub fn bands(&self) -> &'static [GradeBand] {
        match self {
            GradingScale::Institutional => &INSTITUTIONAL_BANDS,
            GradingScale::Basic => &BASIC_BANDS,
        }
    }
}

/// Map a cash-on-cash return (percent) onto the chosen scale.
/// Evaluated highest band first; the first band whose minimum is met wins.
pub fn grade_deal(cash_on_cash_return: Percent, scale: GradingScale) -> DealGrade {
    let bands = scale.bands();
    let index = bands
        .iter()
        .position(|band| band.min.map_or(true, |min| cash_on_cash_return >= min))
        .unwrap_or(bands.len() - 1);
    let band = &bands[index];

    DealGrade {
        scale,
        rating: band.rating.to_string(),
        label: band.label.to_string(),
        description: band.description.to_string(),
        tone: band.tone,
        rank: (bands.len() - 1 - index) as u8,
    }
}
