//! Analysis types
//!
//! The fixed menu of analyses a transcript can be wrapped with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Which prompt template is applied to a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Summary,
    Analysis,
    Questions,
    Translation,
    Mindmap,
    HistoricalVerification,
    TrendAnalysis,
    FuturePrediction,
    IndustryInsight,
    FactCheck,
}

impl AnalysisType {
    /// Every analysis type, in menu order.
    pub const ALL: [AnalysisType; 10] = [
        AnalysisType::Summary,
        AnalysisType::Analysis,
        AnalysisType::Questions,
        AnalysisType::Translation,
        AnalysisType::Mindmap,
        AnalysisType::HistoricalVerification,
        AnalysisType::TrendAnalysis,
        AnalysisType::FuturePrediction,
        AnalysisType::IndustryInsight,
        AnalysisType::FactCheck,
    ];

    /// Stable machine name, used in cache keys and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Summary => "summary",
            AnalysisType::Analysis => "analysis",
            AnalysisType::Questions => "questions",
            AnalysisType::Translation => "translation",
            AnalysisType::Mindmap => "mindmap",
            AnalysisType::HistoricalVerification => "historical_verification",
            AnalysisType::TrendAnalysis => "trend_analysis",
            AnalysisType::FuturePrediction => "future_prediction",
            AnalysisType::IndustryInsight => "industry_insight",
            AnalysisType::FactCheck => "fact_check",
        }
    }

    /// Human-readable menu label.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisType::Summary => "Smart summary",
            AnalysisType::Analysis => "In-depth analysis",
            AnalysisType::Questions => "Study questions",
            AnalysisType::Translation => "Polished translation",
            AnalysisType::Mindmap => "Mind map outline",
            AnalysisType::HistoricalVerification => "Historical data check",
            AnalysisType::TrendAnalysis => "Trend analysis",
            AnalysisType::FuturePrediction => "Future scenarios",
            AnalysisType::IndustryInsight => "Industry insight",
            AnalysisType::FactCheck => "Fact-check report",
        }
    }

    /// One-line description shown under the menu label.
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisType::Summary => {
                "Key points ranked by importance, practical value and a quality rating"
            }
            AnalysisType::Analysis => {
                "Argument structure, logical soundness and comparison with other views"
            }
            AnalysisType::Questions => "Layered questions from basic recall to creative extension",
            AnalysisType::Translation => "Language clean-up and translation with a glossary",
            AnalysisType::Mindmap => "Hierarchical outline ready to draw as a mind map",
            AnalysisType::HistoricalVerification => {
                "Checks claims against historical data and rates credibility"
            }
            AnalysisType::TrendAnalysis => "Identifies trends with opportunities and risks",
            AnalysisType::FuturePrediction => "Scenario modelling with a forecast timeline",
            AnalysisType::IndustryInsight => "Market position, business model and outlook",
            AnalysisType::FactCheck => "Classifies claims and grades the supporting evidence",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ExtractError::UnsupportedType(s.to_string()))
    }
}
