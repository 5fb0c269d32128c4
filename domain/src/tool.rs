use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const CREDITS_PER_INTERVIEW_QUESTION: i32 = 1;
const INTERVIEW_QUESTION_COUNT: i32 = 4;

/// The closed set of billable tools. Every paid operation in the
/// platform maps to exactly one of these, and every variant has an
/// entry in the cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    JobMatch,
    CvCreation,
    CvAnalysis,
    InterviewSimulation,
}

impl Tool {
    pub const ALL: [Self; 4] = [
        Self::JobMatch,
        Self::CvCreation,
        Self::CvAnalysis,
        Self::InterviewSimulation,
    ];

    /// Credits charged per invocation. The interview simulator bills
    /// per generated question.
    pub fn cost(self) -> i32 {
        match self {
            Self::JobMatch | Self::CvCreation | Self::CvAnalysis => 1,
            Self::InterviewSimulation => CREDITS_PER_INTERVIEW_QUESTION * INTERVIEW_QUESTION_COUNT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::JobMatch => "job-match",
            Self::CvCreation => "cv-creation",
            Self::CvAnalysis => "cv-analysis",
            Self::InterviewSimulation => "interview-simulation",
        }
    }
}

impl Display for Tool {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job-match" => Ok(Self::JobMatch),
            "cv-creation" => Ok(Self::CvCreation),
            "cv-analysis" => Ok(Self::CvAnalysis),
            "interview-simulation" => Ok(Self::InterviewSimulation),
            other => Err(DomainError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_table_matches_pricing() {
        assert_eq!(Tool::JobMatch.cost(), 1);
        assert_eq!(Tool::CvCreation.cost(), 1);
        assert_eq!(Tool::CvAnalysis.cost(), 1);
        assert_eq!(Tool::InterviewSimulation.cost(), 4);
    }

    #[test]
    fn test_every_tool_has_a_positive_cost() {
        for tool in Tool::ALL {
            assert!(tool.cost() > 0, "{tool} must have a cost");
        }
    }

    #[test]
    fn test_round_trips_through_str() {
        for tool in Tool::ALL {
            assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert!("pdf-export".parse::<Tool>().is_err());
    }
}
