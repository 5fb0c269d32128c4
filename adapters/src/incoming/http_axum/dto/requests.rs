use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::matching::MatchQuery;
use domain::tool::Tool;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReserveCreditsRequest {
    pub tool: Tool,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RevertReservationRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Reason must be between 1 and 500 characters"
    ))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Position must be between 1 and 200 characters"
    ))]
    pub position: String,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Resume reference must be between 1 and 128 characters"
    ))]
    pub resume_reference: String,
}

impl MatchRequest {
    #[must_use]
    pub fn match_query(&self) -> MatchQuery {
        MatchQuery::new(self.position.clone(), self.resume_reference.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_request_rejects_empty_position() {
        let request = MatchRequest {
            position: String::new(),
            resume_reference: "resume-1".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reserve_request_parses_kebab_case_tools() {
        let request: ReserveCreditsRequest = serde_json::from_str(
            r#"{"tool": "interview-simulation", "description": "mock interview"}"#,
        )
        .expect("valid request json");
        assert_eq!(request.tool, Tool::InterviewSimulation);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_tool_fails_deserialization() {
        let result: Result<ReserveCreditsRequest, _> =
            serde_json::from_str(r#"{"tool": "pdf-export", "description": ""}"#);
        assert!(result.is_err());
    }
}
