//! Proposal input/output types and their numeric invariants.
//!
//! Field names serialize in camelCase so that documents stored by earlier
//! deployments of the service remain readable.
//!
//! [`ProposalOutput::validate`] is the single invariant gate: both the
//! deterministic fallback (which satisfies it by construction) and output
//! recovered from the model (which must be checked) go through the same
//! rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tolerance for comparing money amounts that may have passed through
/// floating-point JSON.
const AMOUNT_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The structured project brief supplied by the caller.
///
/// `duration` and `budget` are coarse bucket labels (see [`crate::prompt`])
/// and may be empty, which degrades to conservative defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalInput {
    pub project_title: String,
    pub client_name: String,
    pub project_description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub your_name: String,
    #[serde(default)]
    pub your_role: String,
    #[serde(default)]
    pub hourly_rate: f64,
}

impl ProposalInput {
    /// Validate caller-supplied input at the endpoint boundary.
    ///
    /// Title, client name, and description must be non-empty;
    /// the hourly rate must be non-negative and finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_title.trim().is_empty() {
            return Err(CoreError::Validation("projectTitle must not be empty".into()));
        }
        if self.client_name.trim().is_empty() {
            return Err(CoreError::Validation("clientName must not be empty".into()));
        }
        if self.project_description.trim().is_empty() {
            return Err(CoreError::Validation(
                "projectDescription must not be empty".into(),
            ));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(CoreError::Validation(
                "hourlyRate must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One line of the itemized estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateItem {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub amount: f64,
}

/// One phase of the proposed timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePhase {
    pub phase: String,
    pub duration: String,
    pub tasks: Vec<String>,
}

/// The generated proposal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalOutput {
    pub summary: String,
    pub scope: String,
    pub deliverables: Vec<String>,
    pub timeline: Vec<TimelinePhase>,
    pub estimate_items: Vec<EstimateItem>,
    pub total_amount: f64,
    pub notes: String,
}

impl ProposalOutput {
    /// Check the structural and numeric invariants of a proposal document.
    ///
    /// - `summary` and `scope` are non-empty.
    /// - `deliverables`, `timeline`, and `estimate_items` are non-empty.
    /// - For every item, `amount == quantity * unit_price`.
    /// - `total_amount` equals the sum of all item amounts.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.summary.trim().is_empty() {
            return Err(CoreError::Validation("summary must not be empty".into()));
        }
        if self.scope.trim().is_empty() {
            return Err(CoreError::Validation("scope must not be empty".into()));
        }
        if self.deliverables.is_empty() {
            return Err(CoreError::Validation("deliverables must not be empty".into()));
        }
        if self.timeline.is_empty() {
            return Err(CoreError::Validation("timeline must not be empty".into()));
        }
        if self.estimate_items.is_empty() {
            return Err(CoreError::Validation(
                "estimateItems must not be empty".into(),
            ));
        }

        let mut sum = 0.0;
        for item in &self.estimate_items {
            let expected = item.quantity * item.unit_price;
            if (item.amount - expected).abs() > AMOUNT_EPSILON {
                return Err(CoreError::Validation(format!(
                    "estimate item '{}' amount {} does not equal quantity * unitPrice ({})",
                    item.item, item.amount, expected
                )));
            }
            sum += item.amount;
        }

        if (self.total_amount - sum).abs() > AMOUNT_EPSILON {
            return Err(CoreError::Validation(format!(
                "totalAmount {} does not equal sum of item amounts ({sum})",
                self.total_amount
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProposalInput {
        ProposalInput {
            project_title: "ECサイトリニューアル".into(),
            client_name: "株式会社テスト".into(),
            project_description: "既存ECサイトの全面リニューアル".into(),
            tech_stack: vec!["React".into(), "PostgreSQL".into()],
            duration: "3ヶ月".into(),
            budget: "〜100万".into(),
            your_name: "山田太郎".into(),
            your_role: "フルスタックエンジニア".into(),
            hourly_rate: 5000.0,
        }
    }

    fn output() -> ProposalOutput {
        ProposalOutput {
            summary: "概要".into(),
            scope: "スコープ".into(),
            deliverables: vec!["納品物".into()],
            timeline: vec![TimelinePhase {
                phase: "開発".into(),
                duration: "4週間".into(),
                tasks: vec!["実装".into()],
            }],
            estimate_items: vec![EstimateItem {
                item: "開発".into(),
                quantity: 10.0,
                unit: "時間".into(),
                unit_price: 5000.0,
                amount: 50000.0,
            }],
            total_amount: 50000.0,
            notes: "備考".into(),
        }
    }

    // -- input validation --

    #[test]
    fn valid_input_accepted() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let mut i = input();
        i.project_title = "  ".into();
        assert!(i.validate().is_err());
    }

    #[test]
    fn empty_client_rejected() {
        let mut i = input();
        i.client_name = String::new();
        assert!(i.validate().is_err());
    }

    #[test]
    fn empty_description_rejected() {
        let mut i = input();
        i.project_description = String::new();
        assert!(i.validate().is_err());
    }

    #[test]
    fn negative_rate_rejected() {
        let mut i = input();
        i.hourly_rate = -1.0;
        assert!(i.validate().is_err());
    }

    #[test]
    fn nan_rate_rejected() {
        let mut i = input();
        i.hourly_rate = f64::NAN;
        assert!(i.validate().is_err());
    }

    #[test]
    fn empty_buckets_are_legal() {
        let mut i = input();
        i.duration = String::new();
        i.budget = String::new();
        assert!(i.validate().is_ok());
    }

    // -- output invariants --

    #[test]
    fn consistent_output_accepted() {
        assert!(output().validate().is_ok());
    }

    #[test]
    fn item_amount_mismatch_rejected() {
        let mut o = output();
        o.estimate_items[0].amount = 49000.0;
        assert!(o.validate().is_err());
    }

    #[test]
    fn total_mismatch_rejected() {
        let mut o = output();
        o.total_amount = 1.0;
        assert!(o.validate().is_err());
    }

    #[test]
    fn empty_estimate_items_rejected() {
        let mut o = output();
        o.estimate_items.clear();
        o.total_amount = 0.0;
        assert!(o.validate().is_err());
    }

    #[test]
    fn empty_summary_rejected() {
        let mut o = output();
        o.summary = String::new();
        assert!(o.validate().is_err());
    }

    #[test]
    fn rounding_noise_tolerated() {
        let mut o = output();
        o.estimate_items[0].amount = 50000.000001;
        o.total_amount = 50000.000001;
        assert!(o.validate().is_ok());
    }

    // -- wire format --

    #[test]
    fn input_deserializes_from_camel_case() {
        let json = r#"{
            "projectTitle": "t", "clientName": "c", "projectDescription": "d",
            "techStack": ["React"], "duration": "1ヶ月", "budget": "〜50万",
            "yourName": "n", "yourRole": "r", "hourlyRate": 5000
        }"#;
        let parsed: ProposalInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.project_title, "t");
        assert_eq!(parsed.hourly_rate, 5000.0);
    }

    #[test]
    fn optional_input_fields_default() {
        let json = r#"{"projectTitle": "t", "clientName": "c", "projectDescription": "d"}"#;
        let parsed: ProposalInput = serde_json::from_str(json).unwrap();
        assert!(parsed.tech_stack.is_empty());
        assert_eq!(parsed.duration, "");
        assert_eq!(parsed.hourly_rate, 0.0);
    }

    #[test]
    fn output_serializes_camel_case() {
        let json = serde_json::to_value(output()).unwrap();
        assert!(json.get("estimateItems").is_some());
        assert!(json.get("totalAmount").is_some());
        assert!(json["estimateItems"][0].get("unitPrice").is_some());
    }
}
