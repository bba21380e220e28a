//! Prompt construction for the proposal generation call.
//!
//! Maps the coarse duration/budget buckets to numeric hints, derives a
//! work-hour budget, and renders the system/user instruction pair sent to
//! the text-generation provider. Pure functions of the input.

use crate::proposal::ProposalInput;

// ---------------------------------------------------------------------------
// Bucket labels
// ---------------------------------------------------------------------------

/// Duration bucket labels offered by the intake form.
pub const DURATION_BUCKETS: [&str; 5] = ["1週間", "1ヶ月", "3ヶ月", "6ヶ月", "それ以上"];

/// Budget bucket labels offered by the intake form.
pub const BUDGET_BUCKETS: [&str; 5] = ["〜30万", "〜50万", "〜100万", "100万以上", "応相談"];

/// Business days assumed when the duration bucket is unset or unrecognized.
const DEFAULT_DURATION_DAYS: i64 = 60;

/// Working hours assumed per business day when deriving effort from duration.
const HOURS_PER_DAY: i64 = 6;

// ---------------------------------------------------------------------------
// Bucket mappings
// ---------------------------------------------------------------------------

/// Upper bound in yen for a budget bucket. `応相談` and unset map to 0,
/// meaning "no numeric bound available".
pub fn budget_upper_bound(budget: &str) -> i64 {
    match budget {
        "〜30万" => 300_000,
        "〜50万" => 500_000,
        "〜100万" => 1_000_000,
        "100万以上" => 2_000_000,
        _ => 0,
    }
}

/// Estimated business-day count for a duration bucket.
pub fn duration_business_days(duration: &str) -> i64 {
    match duration {
        "1週間" => 5,
        "1ヶ月" => 20,
        "3ヶ月" => 60,
        "6ヶ月" => 120,
        "それ以上" => 180,
        _ => DEFAULT_DURATION_DAYS,
    }
}

// ---------------------------------------------------------------------------
// Work budget
// ---------------------------------------------------------------------------

/// A derived effort ceiling, and whether it came from the stated budget or
/// was inferred from the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkBudget {
    /// `max_hours = floor(budget_bound / hourly_rate)`.
    FromBudget { max_hours: i64 },
    /// `max_hours = business_days * HOURS_PER_DAY`.
    FromDuration { max_hours: i64 },
}

impl WorkBudget {
    pub fn max_hours(self) -> i64 {
        match self {
            WorkBudget::FromBudget { max_hours } | WorkBudget::FromDuration { max_hours } => {
                max_hours
            }
        }
    }
}

/// Derive the work-hour budget hint for an input.
///
/// When both a numeric budget bound and a positive hourly rate are known,
/// the ceiling is what the budget can buy. Otherwise it falls back to a
/// duration-based estimate.
pub fn work_budget(input: &ProposalInput) -> WorkBudget {
    let bound = budget_upper_bound(&input.budget);
    if bound > 0 && input.hourly_rate > 0.0 {
        WorkBudget::FromBudget {
            max_hours: (bound as f64 / input.hourly_rate).floor() as i64,
        }
    } else {
        WorkBudget::FromDuration {
            max_hours: duration_business_days(&input.duration) * HOURS_PER_DAY,
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt rendering
// ---------------------------------------------------------------------------

/// A system/user instruction pair for the text-generation call.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Render the system and user prompts for a proposal generation request.
pub fn build_prompts(input: &ProposalInput) -> PromptPair {
    let system = "\
あなたは日本語のフリーランスエンジニア向け提案書を生成する専門家です。
クライアントに提出するプロフェッショナルな提案書の内容を生成してください。
必ず以下のJSON形式で回答してください。それ以外のテキストは含めないでください。

{
  \"summary\": \"提案概要（2-3文）\",
  \"scope\": \"プロジェクトスコープの説明\",
  \"deliverables\": [\"納品物1\", \"納品物2\", ...],
  \"timeline\": [
    { \"phase\": \"フェーズ名\", \"duration\": \"期間\", \"tasks\": [\"タスク1\", \"タスク2\", ...] }
  ],
  \"estimateItems\": [
    { \"item\": \"項目名\", \"quantity\": 数値, \"unit\": \"単位\", \"unitPrice\": 数値, \"amount\": 数値 }
  ],
  \"totalAmount\": 合計金額（数値）,
  \"notes\": \"備考・注意事項\"
}

納品物は3〜6項目、タイムラインは2〜4フェーズ、見積もりは3〜6行に収めてください。
各見積もり行の amount は必ず quantity × unitPrice、totalAmount は必ず amount の合計にしてください。"
        .to_string();

    let effort_hint = match work_budget(input) {
        WorkBudget::FromBudget { max_hours } => {
            format!("想定稼働時間は最大{max_hours}時間程度に収めてください。")
        }
        WorkBudget::FromDuration { .. } => {
            "期間と時給単価から現実的な工数で見積もってください。".to_string()
        }
    };

    let user = format!(
        "以下の情報を元に提案書を生成してください：

プロジェクト名: {title}
クライアント名: {client}
プロジェクト概要: {description}
技術スタック: {tech}
期間: {duration}
予算: {budget}
担当者名: {name}
役割: {role}
時給単価: {rate}円

{effort_hint}",
        title = input.project_title,
        client = input.client_name,
        description = input.project_description,
        tech = input.tech_stack.join(", "),
        duration = input.duration,
        budget = input.budget,
        name = input.your_name,
        role = input.your_role,
        rate = input.hourly_rate,
    );

    PromptPair { system, user }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProposalInput {
        ProposalInput {
            project_title: "管理画面開発".into(),
            client_name: "株式会社サンプル".into(),
            project_description: "在庫管理画面の新規開発".into(),
            tech_stack: vec!["Rust".into(), "React".into()],
            duration: "3ヶ月".into(),
            budget: "〜50万".into(),
            your_name: "佐藤".into(),
            your_role: "バックエンドエンジニア".into(),
            hourly_rate: 5000.0,
        }
    }

    // -- bucket maps --

    #[test]
    fn budget_bounds() {
        assert_eq!(budget_upper_bound("〜30万"), 300_000);
        assert_eq!(budget_upper_bound("〜50万"), 500_000);
        assert_eq!(budget_upper_bound("〜100万"), 1_000_000);
        assert_eq!(budget_upper_bound("100万以上"), 2_000_000);
        assert_eq!(budget_upper_bound("応相談"), 0);
        assert_eq!(budget_upper_bound(""), 0);
    }

    #[test]
    fn duration_days() {
        assert_eq!(duration_business_days("1週間"), 5);
        assert_eq!(duration_business_days("1ヶ月"), 20);
        assert_eq!(duration_business_days("3ヶ月"), 60);
        assert_eq!(duration_business_days("6ヶ月"), 120);
        assert_eq!(duration_business_days("それ以上"), 180);
        assert_eq!(duration_business_days(""), DEFAULT_DURATION_DAYS);
        assert_eq!(duration_business_days("unknown"), DEFAULT_DURATION_DAYS);
    }

    // -- work budget --

    #[test]
    fn budget_hint_arithmetic() {
        // 500000 / 5000 = 100 hours.
        let i = input();
        assert_eq!(work_budget(&i), WorkBudget::FromBudget { max_hours: 100 });
    }

    #[test]
    fn budget_hint_floors() {
        let mut i = input();
        i.hourly_rate = 7000.0;
        // floor(500000 / 7000) = 71
        assert_eq!(work_budget(&i).max_hours(), 71);
    }

    #[test]
    fn negotiable_budget_uses_duration() {
        let mut i = input();
        i.budget = "応相談".into();
        // 60 days * 6 hours
        assert_eq!(work_budget(&i), WorkBudget::FromDuration { max_hours: 360 });
    }

    #[test]
    fn zero_rate_uses_duration() {
        let mut i = input();
        i.hourly_rate = 0.0;
        assert_eq!(work_budget(&i), WorkBudget::FromDuration { max_hours: 360 });
    }

    #[test]
    fn unset_everything_uses_defaults() {
        let mut i = input();
        i.budget = String::new();
        i.duration = String::new();
        i.hourly_rate = 0.0;
        assert_eq!(
            work_budget(&i),
            WorkBudget::FromDuration {
                max_hours: DEFAULT_DURATION_DAYS * HOURS_PER_DAY
            }
        );
    }

    // -- prompt rendering --

    #[test]
    fn prompts_are_deterministic() {
        let i = input();
        let a = build_prompts(&i);
        let b = build_prompts(&i);
        assert_eq!(a.system, b.system);
        assert_eq!(a.user, b.user);
    }

    #[test]
    fn user_prompt_embeds_fields() {
        let p = build_prompts(&input());
        assert!(p.user.contains("管理画面開発"));
        assert!(p.user.contains("株式会社サンプル"));
        assert!(p.user.contains("Rust, React"));
        assert!(p.user.contains("5000円"));
    }

    #[test]
    fn user_prompt_embeds_hour_ceiling() {
        let p = build_prompts(&input());
        assert!(p.user.contains("最大100時間"));
    }

    #[test]
    fn system_prompt_demands_json() {
        let p = build_prompts(&input());
        assert!(p.system.contains("JSON形式"));
        assert!(p.system.contains("estimateItems"));
        assert!(p.system.contains("totalAmount"));
    }
}
