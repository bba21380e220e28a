//! Deterministic proposal synthesis used when the model is unavailable or
//! its output cannot be recovered.
//!
//! Total function of the input: no I/O, never fails, and the resulting
//! document always satisfies [`ProposalOutput::validate`] by construction.

use crate::proposal::{EstimateItem, ProposalInput, ProposalOutput, TimelinePhase};

/// Fixed effort breakdown, in hours, for the fallback estimate.
const EFFORT_BREAKDOWN: [(&str, f64); 5] = [
    ("要件定義・設計", 16.0),
    ("フロントエンド開発", 40.0),
    ("バックエンド開発", 32.0),
    ("テスト・品質保証", 16.0),
    ("デプロイ・運用準備", 8.0),
];

/// Build a self-consistent proposal document from the input alone.
pub fn fallback_proposal(input: &ProposalInput) -> ProposalOutput {
    let rate = input.hourly_rate;

    let estimate_items: Vec<EstimateItem> = EFFORT_BREAKDOWN
        .iter()
        .map(|&(item, hours)| EstimateItem {
            item: item.to_string(),
            quantity: hours,
            unit: "時間".to_string(),
            unit_price: rate,
            amount: hours * rate,
        })
        .collect();

    let total_amount = estimate_items.iter().map(|i| i.amount).sum();

    ProposalOutput {
        summary: format!(
            "{client}様向けに{title}の開発を提案いたします。{tech}を活用し、{duration}の期間で高品質なシステムを構築いたします。",
            client = input.client_name,
            title = input.project_title,
            tech = input.tech_stack.join("、"),
            duration = input.duration,
        ),
        scope: format!(
            "本プロジェクトでは、{description}を実現するためのシステム開発を行います。要件定義から設計、実装、テスト、デプロイまで一貫して対応いたします。",
            description = input.project_description,
        ),
        deliverables: vec![
            "要件定義書".to_string(),
            "システム設計書（画面設計・DB設計・API設計）".to_string(),
            "ソースコード一式".to_string(),
            "テスト結果報告書".to_string(),
            "運用マニュアル".to_string(),
            "デプロイ済み本番環境".to_string(),
        ],
        timeline: vec![
            TimelinePhase {
                phase: "要件定義・設計フェーズ".to_string(),
                duration: "2週間".to_string(),
                tasks: vec![
                    "要件ヒアリング".to_string(),
                    "画面設計".to_string(),
                    "データベース設計".to_string(),
                    "API設計".to_string(),
                ],
            },
            TimelinePhase {
                phase: "開発フェーズ".to_string(),
                duration: "4週間".to_string(),
                tasks: vec![
                    "フロントエンド実装".to_string(),
                    "バックエンド実装".to_string(),
                    "API連携".to_string(),
                    "単体テスト".to_string(),
                ],
            },
            TimelinePhase {
                phase: "テスト・リリースフェーズ".to_string(),
                duration: "2週間".to_string(),
                tasks: vec![
                    "結合テスト".to_string(),
                    "ユーザー受入テスト".to_string(),
                    "バグ修正".to_string(),
                    "本番デプロイ".to_string(),
                ],
            },
        ],
        estimate_items,
        total_amount,
        notes: "・お支払い条件：着手時50%、納品時50%\n・瑕疵担保期間：納品後3ヶ月\n・稼働時間：平日10:00〜19:00を基本とします\n・仕様変更が発生した場合は別途お見積もりとなります".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rate: f64) -> ProposalInput {
        ProposalInput {
            project_title: "予約システム開発".into(),
            client_name: "株式会社テスト".into(),
            project_description: "店舗向け予約システムの構築".into(),
            tech_stack: vec!["Next.js".into(), "Supabase".into()],
            duration: "1ヶ月".into(),
            budget: "〜50万".into(),
            your_name: "鈴木".into(),
            your_role: "エンジニア".into(),
            hourly_rate: rate,
        }
    }

    #[test]
    fn total_equals_sum_of_amounts() {
        let out = fallback_proposal(&input(5000.0));
        let sum: f64 = out.estimate_items.iter().map(|i| i.amount).sum();
        assert_eq!(out.total_amount, sum);
    }

    #[test]
    fn each_amount_is_quantity_times_rate() {
        let rate = 4500.0;
        let out = fallback_proposal(&input(rate));
        for item in &out.estimate_items {
            assert_eq!(item.amount, item.quantity * rate);
            assert_eq!(item.unit_price, rate);
        }
    }

    #[test]
    fn satisfies_output_invariants() {
        assert!(fallback_proposal(&input(5000.0)).validate().is_ok());
    }

    #[test]
    fn zero_rate_produces_zero_total() {
        let out = fallback_proposal(&input(0.0));
        assert_eq!(out.total_amount, 0.0);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = fallback_proposal(&input(5000.0));
        let b = fallback_proposal(&input(5000.0));
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn narrative_embeds_input_fields() {
        let out = fallback_proposal(&input(5000.0));
        assert!(out.summary.contains("株式会社テスト"));
        assert!(out.summary.contains("予約システム開発"));
        assert!(out.summary.contains("Next.js、Supabase"));
        assert!(out.scope.contains("店舗向け予約システムの構築"));
    }

    #[test]
    fn five_line_estimate() {
        let out = fallback_proposal(&input(5000.0));
        assert_eq!(out.estimate_items.len(), 5);
        // 16 + 40 + 32 + 16 + 8 = 112 hours
        assert_eq!(out.total_amount, 112.0 * 5000.0);
    }
}
