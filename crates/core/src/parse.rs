//! Recovery of a structured proposal document from free-form model text.
//!
//! The provider is instructed to answer with JSON only, but real responses
//! sometimes carry leading or trailing prose. [`extract_json_object`] finds
//! the first balanced `{...}` span; [`parse_proposal_output`] then parses it
//! and enforces the document invariants. Any failure returns `None` so the
//! caller can substitute the deterministic fallback.

use crate::proposal::ProposalOutput;

/// Extract the first balanced top-level `{...}` span from `text`.
///
/// Brace counting is string-aware: braces inside JSON string literals
/// (including escaped quotes) do not affect nesting depth. Returns `None`
/// when no opening brace exists or the braces never balance.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse model text into a validated [`ProposalOutput`].
///
/// Returns `None` when no JSON span is found, the span does not parse into
/// the expected schema, or the parsed document violates the estimate
/// invariants. Unknown fields are ignored.
pub fn parse_proposal_output(text: &str) -> Option<ProposalOutput> {
    let span = extract_json_object(text)?;
    let output: ProposalOutput = serde_json::from_str(span).ok()?;
    output.validate().ok()?;
    Some(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DOC: &str = r#"{
        "summary": "提案概要です。",
        "scope": "スコープの説明です。",
        "deliverables": ["要件定義書", "ソースコード"],
        "timeline": [
            { "phase": "開発", "duration": "4週間", "tasks": ["実装", "テスト"] }
        ],
        "estimateItems": [
            { "item": "開発", "quantity": 40, "unit": "時間", "unitPrice": 5000, "amount": 200000 }
        ],
        "totalAmount": 200000,
        "notes": "備考"
    }"#;

    // -- extraction --

    #[test]
    fn extracts_bare_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn tolerates_leading_and_trailing_prose() {
        let text = format!("以下が提案書です。\n{VALID_DOC}\nご確認ください。");
        assert_eq!(extract_json_object(&text), Some(VALID_DOC));
    }

    #[test]
    fn handles_nested_objects() {
        let text = r#"note {"a": {"b": {"c": 1}}} tail"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": {"b": {"c": 1}}}"#));
    }

    #[test]
    fn braces_inside_strings_ignored() {
        let text = r#"{"a": "closing } brace", "b": "open { brace"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn escaped_quote_inside_string() {
        let text = r#"{"a": "quote \" then } brace"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn no_brace_returns_none() {
        assert_eq!(extract_json_object("申し訳ありませんが対応できません。"), None);
    }

    #[test]
    fn unbalanced_returns_none() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), None);
    }

    // -- parse + validate --

    #[test]
    fn parses_valid_document() {
        let out = parse_proposal_output(VALID_DOC).expect("should parse");
        assert_eq!(out.total_amount, 200000.0);
        assert_eq!(out.estimate_items.len(), 1);
    }

    #[test]
    fn parses_document_with_surrounding_prose() {
        let text = format!("こちらです：{VALID_DOC}");
        assert!(parse_proposal_output(&text).is_some());
    }

    #[test]
    fn missing_required_field_falls_through() {
        // No "notes" field.
        let doc = r#"{"summary": "s", "scope": "sc", "deliverables": ["d"],
            "timeline": [{"phase": "p", "duration": "1週間", "tasks": ["t"]}],
            "estimateItems": [{"item": "i", "quantity": 1, "unit": "時間", "unitPrice": 100, "amount": 100}],
            "totalAmount": 100}"#;
        assert!(parse_proposal_output(doc).is_none());
    }

    #[test]
    fn inconsistent_total_falls_through() {
        let doc = VALID_DOC.replace("\"totalAmount\": 200000", "\"totalAmount\": 999999");
        assert!(parse_proposal_output(&doc).is_none());
    }

    #[test]
    fn inconsistent_item_amount_falls_through() {
        let doc = VALID_DOC.replace("\"amount\": 200000", "\"amount\": 123");
        assert!(parse_proposal_output(&doc).is_none());
    }

    #[test]
    fn mistyped_field_falls_through() {
        let doc = VALID_DOC.replace("\"totalAmount\": 200000", "\"totalAmount\": \"200000円\"");
        assert!(parse_proposal_output(&doc).is_none());
    }

    #[test]
    fn unknown_fields_ignored() {
        let doc = VALID_DOC.replace(
            "\"notes\": \"備考\"",
            "\"notes\": \"備考\", \"confidence\": 0.9",
        );
        assert!(parse_proposal_output(&doc).is_some());
    }

    #[test]
    fn refusal_text_falls_through() {
        assert!(parse_proposal_output("ご依頼の内容には対応できません。").is_none());
    }
}
