//! Error taxonomy: every error names its document, rule, and cause.

use redline_core::errors::*;
use redline_core::types::{FindingId, Span, SpanFault};

#[test]
fn invalid_span_names_document_and_rule() {
    let err = ScanError::InvalidSpan {
        document: "src/lib.rs".to_string(),
        rule_id: "transient-moved".to_string(),
        span: Span::new(10, 99),
        text_len: 40,
        fault: SpanFault::OutOfBounds { len: 40 },
    };
    let msg = err.to_string();
    assert!(msg.contains("src/lib.rs"));
    assert!(msg.contains("transient-moved"));
    assert!(msg.contains("10..99"));
    assert_eq!(err.error_code(), "INVALID_SPAN");
    assert!(err.coded_string().starts_with("[INVALID_SPAN] "));
}

#[test]
fn orphan_finding_names_document_and_rule() {
    let err = ReportError::OrphanFinding {
        document: "ghost.md".to_string(),
        rule_id: "ai-hype-vocab".to_string(),
        finding: FindingId::new("00000000000000aa"),
    };
    let msg = err.to_string();
    assert!(msg.contains("ghost.md"));
    assert!(msg.contains("ai-hype-vocab"));
    assert_eq!(err.error_code(), "ORPHAN_FINDING");
}

#[test]
fn apply_inconsistency_message_includes_optional_parts() {
    let with_rule = ApplyError::Inconsistent {
        document: "a.txt".to_string(),
        rule_id: Some("r1".to_string()),
        finding: Some(FindingId::new("0000000000000001")),
        cause: "span text changed".to_string(),
    };
    assert_eq!(
        with_rule.to_string(),
        "Apply plan inconsistent with a.txt [r1] (finding 0000000000000001): span text changed"
    );

    let bare = ApplyError::Inconsistent {
        document: "a.txt".to_string(),
        rule_id: None,
        finding: None,
        cause: "overlapping operations".to_string(),
    };
    assert_eq!(
        bare.to_string(),
        "Apply plan inconsistent with a.txt: overlapping operations"
    );
    assert_eq!(bare.document(), "a.txt");
}

#[test]
fn pipeline_error_forwards_codes() {
    let err: PipelineError = GateError::InvalidResponse { attempts: 3 }.into();
    assert_eq!(err.error_code(), "GATE_ERROR");
    assert_eq!(PipelineError::Cancelled.error_code(), "CANCELLED");
}

#[test]
fn pipeline_result_collects_non_fatal_errors() {
    let mut result: PipelineResult<Vec<String>> = PipelineResult::new(vec!["ok".to_string()]);
    assert!(result.is_clean());
    result.add_error(ScanError::Cancelled);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.data, vec!["ok".to_string()]);
}
