//! Approval gate tests: interactive prompt, preset decisions, policy.

use std::io::Cursor;

use redline_analysis::gate::{ApprovalGate, Decision, GatePolicy, InteractiveGate, PresetGate, Scope};
use redline_analysis::report::{build_report, Report};
use redline_analysis::rules::{load_packs, RuleSet};
use redline_analysis::scanner::scan;
use redline_core::errors::GateError;
use redline_core::{Document, FindingId};

fn sample() -> (RuleSet, Report) {
    let rules = load_packs(&["transient-comments", "ai-writing"]).unwrap();
    let docs = vec![Document::new(
        "a.rs",
        "// moved to b.rs\nWe leverage it.\n",
    )];
    let findings = docs.iter().flat_map(|d| scan(d, &rules).unwrap()).collect();
    let report = build_report(&docs, findings).unwrap();
    (rules, report)
}

fn ask(input: &str, report: &Report) -> (Result<Decision, GateError>, String) {
    let mut gate = InteractiveGate::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let decision = gate.await_decision(report);
    let output = String::from_utf8(gate.into_output()).unwrap();
    (decision, output)
}

/// `y` approves everything and the prompt lists finding ids.
#[test]
fn test_interactive_yes() {
    let (_, report) = sample();
    let (decision, output) = ask("y\n", &report);
    assert_eq!(decision.unwrap(), Decision::approve_all());
    for finding in report.findings() {
        assert!(output.contains(finding.id.as_str()));
    }
    assert!(output.contains("Apply 2 fixable findings?"));
}

/// End of input is a rejection, never an approval.
#[test]
fn test_interactive_eof_rejects() {
    let (_, report) = sample();
    let (decision, _) = ask("", &report);
    assert!(!decision.unwrap().approved());
}

/// Rule-scoped answers become rule scopes.
#[test]
fn test_interactive_rule_scope() {
    let (_, report) = sample();
    let (decision, _) = ask("r ai-hype-vocab\n", &report);
    assert_eq!(
        decision.unwrap().scope(),
        &Scope::Rules(vec!["ai-hype-vocab".to_string()])
    );
}

/// Garbage answers are retried, then the gate gives up with an error.
#[test]
fn test_interactive_gives_up_after_invalid_answers() {
    let (_, report) = sample();
    let mut gate = InteractiveGate::new(Cursor::new(b"what\nhuh\n".to_vec()), Vec::new())
        .with_max_attempts(2);
    assert!(matches!(
        gate.await_decision(&report),
        Err(GateError::InvalidResponse { attempts: 2 })
    ));

    let (decision, output) = ask("maybe\nn\n", &report);
    assert!(!decision.unwrap().approved());
    assert!(output.contains("Unrecognised answer: maybe"));
}

/// A preset gate hands out its decision exactly once.
#[test]
fn test_preset_gate() {
    let (_, report) = sample();
    let mut gate = PresetGate::new(Decision::approve_rules(["ai-hype-vocab"]));
    assert!(gate.await_decision(&report).unwrap().is_partial());
    assert!(!gate.await_decision(&report).unwrap().approved());
}

/// Closures are gates too.
#[test]
fn test_closure_gate() {
    let (_, report) = sample();
    let mut seen = 0;
    let mut gate = |r: &Report| -> Result<Decision, GateError> {
        seen = r.len();
        Ok(Decision::reject())
    };
    assert!(!gate.await_decision(&report).unwrap().approved());
    assert_eq!(seen, report.len());
}

/// Policy: partial approval can be switched off; scopes must name real ids.
#[test]
fn test_policy_checks() {
    let (rules, report) = sample();
    let strict = GatePolicy { allow_partial: false };
    let lenient = GatePolicy::default();

    assert!(strict.check(&Decision::approve_all(), &report, &rules).is_ok());
    assert!(strict.check(&Decision::reject(), &report, &rules).is_ok());
    assert!(matches!(
        strict.check(&Decision::approve_rules(["ai-hype-vocab"]), &report, &rules),
        Err(GateError::PartialApprovalDisallowed { .. })
    ));

    assert!(lenient
        .check(&Decision::approve_rules(["ai-hype-vocab"]), &report, &rules)
        .is_ok());
    match lenient.check(&Decision::approve_rules(["no-such-rule"]), &report, &rules) {
        Err(GateError::UnknownScope { kind, ids }) => {
            assert_eq!(kind, "rules");
            assert_eq!(ids, "no-such-rule");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        lenient.check(
            &Decision::approve_findings([FindingId::new("0000000000000000")]),
            &report,
            &rules
        ),
        Err(GateError::UnknownScope { kind: "findings", .. })
    ));
}
