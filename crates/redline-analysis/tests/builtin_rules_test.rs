//! Behaviour of the built-in rule packs on realistic text.

use redline_analysis::mutation::{apply, ApplyOutcome};
use redline_analysis::rules::{available_packs, load_pack, load_packs};
use redline_analysis::scanner::scan;
use redline_core::{Document, Finding};

fn fix_all(doc: &Document, findings: &[Finding]) -> String {
    let refs: Vec<&Finding> = findings.iter().collect();
    apply(doc, &refs).unwrap().document.text().to_string()
}

fn rule_ids(findings: &[Finding]) -> Vec<&str> {
    let mut ids: Vec<&str> = findings.iter().map(|f| f.rule_id.as_str()).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Every pack shipped with the binary is listed and loadable.
#[test]
fn test_all_packs_listed() {
    assert_eq!(
        available_packs(),
        vec!["transient-comments", "ai-writing", "ambiguity"]
    );
    let all = load_packs(&available_packs()).unwrap();
    assert!(all.len() >= 15);
}

/// Whole comment lines narrating edits are removed; trailing notes are trimmed.
#[test]
fn test_transient_comments_removed() {
    let rules = load_pack("transient-comments").unwrap();
    let doc = Document::new(
        "src/lib.rs",
        "fn a() {}\n// moved to utils.rs\nlet x = 2; // was 1\n# removed old handler\n",
    );
    let findings = scan(&doc, &rules).unwrap();
    assert_eq!(
        rule_ids(&findings),
        vec!["transient-moved", "transient-removed", "transient-trailing"]
    );
    assert_eq!(fix_all(&doc, &findings), "fn a() {}\nlet x = 2;\n");
}

/// Comments describing the current code are left alone.
#[test]
fn test_transient_comments_spare_descriptive_comments() {
    let rules = load_pack("transient-comments").unwrap();
    let doc = Document::new(
        "src/lib.rs",
        "// Returns the removed entries in insertion order.\nfn drain() {}\n",
    );
    assert!(scan(&doc, &rules).unwrap().is_empty());
}

/// A block comment sharing its line with code never takes the code with it.
#[test]
fn test_block_comment_before_code_keeps_code() {
    let rules = load_pack("transient-comments").unwrap();
    let doc = Document::new("a.c", "/* moved to util.c */ int x = compute();\nreturn x;\n");
    let findings = scan(&doc, &rules).unwrap();
    assert!(findings.is_empty(), "{findings:?}");
    assert_eq!(fix_all(&doc, &findings), doc.text());

    let own_line = Document::new("b.c", "/* removed the old cache */\r\nint y = 0;\r\n");
    let findings = scan(&own_line, &rules).unwrap();
    assert_eq!(rule_ids(&findings), vec!["transient-removed"]);
    assert_eq!(fix_all(&own_line, &findings), "int y = 0;\r\n");
}

/// Changelog headings that start with a history word are not comments.
#[test]
fn test_changelog_headings_are_kept() {
    let rules = load_pack("transient-comments").unwrap();
    let text = "## [1.2.0]\n### Removed\n- old API\n# Removed in 2.0\n";
    for id in ["CHANGELOG.md", "docs/history.markdown"] {
        let doc = Document::new(id, text);
        assert!(scan(&doc, &rules).unwrap().is_empty(), "{id}");
    }

    // Outside Markdown only a single `#` reads as a comment leader.
    let doc = Document::new("CHANGES.txt", "## [1.2.0]\n### Removed\n- old API\n");
    assert!(scan(&doc, &rules).unwrap().is_empty());
}

/// Inflated vocabulary is replaced, keeping the original capitalisation.
#[test]
fn test_hype_vocabulary_replaced() {
    let rules = load_pack("ai-writing").unwrap();
    let doc = Document::new(
        "README.md",
        "Leverage the cache in order to commence work.\nWe utilize it.\n",
    );
    let findings = scan(&doc, &rules).unwrap();
    assert!(findings.iter().all(|f| f.rule_id == "ai-hype-vocab"));
    assert_eq!(fix_all(&doc, &findings), "Use the cache to start work.\nWe use it.\n");
}

/// Filler phrases and conversational openers are deleted outright.
#[test]
fn test_filler_and_openers_deleted() {
    let rules = load_pack("ai-writing").unwrap();
    let doc = Document::new(
        "notes.md",
        "Certainly! Here is the plan.\nIt's worth noting that the API is stable.\n",
    );
    let findings = scan(&doc, &rules).unwrap();
    assert_eq!(
        rule_ids(&findings),
        vec!["ai-filler-phrase", "ai-sycophantic-opener"]
    );
    assert_eq!(
        fix_all(&doc, &findings),
        "Here is the plan.\nthe API is stable.\n"
    );
}

/// Promotional adjectives and em dashes are flagged but never rewritten.
#[test]
fn test_intensifiers_are_advisory() {
    let rules = load_pack("ai-writing").unwrap();
    let doc = Document::new("post.md", "A seamless upgrade \u{2014} truly world-class.\n");
    let findings = scan(&doc, &rules).unwrap();
    assert_eq!(findings.len(), 3);
    assert!(findings.iter().all(|f| !f.is_fixable()));
    assert!(findings
        .iter()
        .any(|f| f.rule_id == "ai-intensifier" && f.rationale.contains("'seamless'")));

    let refs: Vec<&Finding> = findings.iter().collect();
    let applied = apply(&doc, &refs).unwrap();
    assert_eq!(applied.outcome, ApplyOutcome::Unchanged);
    assert_eq!(applied.document.text(), doc.text());
}

/// Ambiguous requirement wording is reported with no suggested rewrite.
#[test]
fn test_ambiguity_flags_requirements() {
    let rules = load_pack("ambiguity").unwrap();
    let doc = Document::new(
        "requirements.md",
        "The service should be fast and user-friendly, etc.\nErrors will be handled.\n",
    );
    let findings = scan(&doc, &rules).unwrap();
    assert_eq!(
        rule_ids(&findings),
        vec![
            "ambiguity-open-ended",
            "ambiguity-passive-actor",
            "ambiguity-vague-quality",
            "ambiguity-weak-modal",
        ]
    );
    assert!(findings.iter().all(|f| f.suggested_replacement.is_none()));
}
