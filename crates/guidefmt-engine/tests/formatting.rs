//! End-to-end formatting behavior, driven through whole documents and sets.

use guidefmt_engine::parsing::{render_line, rendered_width};
use guidefmt_engine::{Document, DocumentSet, IndexOptions, MAX_LINE_WIDTH};
use pretty_assertions::assert_eq;

fn format_doc(lines: &[&str], width: usize) -> Vec<String> {
    let mut set = DocumentSet::new();
    set.add_document(Document::parse("guide.gde", lines.iter().copied()).unwrap());
    set.resolve();
    let mut out = set.format(width).unwrap();
    out.remove(0).1
}

#[test]
fn formatting_its_own_output_changes_nothing() {
    let source = [
        "@title Example Guide",
        "@index INDEX",
        "@node Main",
        "@toc Contents",
        "Some text  that needs  reflowing onto",
        "a single line, with a @{\"link\" LINK Contents} in the middle of it.",
        "",
        "   a literal line, indented",
        "@node Contents",
        "@node INDEX",
        "term   @{\"ref\" LINK Main}",
    ];

    let first = format_doc(&source, MAX_LINE_WIDTH);
    let as_strs: Vec<&str> = first.iter().map(String::as_str).collect();
    let second = format_doc(&as_strs, MAX_LINE_WIDTH);

    assert_eq!(first, second);
}

#[test]
fn every_line_fits_the_width_unless_a_single_word_cannot() {
    let source = [
        "@node Main",
        "a paragraph of reasonably sized words that will be wrapped over several \
         output lines once it exceeds the narrow width configured for this test",
        "plus one single_word_far_too_long_to_fit_on_a_thirty_column_line here",
    ];

    let out = format_doc(&source, 30);
    for line in &out {
        if line.starts_with('@') {
            continue;
        }
        let width = rendered_width(&render_line(line).unwrap());
        if width > 30 {
            // Only an unbreakable word may overflow, and then it stands alone.
            assert!(!line.contains(' '), "overflowing line has spaces: {line}");
        }
    }
}

#[test]
fn reflow_preserves_word_order_and_source_spacing_within_lines() {
    let source = [
        "@node Main",
        "alpha  beta gamma",
        "delta",
        "epsilon",
    ];

    let out = format_doc(&source, 20);
    let body: Vec<&str> = out
        .iter()
        .filter(|l| !l.starts_with('@') && !l.is_empty())
        .map(String::as_str)
        .collect();
    // Words stay in order; the double space survives because those words
    // stayed adjacent on one line, while words joined across source line
    // boundaries get exactly one space.
    assert_eq!(body, vec!["alpha  beta gamma", "delta epsilon"]);
}

#[test]
fn literal_lines_pass_through_unchanged() {
    let literals = [
        "   indented literal",
        "column one      column two",
        "@{h1}A Header",
        "@{c}Centered text",
    ];
    let mut source = vec!["@node Main"];
    source.extend(literals);

    let out = format_doc(&source, MAX_LINE_WIDTH);
    for literal in literals {
        assert!(out.contains(&literal.to_string()), "missing: {literal}");
    }
}

#[test]
fn a_line_holding_only_a_link_is_not_reflowed() {
    let source = [
        "@node Main",
        "@{\"Back to the start\" LINK Main}",
        "following paragraph text",
    ];

    let out = format_doc(&source, MAX_LINE_WIDTH);
    assert!(out.contains(&"@{\"Back to the start\" LINK Main}".to_string()));
    assert!(out.contains(&"following paragraph text".to_string()));
}

#[test]
fn default_links_connect_neighbouring_nodes() {
    let out = format_doc(&["@node A", "@node B", "@node C"], MAX_LINE_WIDTH);

    let node_b = out.iter().position(|l| l == "@node B").unwrap();
    assert_eq!(out[node_b + 1], "@prev A");
    assert_eq!(out[node_b + 2], "@next C");

    // A has no predecessor and C no successor, so neither line appears.
    let node_a = out.iter().position(|l| l == "@node A").unwrap();
    assert_eq!(out[node_a + 1], "@next B");
    assert!(!out.contains(&"@prev C".to_string()));
}

#[test]
fn sentinel_suppresses_the_link_and_is_never_printed() {
    let out = format_doc(
        &["@node A", "@toc Contents", "@node B", "@prev -", "@toc -", "@node Contents"],
        MAX_LINE_WIDTH,
    );

    let node_b = out.iter().position(|l| l == "@node B").unwrap();
    // B declined both the propagated toc and the prev default; only the
    // backward next default remains.
    assert_eq!(out[node_b + 1], "@next Contents");
    assert!(!out.iter().any(|l| l.contains('-') && l.starts_with("@prev")));
    assert!(!out.iter().any(|l| l.starts_with("@toc -")));
}

#[test]
fn cross_document_links_gain_a_document_prefix() {
    let mut set = DocumentSet::new();
    set.add_document(
        Document::parse(
            "first.gde",
            ["@node Main", "read the @{\"appendix\" LINK Appendix} for more"],
        )
        .unwrap(),
    );
    set.add_document(Document::parse("second.gde", ["@node Appendix"]).unwrap());
    set.resolve();

    let out = set.format(MAX_LINE_WIDTH).unwrap();
    assert!(
        out[0]
            .1
            .contains(&"read the @{\"appendix\" LINK second/Appendix} for more".to_string())
    );
}

#[test]
fn unknown_inline_link_target_warns_but_still_formats() {
    let mut set = DocumentSet::new();
    set.add_document(
        Document::parse("guide.gde", ["@node Main", "a @{\"broken\" LINK Nowhere} link"])
            .unwrap(),
    );
    set.resolve();

    let out = set.format(MAX_LINE_WIDTH).unwrap();
    assert!(
        out[0]
            .1
            .contains(&"a @{\"broken\" LINK Nowhere} link".to_string())
    );
    assert!(
        set.warnings()
            .iter()
            .any(|w| w.contains("link target: @Nowhere does not exist"))
    );
}

#[test]
fn small_document_formats_as_expected() {
    let out = format_doc(
        &[
            "@node Intro",
            "Welcome to the guide, a short example used here.",
            "@node Next",
        ],
        40,
    );

    insta::assert_snapshot!(out.join("\n").trim(), @r"
    @---------------------------------------
    @node Intro
    @next Next
    Welcome to the guide, a short example
    used here.

    @---------------------------------------
    @node Next
    @prev Intro
    ");
}

#[test]
fn consolidated_output_is_stable_under_a_second_run() {
    let source = [
        "@index INDEX",
        "@node Main",
        "@node Extras",
        "@node INDEX",
        "Beta   @{\"two\" LINK Extras}",
        "Alpha   @{\"one\" LINK Main}",
        "#Hash   @{\"sym\" LINK Main}",
    ];

    let opts = IndexOptions::default();

    let run = |lines: &[String]| {
        let strs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut set = DocumentSet::new();
        set.add_document(Document::parse("guide.gde", strs.iter().copied()).unwrap());
        set.resolve();
        set.consolidate_indices(MAX_LINE_WIDTH, &opts);
        set.format(MAX_LINE_WIDTH).unwrap().remove(0).1
    };

    let source_owned: Vec<String> = source.iter().map(|s| s.to_string()).collect();
    let first = run(&source_owned);
    let second = run(&first);
    assert_eq!(first, second);

    // The index node body came back sorted, symbols first.
    let index_at = first.iter().position(|l| l == "@node INDEX").unwrap();
    let terms: Vec<&str> = first[index_at..]
        .iter()
        .filter(|l| l.contains("LINK") && !l.starts_with('@'))
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(terms, vec!["#Hash", "Alpha", "Beta"]);
}
