use serde_json::json;

use super::*;

fn meta(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn parses_scalars_and_item_block() {
    let doc = parse("---\nid: abc\nsignals:\n  - u1\n  - u2\n---\nBody text");
    assert_eq!(doc.metadata, meta(json!({"id": "abc", "signals": ["u1", "u2"]})));
    assert_eq!(doc.body, "Body text");
}

#[test]
fn missing_opening_delimiter_returns_whole_input_as_body() {
    let input = "id: abc\nno frontmatter here";
    let doc = parse(input);
    assert!(doc.metadata.is_empty());
    assert_eq!(doc.body, input);
}

#[test]
fn unclosed_frontmatter_degrades_to_body() {
    let input = "---\nid: abc\nstill going";
    let doc = parse(input);
    assert!(doc.metadata.is_empty());
    assert_eq!(doc.body, input);
}

#[test]
fn empty_input_is_empty_body() {
    let doc = parse("");
    assert!(doc.metadata.is_empty());
    assert_eq!(doc.body, "");
}

#[test]
fn strips_both_quote_styles() {
    let doc = parse("---\na: \"double: quoted\"\nb: 'single'\n---\n");
    assert_eq!(doc.metadata["a"], json!("double: quoted"));
    assert_eq!(doc.metadata["b"], json!("single"));
}

#[test]
fn coerces_plain_integers_but_not_quoted_ones() {
    let doc = parse("---\nword_count: 250\nneg: -3\nzip: \"02134\"\nversion: 1.5\n---\n");
    assert_eq!(doc.metadata["word_count"], json!(250));
    assert_eq!(doc.metadata["neg"], json!(-3));
    assert_eq!(doc.metadata["zip"], json!("02134"));
    assert_eq!(doc.metadata["version"], json!("1.5"));
}

#[test]
fn coerces_booleans() {
    let doc = parse("---\ndraft: true\npinned: false\nlabel: 'true'\n---\n");
    assert_eq!(doc.metadata["draft"], json!(true));
    assert_eq!(doc.metadata["pinned"], json!(false));
    assert_eq!(doc.metadata["label"], json!("true"));
}

#[test]
fn inline_array_parses_as_json() {
    let doc = parse("---\ntags: [\"a\", \"b\"]\nempty: []\n---\n");
    assert_eq!(doc.metadata["tags"], json!(["a", "b"]));
    assert_eq!(doc.metadata["empty"], json!([]));
}

#[test]
fn malformed_inline_array_falls_back_to_comma_split() {
    let doc = parse("---\ntags: [alpha, 'beta', \"gamma\" ]\n---\n");
    assert_eq!(doc.metadata["tags"], json!(["alpha", "beta", "gamma"]));
}

#[test]
fn nested_object_block() {
    let doc = parse(
        "---\ntemplate:\n  id: t-7\n  name: Contrarian hook\ntitle: After\n---\nbody",
    );
    assert_eq!(
        doc.metadata,
        meta(json!({
            "template": {"id": "t-7", "name": "Contrarian hook"},
            "title": "After"
        }))
    );
}

#[test]
fn nested_object_may_hold_item_blocks() {
    let input = "---\n\
distribution_notes:\n  \
  comment_links:\n    \
    - https://a.example/1\n    \
    - https://a.example/2\n  \
  best_posting_time: Tue 9am\n\
status: created\n\
---\n";
    let doc = parse(input);
    assert_eq!(
        doc.metadata["distribution_notes"],
        json!({
            "comment_links": ["https://a.example/1", "https://a.example/2"],
            "best_posting_time": "Tue 9am"
        })
    );
    assert_eq!(doc.metadata["status"], json!("created"));
}

#[test]
fn items_at_key_indent_belong_to_key() {
    let doc = parse("---\nsignals:\n- u1\n- u2\nid: x\n---\n");
    assert_eq!(doc.metadata["signals"], json!(["u1", "u2"]));
    assert_eq!(doc.metadata["id"], json!("x"));
}

#[test]
fn empty_value_without_block_is_empty_string() {
    let doc = parse("---\npov:\nid: x\n---\n");
    assert_eq!(doc.metadata["pov"], json!(""));
}

#[test]
fn item_values_stay_strings_and_lose_quotes() {
    let doc = parse("---\nlist:\n  - 42\n  - \"quoted\"\n---\n");
    assert_eq!(doc.metadata["list"], json!(["42", "quoted"]));
}

#[test]
fn unrecognised_lines_are_skipped() {
    let doc = parse("---\nid: a\nthis line is prose\ntitle: t\n---\n");
    assert_eq!(doc.metadata, meta(json!({"id": "a", "title": "t"})));
}

#[test]
fn body_is_preserved_byte_for_byte() {
    let doc = parse("---\nid: a\n---\n\n# Heading\n\ntext\n");
    assert_eq!(doc.body, "\n# Heading\n\ntext\n");
}

#[test]
fn crlf_documents_parse() {
    let doc = parse("---\r\nid: a\r\n---\r\nbody\r\n");
    assert_eq!(doc.metadata["id"], json!("a"));
    assert_eq!(doc.body, "body\r\n");
}

#[test]
fn stray_item_does_not_end_the_mapping() {
    let doc = parse("---\nid: abc\n- orphan\ntitle: Kept\nnested:\n  a: 1\n- orphan\nstatus: draft\n---\n");
    assert_eq!(
        doc.metadata,
        meta(json!({"id": "abc", "title": "Kept", "nested": {"a": 1}, "status": "draft"}))
    );
}
