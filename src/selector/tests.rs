use serde_json::json;

use super::*;

fn analysis_document() -> Value {
    json!({
        "analysis_overview": "overview",
        "analysis_indices": {
            "subsections_index": ["intro", "body"],
            "entities_index": [
                {"name": "soil", "type": "resource"},
                {"name": "rain", "type": "climate"}
            ]
        }
    })
}

#[test]
fn parse_accepts_dotted_wildcard_and_index_segments() {
    let selector = Selector::parse("$.analysis_indices.entities_index[*].name")
        .expect("selector should parse");
    assert_eq!(
        selector.segments(),
        &[
            Segment::Field("analysis_indices".to_string()),
            Segment::Field("entities_index".to_string()),
            Segment::Wildcard,
            Segment::Field("name".to_string()),
        ]
    );

    let indexed = Selector::parse("$.items[-1]['quoted key']").expect("selector should parse");
    assert_eq!(
        indexed.segments(),
        &[
            Segment::Field("items".to_string()),
            Segment::Index(-1),
            Segment::Field("quoted key".to_string()),
        ]
    );
}

#[test]
fn parse_accepts_dot_before_bracket_and_bare_leading_name() {
    let dotted = Selector::parse("$.foobar.baz.[*].x").expect("dot-bracket form should parse");
    assert_eq!(dotted.segments().len(), 4);
    assert_eq!(dotted.segments()[2], Segment::Wildcard);

    let bare = Selector::parse("analysis_indices.entities_index").expect("bare form should parse");
    assert_eq!(bare.segments()[0], Segment::Field("analysis_indices".to_string()));
    assert_eq!(bare.as_str(), "analysis_indices.entities_index");
}

#[test]
fn parse_rejects_unsupported_grammar() {
    assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
    assert!(Selector::parse("$..name").is_err());
    assert!(Selector::parse("$.items[?(@.x > 1)]").is_err());
    assert!(Selector::parse("$.items[0:2]").is_err());
    assert!(Selector::parse("$.items[").is_err());
}

#[test]
fn root_selector_matches_whole_document() {
    let document = analysis_document();
    let selector = Selector::parse("$").expect("root selector should parse");
    let matches = selector.find(&document);
    assert_eq!(matches, vec![&document]);
}

#[test]
fn find_walks_wildcards_in_document_order() {
    let document = analysis_document();
    let selector = Selector::parse("$.analysis_indices.entities_index[*].name")
        .expect("selector should parse");
    let names = selector
        .find(&document)
        .into_iter()
        .map(|value| value.as_str().unwrap_or_default().to_string())
        .collect::<Vec<String>>();
    assert_eq!(names, vec!["soil", "rain"]);
}

#[test]
fn find_returns_single_collection_for_list_property() {
    let document = analysis_document();
    let selector =
        Selector::parse("$.analysis_indices.subsections_index").expect("selector should parse");
    let matches = selector.find(&document);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0], &json!(["intro", "body"]));
}

#[test]
fn find_handles_negative_and_out_of_range_indices() {
    let document = analysis_document();
    let last = Selector::parse("$.analysis_indices.subsections_index[-1]")
        .expect("selector should parse");
    assert_eq!(last.find(&document), vec![&json!("body")]);

    let missing = Selector::parse("$.analysis_indices.subsections_index[7]")
        .expect("selector should parse");
    assert!(missing.find(&document).is_empty());
}

#[test]
fn find_returns_nothing_for_missing_field_or_type_mismatch() {
    let document = analysis_document();
    let missing = Selector::parse("$.nonexistent_field").expect("selector should parse");
    assert!(missing.find(&document).is_empty());

    let mismatch = Selector::parse("$.analysis_overview[0]").expect("selector should parse");
    assert!(mismatch.find(&document).is_empty());
}
