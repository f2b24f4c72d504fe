use draftmark_core::{
    classify, AutoformatEngine, Block, BlockType, Document, InlineStyle, Selection, StyleRange,
    StyleSet, TextChange, TriggerKind,
};

fn styles(list: &[InlineStyle]) -> StyleSet {
    list.iter().copied().collect()
}

fn type_text(document: &Document, text: &str) -> Document {
    document.insert_text(text).unwrap()
}

#[test]
fn document_without_triggers_is_unchanged() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["plain text", "#hash *and*stars", "**"]).unwrap();

    assert!(classify(&document.plain_text('\u{1}')).is_none());
    assert_eq!(engine.process(&document), document);
}

#[test]
fn header_wins_over_bold_and_leaves_bold_pending() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["a* b# "]).unwrap();

    let output = engine.process(&document);
    let block = output.first_block();
    assert_eq!(block.text, "a* b");
    assert_eq!(block.block_type, BlockType::HeaderOne);
    assert_eq!(
        output.style_override(),
        Some(&styles(&[InlineStyle::ColorBlack]))
    );

    let next = engine.process(&output);
    assert_eq!(next.first_block().text, "ab");
    assert_eq!(next.first_block().block_type, BlockType::Unstyled);
}

#[test]
fn lower_priority_trigger_fires_on_a_later_edit() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["a** b* "]).unwrap();

    let first = engine.process(&document);
    assert_eq!(first.first_block().text, "a** b");

    let second = engine.process(&first);
    assert_eq!(second.first_block().text, "ab");
    assert_eq!(
        second.style_override(),
        Some(&styles(&[InlineStyle::ColorRed]))
    );
}

#[test]
fn multiple_bold_triggers_in_one_block_are_removed_offset_safely() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["a* b* c"]).unwrap();

    let output = engine.process(&document);
    assert_eq!(output.first_block().text, "abc");
    assert_eq!(output.first_block().len(), 3);
    assert!(output.validate().is_ok());
}

#[test]
fn red_line_resets_previous_bold_style() {
    let engine = AutoformatEngine::try_new().unwrap();
    let mut block = Block::new("Hello");
    block.style_ranges = vec![StyleRange::new(0, 5, styles(&[InlineStyle::Bold]))];
    let key = block.key;
    let document = Document::from_blocks(vec![block], Some(Selection::collapsed(key, 5))).unwrap();

    let typed = type_text(&document, "** ");
    assert!(typed.first_block().style_at(6).contains(InlineStyle::Bold));

    let output = engine.process(&typed);
    assert_eq!(output.first_block().text, "Hello");
    assert_eq!(
        output.style_override(),
        Some(&styles(&[InlineStyle::ColorRed]))
    );

    let continued = type_text(&output, "x");
    assert_eq!(
        continued.first_block().style_at(5),
        styles(&[InlineStyle::ColorRed])
    );
    assert_eq!(
        continued.first_block().style_at(0),
        styles(&[InlineStyle::Bold])
    );
}

#[test]
fn typing_hash_space_in_empty_document_makes_a_header() {
    let engine = AutoformatEngine::try_new().unwrap();
    let empty = Document::empty();
    let key = empty.first_block().key;

    let hash = engine.process(&type_text(&empty, "#"));
    assert_eq!(hash.first_block().text, "#");
    assert_eq!(hash.first_block().block_type, BlockType::Unstyled);

    let output = engine.process(&type_text(&hash, " "));
    let block = output.first_block();
    assert_eq!(block.text, "");
    assert_eq!(block.block_type, BlockType::HeaderOne);
    assert_eq!(*output.selection(), Selection::collapsed(key, 0));
    assert_eq!(
        output.style_override(),
        Some(&styles(&[InlineStyle::ColorBlack]))
    );
}

#[test]
fn hello_star_space_turns_on_bold() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["Hello* "]).unwrap();
    let key = document.first_block().key;

    let output = engine.process(&document);
    assert_eq!(output.first_block().text, "Hello");
    assert_eq!(*output.selection(), Selection::collapsed(key, 5));
    assert_eq!(
        output.style_override(),
        Some(&styles(&[InlineStyle::Bold, InlineStyle::ColorBlack]))
    );

    let continued = type_text(&output, "world");
    assert_eq!(continued.first_block().text, "Helloworld");
    assert_eq!(
        continued.first_block().style_at(7),
        styles(&[InlineStyle::Bold, InlineStyle::ColorBlack])
    );
    assert!(continued.first_block().style_at(0).is_empty());
}

#[test]
fn underline_trigger_applies_underline_and_black() {
    let engine = AutoformatEngine::try_new().unwrap();
    let output = engine.process(&Document::from_texts(["note*** "]).unwrap());

    assert_eq!(output.first_block().text, "note");
    assert_eq!(
        output.style_override(),
        Some(&styles(&[InlineStyle::Underline, InlineStyle::ColorBlack]))
    );
}

#[test]
fn header_trigger_converts_every_block_it_edits() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["C# rocks", "body", "title# "]).unwrap();

    let output = engine.process(&document);
    let blocks: Vec<_> = output
        .blocks()
        .map(|block| (block.text.as_str(), block.block_type))
        .collect();
    assert_eq!(
        blocks,
        vec![
            ("Crocks", BlockType::HeaderOne),
            ("body", BlockType::Unstyled),
            ("title", BlockType::HeaderOne),
        ]
    );
    assert_eq!(*output.selection(), output.end_selection());
}

#[test]
fn cursor_moves_to_document_end_after_trigger() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["first* ", "second"]).unwrap();
    let first = document.first_block().key;
    let document = document.with_selection(Selection::collapsed(first, 7));

    let output = engine.process(&document);
    assert_eq!(output.first_block().text, "first");
    assert_eq!(
        *output.selection(),
        Selection::collapsed(output.last_block().key, 6)
    );
}

#[test]
fn handle_change_reports_trigger_and_selection() {
    let engine = AutoformatEngine::try_new().unwrap();
    let previous = Document::from_texts(["Hello*"]).unwrap();
    let current = type_text(&previous, " ");

    let processed = engine.handle_change(&TextChange { previous, current });
    assert_eq!(processed.trigger, Some(TriggerKind::Bold));
    assert!(processed.degraded.is_none());
    assert_eq!(processed.selection, *processed.document.selection());
    assert_eq!(processed.document.first_block().text, "Hello");
}

#[test]
fn invalid_selection_keeps_deletion_and_skips_styling() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["Hello* "]).unwrap();
    let stray = Block::new("").key;
    let broken = document.with_selection(Selection::collapsed(stray, 3));

    let previous = Document::from_texts(["Hello"]).unwrap();
    let processed = engine.handle_change(&TextChange {
        previous,
        current: broken,
    });

    assert_eq!(processed.trigger, Some(TriggerKind::Bold));
    assert!(processed.degraded.is_some());
    assert_eq!(processed.document.first_block().text, "Hello");
    assert_eq!(
        processed.selection,
        Selection::collapsed(processed.document.first_block().key, 0)
    );
    assert!(processed.document.style_override().is_none());
}

#[test]
fn input_document_is_never_mutated() {
    let engine = AutoformatEngine::try_new().unwrap();
    let document = Document::from_texts(["keep* "]).unwrap();
    let snapshot = document.clone();

    let _ = engine.process(&document);
    assert_eq!(document, snapshot);
    assert_eq!(document.first_block().text, "keep* ");
}
