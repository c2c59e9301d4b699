use pretty_assertions::assert_eq;
use richtext_core::{
    DocumentChange, EditableDocument, Paragraph, PlainTextChange, ReadOnlyDocument, StyleSpans,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Style {
    S0,
    S1,
}

type Changes = Arc<Mutex<Vec<DocumentChange<(), Style>>>>;

fn record(doc: &mut EditableDocument<(), Style>) -> Changes {
    let changes: Changes = Arc::new(Mutex::new(Vec::new()));
    let changes_cb = changes.clone();
    doc.subscribe(move |change| {
        changes_cb.lock().expect("lock").push(change.clone());
    });
    changes
}

fn paragraph_texts<'a, I>(paragraphs: I) -> Vec<String>
where
    I: Iterator<Item = &'a Paragraph<(), Style>>,
{
    paragraphs.map(Paragraph::text).collect()
}

#[test]
fn test_insert_lines_into_empty_document() {
    let mut doc = EditableDocument::new((), Style::S0);
    let changes = record(&mut doc);

    doc.replace_text(0, 0, "ab\ncd").unwrap();

    assert_eq!(paragraph_texts(doc.paragraphs()), vec!["ab", "cd"]);
    assert_eq!(doc.length(), 5);

    let changes = changes.lock().expect("lock");
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes[0].plain_changes(),
        vec![PlainTextChange::new(0, String::new(), "ab\ncd".to_string())]
    );
}

#[test]
fn test_replace_joins_paragraphs() {
    let mut doc = EditableDocument::from_text("ab\ncd", (), Style::S0);
    assert_eq!(doc.length(), 5);

    doc.replace_text(1, 4, "X").unwrap();

    assert_eq!(doc.text(), "aXd");
    assert_eq!(paragraph_texts(doc.paragraphs()), vec!["aXd"]);
    assert_eq!(doc.length(), 3);
}

#[test]
fn test_restyle_first_character() {
    let mut doc = EditableDocument::from_text("hello", (), Style::S0);

    doc.set_style(0, 1, Style::S1).unwrap();

    let expected = StyleSpans::singleton(Style::S1, 1).append(Style::S0, 4);
    assert_eq!(doc.style_spans(0, 5).unwrap(), expected);
}

#[test]
fn test_multi_change_relative_deletes() {
    let mut doc = EditableDocument::from_text("(text)", (), Style::S0);
    let changes = record(&mut doc);

    let mut builder = doc.create_multi_change(2);
    builder.delete_text(0, 1).delete_text(5, 6);
    builder.commit().unwrap();

    assert_eq!(doc.text(), "text");
    let changes = changes.lock().expect("lock");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].changes.len(), 2);
    assert_eq!(changes[0].snapshot.text(), "text");
}

#[test]
fn test_split_at_paragraph_end_then_concat() {
    let doc = ReadOnlyDocument::from_text("abc\ndef", (), Style::S0);

    let (left, right) = doc.split(3).unwrap();
    assert_eq!(left.text(), "abc");
    assert_eq!(right.text(), "\ndef");

    let joined = left.concat(&right);
    assert_eq!(joined.paragraph_count(), 2);
    assert_eq!(paragraph_texts(joined.paragraphs()), vec!["abc", "def"]);
    assert_eq!(joined, doc);
}
