use pretty_assertions::assert_eq;
use richtext_core::{Bias, EditableDocument, LineTerminator, Position, ReadOnlyDocument};

fn terminators(doc: &EditableDocument<(), ()>) -> Vec<LineTerminator> {
    doc.paragraphs().map(|p| p.terminator()).collect()
}

#[test]
fn test_mixed_terminators_are_content() {
    let doc = EditableDocument::from_text("a\r\nb\rc\nd", (), ());
    assert_eq!(doc.paragraph_count(), 4);
    assert_eq!(doc.length(), 8);
    assert_eq!(
        terminators(&doc),
        vec![
            LineTerminator::Crlf,
            LineTerminator::Cr,
            LineTerminator::Lf,
            LineTerminator::None
        ]
    );
    assert_eq!(doc.text(), "a\r\nb\rc\nd");
}

#[test]
fn test_positions_around_crlf() {
    let doc = ReadOnlyDocument::from_text("ab\r\ncd", (), ());
    assert_eq!(doc.offset_to_position(3, Bias::Forward).unwrap(), Position::new(0, 3));
    assert_eq!(doc.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
    assert_eq!(doc.offset_to_position(4, Bias::Backward).unwrap(), Position::new(0, 4));
    assert_eq!(doc.position_to_offset(Position::new(0, 4)).unwrap(), 4);
    assert_eq!(doc.position_to_offset(Position::new(1, 2)).unwrap(), 6);
    assert!(doc.position_to_offset(Position::new(0, 5)).is_err());
    assert!(doc.offset_to_position(7, Bias::Forward).is_err());
}

#[test]
fn test_typing_cr_before_lf_fuses() {
    let mut doc = EditableDocument::from_text("a\nb", (), ());
    doc.insert_text(1, "\r").unwrap();
    assert_eq!(doc.paragraph_count(), 2);
    assert_eq!(terminators(&doc), vec![LineTerminator::Crlf, LineTerminator::None]);
}

#[test]
fn test_typing_lf_after_cr_fuses() {
    let mut doc = EditableDocument::from_text("a\rb", (), ());
    doc.insert_text(2, "\n").unwrap();
    assert_eq!(doc.text(), "a\r\nb");
    assert_eq!(terminators(&doc), vec![LineTerminator::Crlf, LineTerminator::None]);
}

#[test]
fn test_deleting_half_of_crlf() {
    let mut doc = EditableDocument::from_text("a\r\nb", (), ());
    doc.delete_text(2, 3).unwrap();
    assert_eq!(doc.text(), "a\rb");
    assert_eq!(terminators(&doc), vec![LineTerminator::Cr, LineTerminator::None]);

    let mut doc = EditableDocument::from_text("a\r\nb", (), ());
    doc.delete_text(1, 2).unwrap();
    assert_eq!(doc.text(), "a\nb");
    assert_eq!(terminators(&doc), vec![LineTerminator::Lf, LineTerminator::None]);
}

#[test]
fn test_inserting_between_cr_and_lf() {
    let mut doc = EditableDocument::from_text("a\r\nb", (), ());
    doc.insert_text(2, "x").unwrap();
    assert_eq!(doc.text(), "a\rx\nb");
    assert_eq!(doc.paragraph_count(), 3);

    doc.delete_text(2, 3).unwrap();
    assert_eq!(doc.text(), "a\r\nb");
    assert_eq!(doc.paragraph_count(), 2);
}

#[test]
fn test_trailing_terminator_leaves_empty_last_paragraph() {
    let mut doc = EditableDocument::from_text("line", (), ());
    doc.insert_text(4, "\r\n").unwrap();
    assert_eq!(doc.paragraph_count(), 2);
    assert_eq!(doc.paragraph(1).unwrap().text(), "");
    assert_eq!(doc.length(), 6);

    doc.delete_text(4, 6).unwrap();
    assert_eq!(doc.paragraph_count(), 1);
    assert_eq!(terminators(&doc), vec![LineTerminator::None]);
}

#[test]
fn test_sub_document_of_terminator_only() {
    let doc = ReadOnlyDocument::from_text("a\r\nb", (), ());
    let sub = doc.sub_document(1, 3).unwrap();
    assert_eq!(sub.text(), "\r\n");
    assert_eq!(sub.paragraph_count(), 2);
    assert_eq!(sub.char_count(), 0);
    assert_eq!(doc.text_range(2, 4).unwrap(), "\nb");
}

#[test]
fn test_editing_inside_empty_crlf_paragraph() {
    let mut doc = EditableDocument::from_text("\r\n", (), "s0");
    assert_eq!(doc.style_at_position(1).unwrap(), &"s0");

    doc.replace_text(1, 1, "x").unwrap();
    assert_eq!(doc.text(), "\rx\n");
    assert_eq!(doc.paragraph_count(), 3);
    assert_eq!(doc.style_at_position(2).unwrap(), &"s0");
}

#[test]
fn test_style_between_cr_and_lf_of_empty_paragraph() {
    let doc = ReadOnlyDocument::from_text("a\n\r\nb", (), "s0");
    assert_eq!(doc.style_at_position(3).unwrap(), &"s0");
    assert_eq!(doc.style_at_position(2).unwrap(), &"s0");
}
