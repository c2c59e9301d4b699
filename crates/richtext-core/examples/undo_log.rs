//! Undo log example
//!
//! Records the change records emitted by an `EditableDocument` and replays them backwards.
//! Run with `RUST_LOG=debug` to see the notifications logged by the document.

use richtext_core::{EditableDocument, RichTextChange};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Style {
    Plain,
    Emphasis,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut doc = EditableDocument::from_text("Hello world", (), Style::Plain);

    let log: Arc<Mutex<Vec<RichTextChange<(), Style>>>> = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    doc.subscribe(move |change| {
        println!(
            "  change (version {} -> {}): {:?}",
            change.old_version,
            change.new_version,
            change.plain_changes()
        );
        log_clone.lock().unwrap().extend(change.changes.iter().cloned());
    });

    println!("1. Editing:");
    doc.insert_text(5, ",").unwrap();
    doc.set_style(7, 12, Style::Emphasis).unwrap();
    doc.insert_text(12, "!\nSecond line").unwrap();
    print_document(&doc);

    println!("\n2. Multi-change (one notification):");
    let mut builder = doc.create_multi_change(2);
    builder.replace_text(0, 5, "Goodbye").delete_text(13, 25);
    builder.commit().unwrap();
    print_document(&doc);

    println!("\n3. Undoing everything:");
    let changes: Vec<_> = log.lock().unwrap().drain(..).collect();
    for change in changes.iter().rev() {
        let undo = change.invert();
        doc.replace(undo.position(), undo.removal_end(), undo.inserted())
            .unwrap();
    }
    print_document(&doc);
}

fn print_document(doc: &EditableDocument<(), Style>) {
    println!("  text: {:?}", doc.text());
    for (i, paragraph) in doc.paragraphs().enumerate() {
        let runs: Vec<_> = paragraph
            .segments()
            .iter()
            .map(|s| format!("{:?}:{:?}", s.style(), s.text()))
            .collect();
        println!("  paragraph {i}: {}", runs.join(" "));
    }
}
