//! # Export Pipeline Tests
//!
//! End-to-end coverage of the batch pipeline: template in, PDF or ZIP out.
//! Rendering uses the embedded bitmap font so output never depends on the
//! host's installed fonts.

use std::io::{Cursor, Read};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use zip::ZipArchive;

use laurel::document::types::{FieldRole, ImageRef, TextField};
use laurel::{
    BatchExporter, CancelToken, FontLibrary, GraphicObject, ImageResolver, LaurelError,
    TemplateDocument, TemplateStore,
};

/// A small template with one tagged name field, sized for fast rasters.
fn template() -> TemplateDocument {
    let mut doc = TemplateDocument::new(200, 140);
    doc.push(GraphicObject::TextField(TextField::new("Certificate")));
    doc.push(GraphicObject::TextField(TextField {
        y: 60.0,
        width: 200.0,
        font_size: 24.0,
        role: Some(FieldRole::Name),
        ..TextField::new("Participant Name")
    }));
    doc
}

fn exporter_in(dir: &std::path::Path) -> BatchExporter {
    let _ = env_logger::builder().is_test(true).try_init();
    BatchExporter::new(
        ImageResolver::new(dir),
        Arc::new(FontLibrary::embedded_only()),
    )
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn single_name_yields_a_bare_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let output = exporter_in(dir.path())
        .run(&template(), &names(&["Alice"]))
        .await
        .unwrap();

    assert!(!output.is_archive());
    assert_eq!(output.file_name(), "Alice.pdf");
    assert!(output.bytes().starts_with(b"%PDF"), "expected a PDF, not an archive");
}

#[tokio::test]
async fn multi_name_yields_an_archive_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = exporter_in(dir.path())
        .run(&template(), &names(&["Alice", "Bob", "Alice"]))
        .await
        .unwrap();

    assert!(output.is_archive());
    assert_eq!(output.file_name(), "certificates.zip");

    let mut archive = ZipArchive::new(Cursor::new(output.bytes().to_vec())).unwrap();
    assert_eq!(archive.len(), 3);
    let entry_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    // duplicates are preserved, not deduplicated
    assert_eq!(entry_names, vec!["Alice.pdf", "Bob.pdf", "Alice.pdf"]);

    // every entry is an independently valid PDF
    for i in 0..3 {
        let mut entry = archive.by_index(i).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "entry {} is not a PDF", i);
    }
}

#[tokio::test]
async fn empty_participant_list_fails_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let err = exporter_in(dir.path())
        .run(&template(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, LaurelError::Validation(_)));
}

#[tokio::test]
async fn ambiguously_tagged_template_is_rejected() {
    let mut doc = template();
    doc.push(GraphicObject::TextField(TextField {
        role: Some(FieldRole::Name),
        ..TextField::new("second tag")
    }));
    let dir = tempfile::tempdir().unwrap();
    let err = exporter_in(dir.path())
        .run(&doc, &names(&["Alice"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LaurelError::Validation(_)));
}

#[tokio::test]
async fn untagged_template_still_exports() {
    // zero name-role fields: substitution is a silent no-op per contract
    let mut doc = TemplateDocument::new(120, 80);
    doc.push(GraphicObject::TextField(TextField::new("static only")));

    let dir = tempfile::tempdir().unwrap();
    let output = exporter_in(dir.path())
        .run(&doc, &names(&["Alice"]))
        .await
        .unwrap();
    assert!(output.bytes().starts_with(b"%PDF"));
}

#[tokio::test]
async fn cancelled_batch_returns_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = exporter_in(dir.path())
        .run_cancellable(&template(), &names(&["Alice", "Bob"]), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LaurelError::Cancelled));
}

#[tokio::test]
async fn unsafe_participant_names_become_safe_entry_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = exporter_in(dir.path())
        .run(&template(), &names(&["a/b", "Bob"]))
        .await
        .unwrap();

    let archive = ZipArchive::new(Cursor::new(output.bytes().to_vec())).unwrap();
    let entry_names: Vec<&str> = archive.file_names().collect();
    assert!(entry_names.contains(&"a_b.pdf"), "entries: {:?}", entry_names);
}

#[tokio::test]
async fn missing_background_aborts_the_whole_batch() {
    let mut doc = template();
    doc.background = Some(ImageRef::new("does-not-exist.png"));
    let dir = tempfile::tempdir().unwrap();
    let err = exporter_in(dir.path())
        .run(&doc, &names(&["Alice", "Bob"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LaurelError::Render(_)));
}

#[tokio::test]
async fn background_from_the_blob_store_is_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let store = laurel::BackgroundStore::open(dir.path()).unwrap();

    // upload a solid blue background through the blob store
    let mut png_bytes = Vec::new();
    let img = RgbImage::from_pixel(16, 16, Rgb([0, 0, 220]));
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .unwrap();
    let key = store.put("blue.png", &png_bytes).unwrap();

    let mut doc = template();
    doc.background = Some(ImageRef::new(key));

    let output = BatchExporter::new(
        ImageResolver::new(store.dir()),
        Arc::new(FontLibrary::embedded_only()),
    )
    .run(&doc, &names(&["Alice"]))
    .await
    .unwrap();
    assert!(output.bytes().starts_with(b"%PDF"));
}

#[tokio::test]
async fn quality_multiplier_changes_density_not_page_size() {
    let dir = tempfile::tempdir().unwrap();
    let q1 = exporter_in(dir.path())
        .run(&template(), &names(&["Alice"]))
        .await
        .unwrap();
    let q2 = BatchExporter::new(
        ImageResolver::new(dir.path()),
        Arc::new(FontLibrary::embedded_only()),
    )
    .with_quality(2)
    .run(&template(), &names(&["Alice"]))
    .await
    .unwrap();

    assert!(q1.bytes().starts_with(b"%PDF"));
    assert!(q2.bytes().starts_with(b"%PDF"));
    // double density means more pixel data behind the same page
    assert!(q2.bytes().len() > q1.bytes().len());
}

#[tokio::test]
async fn saved_template_exports_after_reload() {
    // the full loop: save → restart → load → bulk export
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("templates.json");
    {
        let store = TemplateStore::open(&store_path).unwrap();
        store.save("Kalsubai", &template()).unwrap();
    }

    let store = TemplateStore::open(&store_path).unwrap();
    let loaded = store.fetch("Kalsubai").unwrap();
    assert!(loaded.name_field().is_some(), "role tag lost in persistence");

    let output = exporter_in(dir.path())
        .run(&loaded, &names(&["Alice", "Bob"]))
        .await
        .unwrap();
    let archive = ZipArchive::new(Cursor::new(output.bytes().to_vec())).unwrap();
    assert_eq!(archive.len(), 2);
}
