//! Integration tests: both export back ends over the sample document.

use anchor_core::{Anchor, AnchorStore, UnitId, parse_document};
use anchor_export::{ExportError, ExportPipeline, FetchError, StaticSource, WordEntry};
use pretty_assertions::assert_eq;

const STORY: &str = include_str!("fixtures/story.xml");

fn store_of(anchors: &[(&str, u64)]) -> AnchorStore {
    let mut store = AnchorStore::new();
    for (id, ms) in anchors {
        store.put(Anchor::new(UnitId::intern(id), *ms, ""));
    }
    store
}

// ─── Markup merge ────────────────────────────────────────────────────────

#[tokio::test]
async fn merge_fixture() {
    let pipeline = ExportPipeline::new(StaticSource::new(STORY));
    let store = store_of(&[("w1", 0), ("w6", 2100), ("w7", 3300)]);

    let report = pipeline.merge(&store).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.merged, 3);

    let expected = STORY
        .replace(
            r#"<w id="w1">The</w>"#,
            r#"<w id="w1"><anchor time="0s"/>The</w>"#,
        )
        .replace(
            r#"<w id="w6"></w>"#,
            r#"<w id="w6"><anchor time="2100s"/></w>"#,
        )
        .replace(
            r#"<w id="w7">Fish &amp; chips</w>"#,
            r#"<w id="w7"><anchor time="3300s"/>Fish &amp; chips</w>"#,
        );
    assert_eq!(report.xml, expected);
}

#[tokio::test]
async fn merged_output_still_parses() {
    let pipeline = ExportPipeline::new(StaticSource::new(STORY));
    let report = pipeline
        .merge(&store_of(&[("w2", 500), ("w8", 900)]))
        .await
        .unwrap();
    let doc = parse_document(&report.xml).unwrap();
    assert_eq!(doc.words().len(), 8);
}

#[tokio::test]
async fn stale_anchor_reports_exactly_one_skip() {
    let pipeline = ExportPipeline::new(StaticSource::new(STORY));
    let report = pipeline
        .merge(&store_of(&[("w3", 10), ("w42", 20), ("w5", 30)]))
        .await
        .unwrap();
    assert_eq!(report.merged, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].target, UnitId::intern("w42"));
}

#[tokio::test]
async fn fetch_failure_aborts() {
    let pipeline = ExportPipeline::new(StaticSource::unavailable());
    let err = pipeline.merge(&store_of(&[("w1", 1)])).await.unwrap_err();
    assert!(matches!(err, ExportError::Fetch(FetchError::Unavailable(_))));
}

// ─── Structured snapshot ─────────────────────────────────────────────────

#[test]
fn snapshot_fixture() {
    let doc = parse_document(STORY).unwrap();
    let pipeline = ExportPipeline::new(StaticSource::unavailable());
    let snap = pipeline.snapshot(&doc, &store_of(&[("w2", 800), ("w7", 1600)]));

    let word = |text: &str, anchor_ms| WordEntry {
        text: text.into(),
        anchor_ms,
    };
    assert_eq!(
        snap.pages,
        vec![
            vec![vec![
                vec![word("The", 0), word("cat", 800), word("sat.", 0)],
                vec![word("It", 0), word("purred", 0), word("", 0)],
            ]],
            // The empty paragraph pr3 is omitted.
            vec![vec![vec![word("Fish &amp; chips", 1600), word("&lt;3", 0)]]],
        ]
    );
    assert_eq!(snap.word_count(), 8);
}
