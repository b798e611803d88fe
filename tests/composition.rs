// Composition tests: the generate and merge flows end to end.
//
// These chain ingestion -> classification -> reconciliation -> outputs through
// the public API. File-system round trips use a temp directory.

use disavow_sieve::anchors::sources::StaticAnchors;
use disavow_sieve::anchors::traits::AnchorSource;
use disavow_sieve::anchors::SuspiciousAnchorSet;
use disavow_sieve::classify::rules::SpamRuleSet;
use disavow_sieve::disavow::{render_domain_lines, DisavowFile};
use disavow_sieve::ingest::TableInput;
use disavow_sieve::output::{write_generate_outputs, DETAIL_EXPORT_FILE, DISAVOW_LIST_FILE};
use disavow_sieve::pipeline::generate::{self, GenerateReport, TableBatch};
use disavow_sieve::pipeline::merge;
use disavow_sieve::DisavowError;

const SPAMMY_EXPORT: &str = "Source URL,Anchor Text\nhttp://spammy-seo.biz/page,buy backlinks cheap\n";

fn run_generate(tables: &[(&str, &str)], anchors: &SuspiciousAnchorSet, disavow: &str) -> GenerateReport {
    let mut batch = TableBatch::new();
    for (name, body) in tables {
        batch.push(TableInput::new(*name, *body));
    }
    generate::run(
        &batch,
        &SpamRuleSet::builtin().unwrap(),
        anchors,
        &DisavowFile::parse(disavow),
    )
    .unwrap()
}

// ============================================================
// Generate
// ============================================================

#[test]
fn spammy_row_without_existing_disavow_is_listed() {
    let report = run_generate(&[("links.csv", SPAMMY_EXPORT)], &SuspiciousAnchorSet::default(), "");
    assert_eq!(report.final_domains, vec!["spammy-seo.biz"]);
    assert_eq!(render_domain_lines(&report.final_domains), "domain:spammy-seo.biz");
}

#[test]
fn spammy_row_already_disavowed_is_not_listed() {
    let report = run_generate(
        &[("links.csv", SPAMMY_EXPORT)],
        &SuspiciousAnchorSet::default(),
        "domain:spammy-seo.biz",
    );
    assert!(report.final_domains.is_empty());
    assert!(report.matches.is_empty());
    assert_eq!(report.excluded_existing, 1);
}

#[test]
fn mixed_exports_are_combined() {
    let ahrefs = "Referring Page URL,Anchor,Left context,Right context\n\
                  http://www.blog.example/post,great article,,\n\
                  http://escort-links.net/x,click,hot escort,here\n";
    let semrush = "Source url,Anchor\nhttps://casino-hub.io/a,Best Casino Bonus\n";
    let broken = "Page,Title\nhttp://x.com,hi\n";

    let anchors = SuspiciousAnchorSet::from_phrases(["casino"]);
    let report = run_generate(
        &[("ahrefs.csv", ahrefs), ("semrush.csv", semrush), ("broken.csv", broken)],
        &anchors,
        "# existing\n",
    );

    assert_eq!(report.tables_used, vec!["ahrefs.csv", "semrush.csv"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.records_scanned, 3);
    assert_eq!(report.final_domains, vec!["casino-hub.io", "escort-links.net"]);
    assert_eq!(report.hit_counts.get("adult"), Some(&1));
    assert_eq!(report.hit_counts.get("suspicious-anchor"), Some(&1));
}

#[test]
fn idn_domain_already_disavowed_is_not_listed() {
    let export = "Source URL,Anchor\nhttp://www.bücher-spam.de/p,buy backlinks\n";
    let report = run_generate(
        &[("links.csv", export)],
        &SuspiciousAnchorSet::default(),
        "domain:bücher-spam.de",
    );
    assert!(report.final_domains.is_empty());
    assert_eq!(report.excluded_existing, 1);
}

#[test]
fn idn_domain_is_listed_in_unicode_form() {
    let export = "Source URL,Anchor\nhttp://www.bücher-spam.de/p,buy backlinks\n";
    let report = run_generate(&[("links.csv", export)], &SuspiciousAnchorSet::default(), "");
    assert_eq!(report.final_domains, vec!["bücher-spam.de"]);
}

#[tokio::test]
async fn injected_anchor_source_feeds_the_classifier() {
    let source = StaticAnchors::new(["replica watches"]);
    let anchors = source.load().await.unwrap();

    let export = "Source URL,Anchor\nhttp://shop.example/w,Cheap Replica Watches\n";
    let report = run_generate(&[("links.csv", export)], &anchors, "");
    assert_eq!(report.final_domains, vec!["shop.example"]);
}

#[test]
fn no_usable_tables_aborts() {
    let mut batch = TableBatch::new();
    batch.push(TableInput::new("empty.csv", ""));
    let err = generate::run(
        &batch,
        &SpamRuleSet::builtin().unwrap(),
        &SuspiciousAnchorSet::default(),
        &DisavowFile::empty(),
    )
    .unwrap_err();
    assert!(matches!(err, DisavowError::NoUsableTables { skipped: 1 }));
}

// ============================================================
// Generate -> review workbook -> merge
// ============================================================

#[test]
fn generated_outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_generate(&[("links.csv", SPAMMY_EXPORT)], &SuspiciousAnchorSet::default(), "");

    let files = write_generate_outputs(dir.path(), &report).unwrap();
    assert_eq!(files.disavow_list, dir.path().join(DISAVOW_LIST_FILE));
    assert_eq!(files.detail_export, dir.path().join(DETAIL_EXPORT_FILE));

    let list = std::fs::read_to_string(&files.disavow_list).unwrap();
    assert_eq!(list, "domain:spammy-seo.biz");
    assert!(std::fs::metadata(&files.detail_export).unwrap().len() > 0);
}

#[test]
fn failed_export_write_leaves_no_disavow_list() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join(DETAIL_EXPORT_FILE);
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), "x").unwrap();

    let report = run_generate(&[("links.csv", SPAMMY_EXPORT)], &SuspiciousAnchorSet::default(), "");
    assert!(write_generate_outputs(dir.path(), &report).is_err());
    assert!(!dir.path().join(DISAVOW_LIST_FILE).exists());
}

#[test]
fn review_workbook_merges_back_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let export = "Source URL,Anchor Text\n\
                  http://spammy-seo.biz/page,buy backlinks cheap\n\
                  http://www.pills.example/p,erectile help\n";
    let report = run_generate(&[("links.csv", export)], &SuspiciousAnchorSet::default(), "");
    let files = write_generate_outputs(dir.path(), &report).unwrap();

    let existing = "# site disavow\ndomain:old-spam.com";
    let first = merge::run(&files.detail_export, existing).unwrap();
    assert_eq!(first.reviewed, 2);
    assert_eq!(first.newly_added, vec!["pills.example", "spammy-seo.biz"]);
    assert_eq!(
        first.content,
        "# site disavow\ndomain:old-spam.com\ndomain:pills.example\ndomain:spammy-seo.biz"
    );

    let second = merge::run(&files.detail_export, &first.content).unwrap();
    assert_eq!(second.newly_added.len(), 0);
    assert_eq!(second.already_present.len(), 2);
    assert_eq!(second.content, first.content);
}

#[test]
fn workbook_without_details_sheet_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Something Else").unwrap();
    sheet.write_string(0, 0, "referring_domain").unwrap();
    workbook.save(&path).unwrap();

    let err = merge::run(&path, "").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DisavowError>(),
        Some(DisavowError::MissingSheet { .. })
    ));
}

#[test]
fn details_sheet_without_domain_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pruned.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Disavow Details").unwrap();
    sheet.write_string(0, 0, "Referring Domain").unwrap();
    sheet.write_string(1, 0, "spam.com").unwrap();
    workbook.save(&path).unwrap();

    let err = merge::run(&path, "domain:x.com").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DisavowError>(),
        Some(DisavowError::MissingColumn { .. })
    ));
}
