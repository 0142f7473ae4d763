//! Integration tests for the per-file pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use lmv_cli::config::WatchConfig;
use lmv_cli::pipeline::{assess_file, process_file};
use lmv_ingest::{Destination, WatchLayout};
use tempfile::TempDir;

const CONTACTS_HEADER: &str = "userId,shouldJoin,joinDate,tierName,tierEntryAt,tierCalcAt,shouldReward";
const VOUCHERS_HEADER: &str = "userId,externalId,voucherType,voucherName,iconName,code,expiration";

fn setup() -> (TempDir, WatchLayout, WatchConfig) {
    let dir = TempDir::new().unwrap();
    let layout = WatchLayout::new(dir.path());
    layout.ensure().unwrap();
    let config = WatchConfig {
        watch_dir: dir.path().to_path_buf(),
        ..WatchConfig::default()
    };
    (dir, layout, config)
}

fn drop_file(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn valid_file_goes_to_success_with_clean_summary() {
    let (dir, layout, config) = setup();
    let content = format!("{CONTACTS_HEADER}\nu1,TRUE,1600000000000,Gold,,,TRUE\nu2,TRUE,1600000000000,,,,FALSE\n");
    let path = drop_file(dir.path(), "contacts.csv", content.as_bytes());

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.total_errors, 0);
    assert_eq!(outcome.routed_to, layout.success_dir().join("contacts.csv"));
    assert!(!path.exists());

    let logs = outcome.logs.unwrap();
    assert_eq!(logs.summary, layout.logs_dir().join("contacts.txt"));
    assert!(logs.details.is_none());
    let summary = read(&logs.summary);
    assert!(summary.contains("VALIDATION REPORT FOR: contacts.csv"));
    assert!(summary.contains("TOTAL ERRORS FOUND: 0"));
    assert!(!summary.contains("1. "));
    assert_eq!(fs::read_dir(layout.logs_dir()).unwrap().count(), 1);
}

#[test]
fn bom_only_file_is_healed_once() {
    let (dir, layout, config) = setup();
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(
        format!("{VOUCHERS_HEADER}\nu1,,one_time,Deal,tag,C1,4000000000000\n").as_bytes(),
    );
    let path = drop_file(dir.path(), "vouchers.csv", &content);

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert!(outcome.healed);
    assert_eq!(outcome.destination, Destination::Success);
    assert_eq!(outcome.source, path);
    assert_eq!(outcome.routed_to, layout.success_dir().join("vouchers_edited.csv"));
    assert!(!path.exists());
    assert!(!dir.path().join("vouchers_edited.csv").exists());

    let healed = fs::read(&outcome.routed_to).unwrap();
    assert!(healed.starts_with(b"userId,"));

    let summary = read(&outcome.logs.unwrap().summary);
    assert!(summary.contains("VALIDATION REPORT FOR: vouchers_edited.csv"));
    assert!(summary.contains("TOTAL ERRORS FOUND: 0"));
}

#[test]
fn bom_heal_creates_a_single_copy_and_empties_the_root() {
    let (dir, layout, config) = setup();
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(
        format!("{CONTACTS_HEADER}\nu1,TRUE,1600000000000,Gold,,,TRUE\n").as_bytes(),
    );
    let path = drop_file(dir.path(), "contacts.csv", &content);

    process_file(&path, &layout, &config).unwrap();

    assert!(lmv_ingest::list_csv_files(dir.path()).unwrap().is_empty());
    let edited: Vec<PathBuf> = [layout.success_dir(), layout.error_dir()]
        .iter()
        .flat_map(|sub| lmv_ingest::list_csv_files(sub).unwrap())
        .filter(|file| file.to_string_lossy().contains("_edited"))
        .collect();
    assert_eq!(edited, vec![layout.success_dir().join("contacts_edited.csv")]);
    assert!(lmv_ingest::list_csv_files(&layout.error_dir()).unwrap().is_empty());
}

#[test]
fn bom_with_row_errors_is_rejected() {
    let (dir, layout, config) = setup();
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(
        format!("{VOUCHERS_HEADER}\nu1,,monthly,Deal,tag,C1,4000000000000\n").as_bytes(),
    );
    let path = drop_file(dir.path(), "vouchers.csv", &content);

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert!(!outcome.healed);
    assert_eq!(outcome.destination, Destination::Error);
    assert_eq!(outcome.total_errors, 2);
    let logs = outcome.logs.unwrap();
    let summary = read(&logs.summary);
    assert!(summary.contains("1. BYTE ORDER MARK (BOM) ERROR"));
    assert!(summary.contains("2. DATA VALIDATION ERRORS"));
    assert!(logs.details.is_some());
}

#[test]
fn semicolon_file_is_validated_and_rejected() {
    let (dir, layout, config) = setup();
    let content = format!(
        "{}\nu1;TRUE;1600000000000;Gold;;;TRUE\n",
        CONTACTS_HEADER.replace(',', ";")
    );
    let path = drop_file(dir.path(), "contacts.csv", content.as_bytes());

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert_eq!(outcome.destination, Destination::Error);
    assert_eq!(outcome.total_errors, 1);
    let logs = outcome.logs.unwrap();
    assert_eq!(logs.summary, layout.logs_dir().join("contacts.txt"));
    assert!(logs.details.is_none());

    let summary = read(&logs.summary);
    assert!(summary.contains("SEPARATOR FORMAT ERROR"));
    assert!(summary.contains("Found: userId; shouldJoin"));
}

#[test]
fn unknown_header_is_rejected_with_diagnostic() {
    let (dir, layout, config) = setup();
    let path = drop_file(dir.path(), "orders.csv", b"orderId,amount\n1,20\n");

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert_eq!(outcome.destination, Destination::Error);
    assert_eq!(outcome.routed_to, layout.error_dir().join("orders.csv"));
    let summary = read(&outcome.logs.unwrap().summary);
    assert!(summary.contains("HEADER FORMAT ERROR"));
    assert!(summary.contains("does not match any of the expected formats"));
}

#[test]
fn empty_file_reports_missing_header() {
    let (dir, layout, config) = setup();
    let path = drop_file(dir.path(), "empty.csv", b"");

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert_eq!(outcome.destination, Destination::Error);
    let summary = read(&outcome.logs.unwrap().summary);
    assert!(summary.contains("No headers found or file is empty"));
}

#[test]
fn duplicate_contacts_flag_every_occurrence() {
    let (dir, layout, config) = setup();
    let content = format!(
        "{CONTACTS_HEADER}\ndup,TRUE,1600000000000,,,,TRUE\nu2,TRUE,1600000000000,,,,TRUE\ndup,TRUE,1600000000000,,,,TRUE\n"
    );
    let path = drop_file(dir.path(), "contacts.csv", content.as_bytes());

    let outcome = process_file(&path, &layout, &config).unwrap();

    assert_eq!(outcome.total_errors, 2);
    let details = read(&outcome.logs.unwrap().details.unwrap());
    assert!(details.contains("#1. ROW 2 VALIDATION ERRORS"));
    assert!(details.contains("#2. ROW 4 VALIDATION ERRORS"));
    assert!(details.contains("Duplicate userId found: dup (rows 2, 4)"));
}

#[test]
fn oversized_file_is_not_read() {
    let (dir, layout, mut config) = setup();
    config.limits.max_bytes = 16;
    let content = format!("{VOUCHERS_HEADER}\nu1,,one_time,Deal,tag,C1,4000000000000\n");
    let path = drop_file(dir.path(), "vouchers.csv", content.as_bytes());

    let assessed = assess_file(&path, &config);
    assert!(assessed.assessment.report.is_none());

    let outcome = process_file(&path, &layout, &config).unwrap();
    assert_eq!(outcome.destination, Destination::Error);
    let summary = read(&outcome.logs.unwrap().summary);
    assert!(summary.contains("FILE SIZE ERROR"));
    assert!(summary.contains("(Maximum: 16 bytes)"));
}

#[test]
fn repeated_names_never_overwrite() {
    let (dir, layout, config) = setup();
    for _ in 0..2 {
        let path = drop_file(dir.path(), "orders.csv", b"orderId\n1\n");
        process_file(&path, &layout, &config).unwrap();
    }

    assert!(layout.error_dir().join("orders.csv").exists());
    assert!(layout.error_dir().join("orders_1.csv").exists());
    assert!(layout.logs_dir().join("orders.txt").exists());
    assert!(layout.logs_dir().join("orders_1.txt").exists());
}
