use std::fs;

use hostmap_common::config::Config;
use hostmap_common::error::{ImportError, StoreError};
use hostmap_common::policy::AddressFilter;
use hostmap_core::import::import_file;
use hostmap_core::pipeline::validate_hosts;
use hostmap_core::store::{MappingStore, write_listing};
use tempfile::TempDir;

use crate::utils::{self, ScriptedProber};

#[tokio::test]
async fn build_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let store = MappingStore::new(dir.path().join("data.json"));
    let hosts_path = dir.path().join("hosts");
    let cfg = Config::default();

    store
        .save(&utils::mapping(&[
            ("a.com", &[("1.1.1.1", 0), ("1.1.1.2", 3)]),
            ("b.com", &[("2.2.2.2", 1)]),
        ]))
        .unwrap();

    let mut mapping = store.load().unwrap();
    let prober = ScriptedProber::new([("1.1.1.1", true), ("2.2.2.2", true)]);
    let mut outcome = validate_hosts(&mut mapping, prober, &cfg, None).await;
    store.save(&mapping).unwrap();
    write_listing(&hosts_path, &outcome.listing.render(cfg.sort_key)).unwrap();

    assert_eq!(
        store.load().unwrap(),
        utils::mapping(&[("a.com", &[("1.1.1.1", 0)]), ("b.com", &[("2.2.2.2", 0)])])
    );
    assert_eq!(
        fs::read_to_string(&hosts_path).unwrap(),
        "1.1.1.1         a.com\n2.2.2.2         b.com\n"
    );
}

#[test]
fn saved_file_is_tab_indented() {
    let dir = TempDir::new().unwrap();
    let store = MappingStore::new(dir.path().join("data.json"));
    store.save(&utils::mapping(&[("x.org", &[("9.9.9.9", 1)])])).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    assert_eq!(raw, "{\n\t\"x.org\": {\n\t\t\"9.9.9.9\": 1\n\t}\n}");
}

#[test]
fn load_reports_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();

    let missing = MappingStore::new(dir.path().join("absent.json"));
    assert!(matches!(missing.load(), Err(StoreError::Read { .. })));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"a.com\": [\"1.1.1.1\"]}").unwrap();
    assert!(matches!(MappingStore::new(&broken).load(), Err(StoreError::Parse { .. })));
}

#[test]
fn import_then_save() {
    let dir = TempDir::new().unwrap();
    let store = MappingStore::new(dir.path().join("data.json"));
    let import = dir.path().join("hosts.txt");
    fs::write(
        &import,
        "# pinned\n140.82.112.3 github.com\n140.82.112.3 github.com\nfe80::1 github.com\n10.0.0.9 intranet",
    )
    .unwrap();

    let mut mapping = utils::mapping(&[("github.com", &[("140.82.112.4", 2)])]);
    let summary = import_file(&import, &mut mapping, AddressFilter::ContainsDot).unwrap();
    store.save(&mapping).unwrap();

    assert_eq!((summary.entries, summary.merged, summary.rejected), (4, 2, 1));
    assert_eq!(
        store.load().unwrap(),
        utils::mapping(&[
            ("github.com", &[("140.82.112.3", 0), ("140.82.112.4", 2)]),
            ("intranet", &[("10.0.0.9", 0)]),
        ])
    );
}

#[test]
fn import_of_missing_file_or_directory() {
    let dir = TempDir::new().unwrap();
    let mut mapping = utils::mapping(&[("a.com", &[])]);

    let err = import_file(&dir.path().join("nope.txt"), &mut mapping, AddressFilter::ContainsDot);
    assert!(matches!(err, Err(ImportError::Stat { .. })));

    let skipped = import_file(dir.path(), &mut mapping, AddressFilter::ContainsDot).unwrap();
    assert_eq!(skipped.entries, 0);
    assert_eq!(mapping, utils::mapping(&[("a.com", &[])]));
}
