use std::time::Instant;

use anyhow::Context;
use hostmap_common::config::Config;
use hostmap_core::import;
use hostmap_core::store::MappingStore;

use crate::terminal::print;

pub fn import(cfg: &Config) -> anyhow::Result<()> {
    let start_time: Instant = Instant::now();
    let store = MappingStore::new(&cfg.data_file);
    let mut mapping = store.load()?;

    let summary = import::import_file(&cfg.import_file, &mut mapping, cfg.address_filter)?;
    store.save(&mapping).context("saving the merged mapping")?;

    print::summary(
        "Import",
        &[
            ("Entries", summary.entries),
            ("New", summary.merged),
            ("Rejected", summary.rejected),
        ],
        start_time.elapsed(),
    );
    Ok(())
}
