#![no_main]

use gettext_msgfmt::mo::{serialize, MoCatalog};
use gettext_msgfmt_fuzz::create_catalog;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|entries: Vec<(String, String)>| {
    let catalog = create_catalog(entries);
    let bytes = serialize(&catalog).unwrap();
    let mo = MoCatalog::parse(&bytes).unwrap();
    assert_eq!(mo.iter().collect::<Vec<_>>(), catalog.iter().collect::<Vec<_>>());
});
