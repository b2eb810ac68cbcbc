#![no_main]

use gettext_msgfmt::mo::MoCatalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = MoCatalog::parse(data); // Err(_) can happen and it's fine.
});
