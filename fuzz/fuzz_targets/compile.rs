#![no_main]

use gettext_msgfmt::mo::MoCatalog;
use gettext_msgfmt::{compile, CompileOptions};
use gettext_msgfmt_fuzz::{create_po, PoMessage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|inputs: (Vec<PoMessage>, bool)| {
    let (messages, use_fuzzy) = inputs;
    let text = create_po(&messages);
    // Err(_) can happen and it's fine.
    if let Ok(compiled) = compile(&text, &CompileOptions { use_fuzzy }) {
        let mo = MoCatalog::parse(&compiled.bytes).expect("compiled catalog is readable");
        assert!(mo.header().is_some());
    }
});
