#![no_main]

//! Catalog parser fuzzer.
//!
//! Arbitrary text must either fail to load or produce a catalog that
//! serializes and reloads to the same entries.

use deepfield::BodyCatalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(catalog) = BodyCatalog::from_json_str(text) else {
        return;
    };

    let json = catalog.to_json_string().expect("loaded catalog serializes");
    let reloaded = BodyCatalog::from_json_str(&json).expect("serialized catalog reloads");
    assert_eq!(reloaded.len(), catalog.len());
    for definition in catalog.iter() {
        assert_eq!(
            reloaded.get(definition.kind).map(|d| d.as_ref()),
            Some(definition.as_ref())
        );
    }
});
