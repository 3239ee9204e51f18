//! Fuzz target for the OBO flat-file parser.
//!
//! This fuzzer tests that the parser:
//! 1. Never panics on malformed stanzas or tag lines
//! 2. Builds trees from whatever terms it accepted without looping

#![no_main]

use libfuzzer_sys::fuzz_target;
use lessdrf::ontology::SubclassTreeBuilder;
use lessdrf::OboOntology;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(obo) = OboOntology::parse(data) else {
        return;
    };

    let ids: Vec<String> = obo.terms().map(|t| t.id.clone()).take(4).collect();
    for id in ids {
        let _ = obo.subclasses_of(&id, 8);
        let _ = SubclassTreeBuilder::new(&obo).build(&id, "root");
    }
});
