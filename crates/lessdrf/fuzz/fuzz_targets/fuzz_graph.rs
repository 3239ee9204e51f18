//! Fuzz target for OBO-Graphs JSON loading and tree building.
//!
//! Arbitrary JSON must either fail to load or produce a tree in which every
//! label is placed once.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lessdrf::ontology::{GraphSource, OntologyGraphIndex, SubclassTreeBuilder, TraversalRules};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(index) = OntologyGraphIndex::from_slice(data) else {
        return;
    };

    let rules = TraversalRules::default();
    let builder = SubclassTreeBuilder::new(GraphSource::new(&index, &rules));
    for edge in index.edges().iter().take(4) {
        if let Ok(tree) = builder.build(&edge.object, "root") {
            assert_eq!(tree.flatten().len(), tree.len());
        }
    }
});
