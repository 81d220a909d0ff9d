//! Property tests for OBJECTS emission over arbitrary dictionary graphs.

mod common;

use acadgraph::io::dxf::EmissionQueue;
use acadgraph::objects::{CadDictionary, ObjectType};
use acadgraph::{CadDocument, CadObject, Handle, ObjectCommon};
use common::*;
use proptest::prelude::*;
use std::collections::HashSet;

/// Dictionaries hung below random parents, plus extra entries between
/// arbitrary pairs. Extra entries may point upwards or at the root.
fn dictionary_graph() -> impl Strategy<Value = (Vec<usize>, Vec<(usize, usize)>)> {
    (1usize..10).prop_flat_map(|count| {
        let parents = (0..count)
            .map(|i| 0..=i)
            .collect::<Vec<_>>();
        let links = prop::collection::vec((0..=count, 0..=count), 0..16);
        (parents, links)
    })
}

/// Build the graph; index 0 is the root dictionary.
fn build(parents: &[usize], links: &[(usize, usize)]) -> (CadDocument, Vec<Handle>) {
    let mut document = CadDocument::new();
    let mut dictionaries = vec![document.root_dictionary_handle().unwrap()];
    for (i, &parent) in parents.iter().enumerate() {
        let handle = document
            .add_object(
                dictionaries[parent],
                format!("D{}", i),
                ObjectType::Dictionary(CadDictionary::new()),
            )
            .unwrap();
        dictionaries.push(handle);
    }
    for (k, &(from, to)) in links.iter().enumerate() {
        // A dictionary listing itself is dropped on load.
        if from == to {
            continue;
        }
        let target = dictionaries[to];
        document
            .get_mut::<CadDictionary>(dictionaries[from])
            .unwrap()
            .insert(format!("LINK{}", k), target);
    }
    (document, dictionaries)
}

proptest! {
    #[test]
    fn every_dictionary_is_written_exactly_once((parents, links) in dictionary_graph()) {
        let (document, dictionaries) = build(&parents, &links);
        let output = write_text(&document);

        for handle in &dictionaries {
            prop_assert_eq!(count_definitions(&output, *handle), 1);
        }
        let total = document
            .objects()
            .filter(|o| matches!(o, CadObject::Object(ObjectType::Dictionary(_))))
            .count();
        prop_assert_eq!(count_records(&output, "DICTIONARY"), total);
    }

    #[test]
    fn cyclic_graphs_survive_a_round_trip((parents, links) in dictionary_graph()) {
        let (document, dictionaries) = build(&parents, &links);
        let first = write_text(&document);
        let loaded = read_bytes(first.clone());

        prop_assert_eq!(loaded.len(), document.len());
        prop_assert_eq!(loaded.root_dictionary_handle(), Some(dictionaries[0]));
        prop_assert!(loaded.is_ownership_acyclic());
        for handle in &dictionaries {
            prop_assert_eq!(
                loaded.get::<CadDictionary>(*handle).map(|d| d.len()),
                document.get::<CadDictionary>(*handle).map(|d| d.len())
            );
        }
        prop_assert_eq!(write_text(&loaded), first);
    }

    #[test]
    fn queue_accepts_each_handle_once(
        handles in prop::collection::vec(1u64..20, 0..60),
        drains in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        let objects: Vec<CadObject> = handles
            .iter()
            .map(|&h| {
                let mut dictionary = CadDictionary::new();
                dictionary.common = ObjectCommon::with_handle(Handle::new(h));
                CadObject::Object(ObjectType::Dictionary(dictionary))
            })
            .collect();

        let mut queue = EmissionQueue::new();
        let mut seen = HashSet::new();
        let mut emitted = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            prop_assert_eq!(queue.enqueue(object), seen.insert(object.handle()));
            if drains.get(i).copied().unwrap_or(false) {
                if let Some(next) = queue.dequeue() {
                    emitted.push(next.handle());
                }
            }
        }
        while let Some(next) = queue.dequeue() {
            emitted.push(next.handle());
        }

        let unique: HashSet<Handle> = emitted.iter().copied().collect();
        prop_assert_eq!(unique.len(), emitted.len());
        prop_assert_eq!(unique, seen);
        prop_assert_eq!(queue.dequeued(), emitted.len());
        prop_assert!(queue.is_empty());
    }
}
