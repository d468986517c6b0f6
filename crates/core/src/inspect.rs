#![allow(missing_docs)]
//! Serializable snapshots of a node, for diagnostics and tests.

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Address;
use crate::dht::ChordState;
use crate::dht::Pointer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordInspect {
    pub id: u64,
    pub address: String,
    pub dead: bool,
    pub successors: Vec<String>,
    #[serde(default)]
    pub predecessor: Option<String>,
    /// Runs of equal fingers as `(node, first index, last index)`.
    pub finger_table: Vec<(String, u64, u64)>,
}

impl ChordInspect {
    pub fn inspect(state: &ChordState, address: &Address) -> Self {
        let successors = state
            .successor_table()
            .dump()
            .iter()
            .map(pointer_to_string)
            .collect();

        let predecessor = state.predecessor().map(|p| p.id.to_string());

        let finger_table = {
            let finger = state.finger_table().dump();
            compress_iter(finger.iter().map(pointer_to_string))
        };

        Self {
            id: state.id().value(),
            address: address.to_string(),
            dead: state.is_dead(),
            successors,
            predecessor,
            finger_table,
        }
    }

    /// Ids of the successor list.
    pub fn successor_ids(&self) -> Vec<u64> {
        self.successors
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect()
    }
}

fn pointer_to_string(p: &Pointer) -> String {
    p.id().to_string()
}

pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut result = vec![];
    let mut start = 0u64;
    let mut count = 0u64;
    let mut prev: Option<T> = None;

    for (i, x) in iter.enumerate() {
        match prev {
            Some(p) if p == x => {
                count += 1;
            }
            _ => {
                if let Some(p) = prev {
                    result.push((p, start, start + count - 1));
                }
                start = i as u64;
                count = 1;
            }
        }
        prev = Some(x);
    }

    if let Some(p) = prev {
        result.push((p, start, start + count - 1));
    }

    result
}
