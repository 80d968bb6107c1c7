//! Bacteria Pits
//!
//! A pit holds a fixed stock of each bacterium kind and trickles them into
//! the dish at random. Once empty it collapses and tells the world.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::game::bacterium::BacteriumKind;
use crate::game::config::PitConfig;
use crate::game::entity::{Entity, EntityKind};
use crate::game::events::GameEventData;
use crate::game::state::WorldState;

/// What a pit still holds.
///
/// `available` contains exactly the kinds whose pool is non-zero, so the
/// total is zero exactly when the set is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitInventory {
    /// Regular salmonella left
    pub regular_salmonella: u32,
    /// Aggressive salmonella left
    pub aggressive_salmonella: u32,
    /// E. coli left
    pub ecoli: u32,
    /// Kinds with a non-empty pool (ordered for deterministic selection)
    pub available: BTreeSet<BacteriumKind>,
}

impl PitInventory {
    /// Stock a pit.
    pub fn from_config(config: &PitConfig) -> Self {
        let mut inventory = Self {
            regular_salmonella: config.regular_salmonella,
            aggressive_salmonella: config.aggressive_salmonella,
            ecoli: config.ecoli,
            available: BTreeSet::new(),
        };
        for kind in BacteriumKind::ALL {
            if inventory.remaining(kind) > 0 {
                inventory.available.insert(kind);
            }
        }
        inventory
    }

    /// Count left of one kind.
    pub fn remaining(&self, kind: BacteriumKind) -> u32 {
        match kind {
            BacteriumKind::RegularSalmonella => self.regular_salmonella,
            BacteriumKind::AggressiveSalmonella => self.aggressive_salmonella,
            BacteriumKind::Ecoli => self.ecoli,
        }
    }

    /// Total left.
    pub fn total(&self) -> u32 {
        self.regular_salmonella
            .saturating_add(self.aggressive_salmonella)
            .saturating_add(self.ecoli)
    }

    /// Remove one of `kind`. Returns false if that pool was already empty.
    pub fn take(&mut self, kind: BacteriumKind) -> bool {
        let pool = match kind {
            BacteriumKind::RegularSalmonella => &mut self.regular_salmonella,
            BacteriumKind::AggressiveSalmonella => &mut self.aggressive_salmonella,
            BacteriumKind::Ecoli => &mut self.ecoli,
        };
        if *pool == 0 {
            return false;
        }
        *pool -= 1;
        if *pool == 0 {
            self.available.remove(&kind);
        }
        true
    }
}

/// Run one tick for a pit.
///
/// An empty pit dies and signals; otherwise it releases one bacterium with
/// probability `1 / release_odds`, kind chosen uniformly among those left.
pub fn act_pit(entity: &mut Entity, world: &mut WorldState, release_odds: u32) {
    let (id, position) = (entity.id, entity.position);
    let EntityKind::Pit(inventory) = &mut entity.kind else {
        return;
    };

    if inventory.total() == 0 {
        entity.alive = false;
        world.signal_pit_exhausted(id);
        return;
    }

    if world.rng.next_int_range(1, release_odds.min(i32::MAX as u32) as i32) != 1 {
        return;
    }

    let kinds: Vec<BacteriumKind> = inventory.available.iter().copied().collect();
    let Some(&kind) = world.rng.choose(&kinds) else {
        return;
    };

    if inventory.take(kind) {
        let bacterium_id = world.spawn_bacterium(kind, position);
        world.push_event(GameEventData::BacteriumReleased {
            pit_id: id,
            bacterium_id,
            kind,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
