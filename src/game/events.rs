//! Game Events
//!
//! Events generated during simulation. Audio cues travel the same channel:
//! the simulation never plays sound itself, it records which cue fired and
//! the driver decides what to do with it.

use serde::{Serialize, Deserialize};
use crate::core::vec2::Vec2;
use crate::game::bacterium::BacteriumKind;
use crate::game::entity::EntityId;
use crate::game::goodie::GoodieKind;

/// Named audio cue, fire-and-forget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Player took non-lethal damage
    PlayerHurt,
    /// Player died
    PlayerDie,
    /// Player fired a spray
    PlayerSpray,
    /// Player fired the flamethrower
    PlayerFire,
    /// Salmonella survived a hit
    SalmonellaHurt,
    /// Salmonella killed
    SalmonellaDie,
    /// E. coli survived a hit
    EcoliHurt,
    /// E. coli killed
    EcoliDie,
    /// A bacterium entered the dish
    BacteriumBorn,
    /// Player picked up a beneficial goodie
    GotGoodie,
}

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Player death and level transitions first
    Outcome = 0,
    /// Then damage and kills
    Combat = 1,
    /// Then pickups and feeding
    Pickup = 2,
    /// Then spawns and releases
    Spawn = 3,
    /// Audio cues last
    Cue = 4,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Audio cue fired
    CuePlayed {
        /// Cue that fired
        cue: Cue,
    },

    /// Pit released a bacterium
    BacteriumReleased {
        /// Releasing pit
        pit_id: EntityId,
        /// Bacterium involved
        bacterium_id: EntityId,
        /// Bacterium kind
        kind: BacteriumKind,
    },

    /// Bacterium divided after feeding
    BacteriumDivided {
        /// Dividing bacterium
        parent_id: EntityId,
        /// Offspring
        child_id: EntityId,
        /// Bacterium kind
        kind: BacteriumKind,
    },

    /// Bacterium hit points reached zero
    BacteriumKilled {
        /// Bacterium involved
        bacterium_id: EntityId,
        /// Bacterium kind
        kind: BacteriumKind,
        /// Where it died
        position: Vec2,
        /// Whether food was left behind
        dropped_food: bool,
    },

    /// Bacterium ate a food item
    FoodConsumed {
        /// Bacterium involved
        bacterium_id: EntityId,
        /// Food eaten
        food_id: EntityId,
    },

    /// Goodie appeared on the rim
    GoodieSpawned {
        /// Goodie involved
        goodie_id: EntityId,
        /// Goodie kind
        kind: GoodieKind,
        /// Ticks before expiry
        lifetime: u32,
    },

    /// Player picked up a goodie
    GoodieCollected {
        /// Goodie involved
        goodie_id: EntityId,
        /// Goodie kind
        kind: GoodieKind,
        /// Score change applied
        score_delta: i64,
    },

    /// Goodie lifetime ran out
    GoodieExpired {
        /// Goodie involved
        goodie_id: EntityId,
        /// Goodie kind
        kind: GoodieKind,
    },

    /// Player health changed through damage
    PlayerDamaged {
        /// Hit points lost
        amount: i32,
        /// Health afterwards
        health: i32,
    },

    /// A pit emptied its inventory and collapsed
    PitExhausted {
        /// Emptied pit
        pit_id: EntityId,
    },

    /// Every pit has released its whole inventory
    ReleaseComplete,

    /// Player died this tick
    PlayerDied,

    /// Level finished
    LevelComplete {
        /// Level just completed
        level: u32,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Order of emission within the tick (tie-break)
    pub sequence: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event. The world assigns `sequence` when it is pushed.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let priority = match &data {
            GameEventData::PlayerDied
            | GameEventData::LevelComplete { .. }
            | GameEventData::ReleaseComplete => EventPriority::Outcome,
            GameEventData::BacteriumKilled { .. }
            | GameEventData::PlayerDamaged { .. } => EventPriority::Combat,
            GameEventData::FoodConsumed { .. }
            | GameEventData::GoodieCollected { .. }
            | GameEventData::GoodieExpired { .. } => EventPriority::Pickup,
            GameEventData::BacteriumReleased { .. }
            | GameEventData::BacteriumDivided { .. }
            | GameEventData::GoodieSpawned { .. }
            | GameEventData::PitExhausted { .. } => EventPriority::Spawn,
            GameEventData::CuePlayed { .. } => EventPriority::Cue,
        };

        Self {
            tick,
            priority,
            sequence: 0,
            data,
        }
    }

    /// The cue carried by this event, if it is one.
    pub fn as_cue(&self) -> Option<Cue> {
        match self.data {
            GameEventData::CuePlayed { cue } => Some(cue),
            _ => None,
        }
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.sequence == other.sequence
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then emission order
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.sequence.cmp(&other.sequence))
    }
}
