//! Entity Records
//!
//! Every registry object is one flat `Entity` tagged with an `EntityKind`.
//! Behavior is dispatched on the tag; what other objects may do *to* an
//! entity is described by its capability flags.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{Vec2, normalize_degrees};
use crate::core::hash::StateHasher;
use crate::game::bacterium::{BacteriumFamily, BacteriumState};
use crate::game::goodie::{GoodieKind, GoodieState};
use crate::game::pit::PitInventory;
use crate::game::projectile::{ProjectileKind, ProjectileState};

// =============================================================================
// ENTITY ID
// =============================================================================

/// Stable registry handle.
///
/// Ids are handed out monotonically, so registry order (BTreeMap key order)
/// is creation order, and an id is never reused within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Capability flags (packed bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities
    pub const NONE: Self = Self(0);

    /// Counts toward the live-bacteria total; first target for projectiles
    pub const BACTERIUM: Self = Self(0x01);

    /// Can be eaten by bacteria
    pub const FOOD: Self = Self(0x02);

    /// Can be damaged by projectiles
    pub const DESTRUCTIBLE: Self = Self(0x04);

    /// Bacteria cannot move onto it
    pub const BLOCKS_MOVEMENT: Self = Self(0x08);

    /// Combine two flag sets.
    #[inline]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

// =============================================================================
// DRAWING CONTRACT
// =============================================================================

/// Draw layer: lower layers are drawn on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum DrawLayer {
    /// Player and bacteria
    Actors = 0,
    /// Everything else
    Props = 1,
}

/// Which sprite the renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// The player
    Player,
    /// Either salmonella kind
    Salmonella,
    /// E. coli
    Ecoli,
    /// Bacterium pit
    Pit,
    /// Food item
    Food,
    /// Dirt pile
    DirtPile,
    /// Spray projectile
    Spray,
    /// Flame projectile
    Flame,
    /// Restore-health goodie
    RestoreHealthGoodie,
    /// Flamethrower goodie
    FlameThrowerGoodie,
    /// Extra-life goodie
    ExtraLifeGoodie,
    /// Fungus
    Fungus,
}

// =============================================================================
// CAPABILITY INTERFACES
// =============================================================================

/// Result of a hit-point adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still alive afterwards
    Survived,
    /// This adjustment took hit points to zero or below
    Killed,
    /// Was already dead before the adjustment
    AlreadyDead,
}

/// Something whose hit points can be adjusted.
pub trait Damageable {
    /// Current hit points.
    fn hit_points(&self) -> i32;

    /// Is the object still alive?
    fn is_alive(&self) -> bool;

    /// Add `delta` (negative for damage) to hit points.
    ///
    /// Hit points at or below zero clear the alive flag in the same call;
    /// `Killed` is reported only on that transition.
    fn adjust_hit_points(&mut self, delta: i32) -> HitOutcome;
}

// =============================================================================
// ENTITY
// =============================================================================

/// Per-kind data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Salmonella or E. coli
    Bacterium(BacteriumState),
    /// Bacterium source
    Pit(PitInventory),
    /// Timed pickup
    Goodie(GoodieState),
    /// Spray or flame
    Projectile(ProjectileState),
    /// Edible, inert
    Food,
    /// Obstacle, inert
    DirtPile,
}

/// A registry object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Registry handle
    pub id: EntityId,

    /// Current position
    pub position: Vec2,

    /// Facing direction in degrees, [0, 360)
    pub direction: f64,

    /// Is the entity still alive? Dead entities are reaped at tick end.
    pub alive: bool,

    /// Hit points (signed)
    pub hit_points: i32,

    /// Per-kind data
    pub kind: EntityKind,
}

impl Entity {
    /// Create a live entity.
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, direction: f64, hit_points: i32) -> Self {
        Self {
            id,
            position,
            direction: normalize_degrees(direction),
            alive: true,
            hit_points,
            kind,
        }
    }

    /// Capability flags for this entity's kind.
    pub fn capabilities(&self) -> Capabilities {
        match &self.kind {
            EntityKind::Bacterium(_) => Capabilities::BACTERIUM,
            EntityKind::Food => Capabilities::FOOD,
            EntityKind::Goodie(_) => Capabilities::DESTRUCTIBLE,
            EntityKind::DirtPile => Capabilities::DESTRUCTIBLE.with(Capabilities::BLOCKS_MOVEMENT),
            EntityKind::Pit(_) | EntityKind::Projectile(_) => Capabilities::NONE,
        }
    }

    /// Is this a bacterium?
    #[inline]
    pub fn is_bacterium(&self) -> bool {
        self.capabilities().contains(Capabilities::BACTERIUM)
    }

    /// Is this edible?
    #[inline]
    pub fn is_food(&self) -> bool {
        self.capabilities().contains(Capabilities::FOOD)
    }

    /// Can projectiles damage this?
    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.capabilities().contains(Capabilities::DESTRUCTIBLE)
    }

    /// Does this block bacterium movement?
    #[inline]
    pub fn blocks_movement(&self) -> bool {
        self.capabilities().contains(Capabilities::BLOCKS_MOVEMENT)
    }

    /// Set the facing direction, wrapped into [0, 360).
    #[inline]
    pub fn set_direction(&mut self, degrees: f64) {
        self.direction = normalize_degrees(degrees);
    }

    /// Mark dead without touching hit points (consumed, expired, spent).
    #[inline]
    pub fn set_dead(&mut self) {
        self.alive = false;
    }

    /// Draw layer.
    pub fn layer(&self) -> DrawLayer {
        match self.kind {
            EntityKind::Bacterium(_) => DrawLayer::Actors,
            _ => DrawLayer::Props,
        }
    }

    /// Sprite to draw.
    pub fn sprite(&self) -> Sprite {
        match &self.kind {
            EntityKind::Bacterium(b) => match b.kind.family() {
                BacteriumFamily::Salmonella => Sprite::Salmonella,
                BacteriumFamily::Ecoli => Sprite::Ecoli,
            },
            EntityKind::Pit(_) => Sprite::Pit,
            EntityKind::Goodie(g) => match g.kind {
                GoodieKind::RestoreHealth => Sprite::RestoreHealthGoodie,
                GoodieKind::FlameThrower => Sprite::FlameThrowerGoodie,
                GoodieKind::ExtraLife => Sprite::ExtraLifeGoodie,
                GoodieKind::Fungus => Sprite::Fungus,
            },
            EntityKind::Projectile(p) => match p.kind {
                ProjectileKind::Spray => Sprite::Spray,
                ProjectileKind::Flame => Sprite::Flame,
            },
            EntityKind::Food => Sprite::Food,
            EntityKind::DirtPile => Sprite::DirtPile,
        }
    }

    /// Bacterium data, if this is a bacterium.
    pub fn as_bacterium(&self) -> Option<&BacteriumState> {
        match &self.kind {
            EntityKind::Bacterium(b) => Some(b),
            _ => None,
        }
    }

    /// Hash this entity's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_vec2(self.position);
        hasher.update_f64(self.direction);
        hasher.update_bool(self.alive);
        hasher.update_i32(self.hit_points);
        hasher.update_u8(self.capabilities().bits());
        match &self.kind {
            EntityKind::Bacterium(b) => {
                hasher.update_u8(b.kind as u8);
                hasher.update_u32(b.food_eaten);
                hasher.update_i32(b.plan_distance);
            }
            EntityKind::Pit(p) => {
                hasher.update_u32(p.total());
            }
            EntityKind::Goodie(g) => {
                hasher.update_u8(g.kind as u8);
                hasher.update_u32(g.lifetime);
            }
            EntityKind::Projectile(p) => {
                hasher.update_u8(p.kind as u8);
                hasher.update_i32(p.remaining_travel);
            }
            EntityKind::Food | EntityKind::DirtPile => {}
        }
    }
}

impl Damageable for Entity {
    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn adjust_hit_points(&mut self, delta: i32) -> HitOutcome {
        let was_alive = self.alive;
        self.hit_points = self.hit_points.saturating_add(delta);
        if self.hit_points <= 0 {
            self.alive = false;
        }

        match (was_alive, self.alive) {
            (false, _) => HitOutcome::AlreadyDead,
            (true, false) => HitOutcome::Killed,
            (true, true) => HitOutcome::Survived,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
