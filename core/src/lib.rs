#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Selker combat engine.
//!
//! This crate defines the message surface that connects the hosting shell,
//! the authoritative world, and pure systems. The shell and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard cap applied to every spawn burst regardless of configuration.
pub const SPAWN_BURST_CAP: u32 = 15;

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a dropped item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Difficulty epoch counter. Starts at one and never decreases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wave(u32);

impl Wave {
    /// Wave that is active when a fresh simulation boots.
    pub const FIRST: Wave = Wave(1);

    /// Creates a wave counter with the provided value, clamped to at least one.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self(1)
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric wave value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Point in arena space measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this position displaced by the given deltas.
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Velocity expressed in world units per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    dx: f32,
    dy: f32,
}

impl Velocity {
    /// Creates a velocity from explicit per-axis speeds.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Builds a velocity pointing from `from` toward `to` with the given speed.
    ///
    /// A zero-length direction collapses to a stationary velocity rather than
    /// producing NaN components.
    #[must_use]
    pub fn toward(from: Position, to: Position, speed: f32) -> Self {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return Self::new(0.0, 0.0);
        }
        Self::new(dx / length * speed, dy / length * speed)
    }

    /// Horizontal component in world units per second.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component in world units per second.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }
}

/// Dimensions of the rectangular play field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaSize {
    width: f32,
    height: f32,
}

impl ArenaSize {
    /// Creates an arena descriptor with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the arena in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the arena in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether the provided position lies inside the arena.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= 0.0
            && position.y() >= 0.0
            && position.x() <= self.width
            && position.y() <= self.height
    }
}

/// Variants of hostile entities inhabiting the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Melee enemy that only damages the player on contact.
    Normal,
    /// Enemy that periodically fires a projectile at the player.
    Shooter,
    /// High-HP per-wave-scaled enemy with a multi-pattern attack.
    Boss,
}

/// Pickup variants created as drop outcomes from enemy destruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Raises the player's weapon level by one, up to the configured cap.
    WeaponLevelUp,
    /// Restores a fixed amount of player HP, clamped to the maximum.
    Heal,
    /// Detonates a bomb that clears regular enemies and wounds the boss.
    ScreenClear,
    /// Grants a timed shield that absorbs one hit.
    Shield,
    /// Grants a timed movement-speed bonus.
    SpeedBoost,
    /// Grants a timed three-way spread for the player's weapon.
    Multishot,
    /// Awards a flat score bonus immediately.
    BonusScore,
    /// Permanently raises the player's maximum HP.
    MaxHpIncrease,
}

impl ItemKind {
    /// Canonical ordering used for cumulative weighted selection.
    pub const ALL: [ItemKind; 8] = [
        ItemKind::WeaponLevelUp,
        ItemKind::Heal,
        ItemKind::ScreenClear,
        ItemKind::Shield,
        ItemKind::SpeedBoost,
        ItemKind::Multishot,
        ItemKind::BonusScore,
        ItemKind::MaxHpIncrease,
    ];
}

/// Timed player buffs with independent expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Buff {
    /// Absorbs the next hit without HP loss.
    Shield,
    /// Raises player movement speed.
    SpeedBoost,
    /// Fans the player's shots into a three-way spread.
    Multishot,
}

/// Side that owns a projectile. Projectiles never interact with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileSide {
    /// Fired by the player's weapon.
    Player,
    /// Fired by a shooter or boss.
    Enemy,
}

/// Cause recorded when an enemy is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Destroyed by a player weapon projectile.
    WeaponHit,
    /// Destroyed by colliding with the player. Awards no score.
    PlayerContact,
    /// Destroyed by a screen-clear bomb effect.
    ScreenClear,
}

/// Parameters describing a regular or shooter enemy at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawnSpec {
    /// Variant to create. Boss spawns use [`BossSpawnSpec`] instead.
    pub kind: EnemyKind,
    /// Hit points assigned at spawn.
    pub hp: u32,
    /// Damage dealt to the player on contact.
    pub collision_damage: u32,
    /// Damage carried by each projectile this enemy fires, if any.
    pub bullet_damage: u32,
    /// Speed of projectiles this enemy fires, in world units per second.
    pub bullet_speed: f32,
    /// Score awarded when destroyed by a weapon hit.
    pub score: u32,
    /// Probability in `[0, 1]` that destruction drops an item.
    pub drop_rate: f64,
    /// Inclusive bounds for the randomized shoot interval, shooters only.
    pub shoot_delay: Option<DelayRange>,
    /// Presentation scale applied to the enemy's base size.
    pub scale: f32,
    /// Location the enemy occupies when it enters the arena.
    pub position: Position,
}

/// Per-wave boss statistics resolved once at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossSpawnSpec {
    /// Wave the stats were resolved against.
    pub wave: Wave,
    /// Hit points assigned at spawn.
    pub hp: u32,
    /// Damage dealt to the player on contact.
    pub collision_damage: u32,
    /// Delay between attack-pattern activations.
    pub attack_delay: Duration,
    /// Number of bullets in a radial burst.
    pub radial_bullet_count: u32,
    /// Speed of radial bullets in world units per second.
    pub bullet_speed: f32,
    /// Damage carried by each radial bullet.
    pub bullet_damage: u32,
    /// Damage carried by the homing missile.
    pub missile_damage: u32,
    /// Speed of the homing missile in world units per second.
    pub missile_speed: f32,
    /// Score awarded when destroyed by a weapon hit.
    pub score: u32,
    /// Probability in `[0, 1]` that each guaranteed drop roll succeeds.
    pub drop_rate: f64,
    /// Location the boss occupies when it enters the arena.
    pub position: Position,
}

/// Parameters describing an item created as a drop outcome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawnSpec {
    /// Variant of pickup to create.
    pub kind: ItemKind,
    /// Numeric effect magnitude (heal amount, score bonus, bomb percent x100).
    pub magnitude: u32,
    /// Lifetime of the granted buff, for timed variants.
    pub duration: Option<Duration>,
    /// Location the item appears at.
    pub position: Position,
}

/// Inclusive range of delays used for randomized behavior timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Creates a delay range, swapping the bounds if they arrive inverted.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Creates a delay range from bounds already known to be ordered.
    ///
    /// Usable in constant contexts; callers are responsible for ordering.
    #[must_use]
    pub const fn from_const(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Lower inclusive bound of the range.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper inclusive bound of the range.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }
}

/// Player tuning applied when the simulation is configured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    /// Maximum hit points the player starts with.
    pub max_hp: u32,
    /// Damage carried by each player weapon projectile.
    pub weapon_damage: u32,
    /// Upper bound on the weapon level.
    pub weapon_level_cap: u32,
    /// Interval between automatic weapon shots.
    pub auto_fire_delay: Duration,
    /// Speed of player projectiles in world units per second.
    pub projectile_speed: f32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the arena, player loadout, and deterministic seed.
    ConfigureSimulation {
        /// Dimensions of the play field.
        arena: ArenaSize,
        /// Player tuning to install.
        loadout: PlayerLoadout,
        /// Seed for the world's internal random stream.
        seed: u64,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Freezes or resumes the simulation. Paused worlds ignore ticks.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Moves the player to the provided position.
    SetPlayerPosition {
        /// Location the player should occupy.
        position: Position,
    },
    /// Requests the wave counter advance to the provided value.
    AdvanceWave {
        /// Wave the simulation should enter. Must be the successor of the
        /// current wave; stale or regressive requests are ignored.
        wave: Wave,
    },
    /// Requests creation of a regular or shooter enemy.
    SpawnEnemy {
        /// Stats and placement for the new enemy.
        spec: EnemySpawnSpec,
    },
    /// Requests creation of the wave boss.
    SpawnBoss {
        /// Stats snapshot resolved from config at spawn time.
        spec: BossSpawnSpec,
    },
    /// Requests creation of a pickup item.
    SpawnItem {
        /// Variant, magnitude, and placement for the item.
        spec: ItemSpawnSpec,
    },
    /// Reports that a player projectile overlapped an enemy.
    ResolveProjectileHit {
        /// Projectile involved in the overlap.
        projectile: ProjectileId,
        /// Enemy involved in the overlap.
        enemy: EnemyId,
    },
    /// Reports that an enemy body overlapped the player.
    ResolvePlayerContact {
        /// Enemy that touched the player.
        enemy: EnemyId,
    },
    /// Reports that an enemy projectile overlapped the player.
    ResolveProjectilePlayerHit {
        /// Enemy projectile that reached the player.
        projectile: ProjectileId,
    },
    /// Reports that the player overlapped a pickup item.
    ResolveItemPickup {
        /// Item the player touched.
        item: ItemId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the wave counter advanced.
    WaveAdvanced {
        /// Wave that became active.
        wave: Wave,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the spawned enemy.
        kind: EnemyKind,
        /// Location the enemy occupies.
        position: Position,
    },
    /// Confirms that the wave boss entered the arena.
    BossSpawned {
        /// Identifier assigned to the boss.
        enemy: EnemyId,
        /// Wave whose stats the boss carries.
        wave: Wave,
    },
    /// Reports that an enemy lost hit points but survived.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Hit points remaining after the hit.
        remaining: u32,
    },
    /// Reports that an enemy was destroyed. Fires exactly once per enemy.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Variant of the destroyed enemy.
        kind: EnemyKind,
        /// What destroyed the enemy.
        cause: DestructionCause,
        /// Last known location, used for drop placement.
        position: Position,
        /// Probability that this destruction drops an item.
        drop_rate: f64,
    },
    /// Reports that the player's score changed.
    ScoreChanged {
        /// Score total after the change.
        score: u64,
        /// Amount the score increased by.
        delta: u64,
    },
    /// Reports that the player lost hit points.
    PlayerDamaged {
        /// Damage applied after shield checks.
        damage: u32,
        /// Hit points remaining after the hit.
        remaining: u32,
    },
    /// Reports that the shield absorbed a hit and was consumed.
    ShieldConsumed,
    /// Reports that the player regained hit points.
    PlayerHealed {
        /// Amount restored after clamping.
        amount: u32,
        /// Hit points after healing.
        hp: u32,
    },
    /// Reports that the player's maximum HP increased.
    MaxHpRaised {
        /// New maximum hit points.
        max_hp: u32,
    },
    /// Reports that the player's weapon level increased.
    WeaponLevelChanged {
        /// Weapon level after the change.
        level: u32,
    },
    /// Reports that a timed buff became active.
    BuffStarted {
        /// Buff that was granted.
        buff: Buff,
        /// Lifetime of the buff.
        duration: Duration,
    },
    /// Reports that a timed buff expired.
    BuffExpired {
        /// Buff that ran out.
        buff: Buff,
    },
    /// Confirms that a pickup item appeared in the arena.
    ItemSpawned {
        /// Identifier assigned to the item.
        item: ItemId,
        /// Variant of the item.
        kind: ItemKind,
        /// Location the item appeared at.
        position: Position,
    },
    /// Reports that the player collected an item. Effects apply exactly once.
    ItemPickedUp {
        /// Item that was collected.
        item: ItemId,
        /// Variant of the collected item.
        kind: ItemKind,
    },
    /// Reports that an uncollected item timed out.
    ItemExpired {
        /// Item that despawned.
        item: ItemId,
    },
    /// Confirms that a projectile entered the arena.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Side that owns the projectile.
        side: ProjectileSide,
        /// Location the projectile started from.
        position: Position,
    },
    /// Reports that a projectile left play without hitting anything.
    ProjectileDespawned {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// Announces that the pause state changed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Announces the terminal game-over transition. Fires exactly once.
    GameOver {
        /// Final score.
        score: u64,
        /// Wave that was active when the player fell.
        wave: Wave,
    },
}

/// Immutable summary of the simulation consumed by pure systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationView {
    /// Wave currently in progress.
    pub wave: Wave,
    /// Player's current weapon level.
    pub weapon_level: u32,
    /// Player's current hit points.
    pub player_hp: u32,
    /// Player's maximum hit points.
    pub player_max_hp: u32,
    /// Number of enemies currently alive, boss included.
    pub enemies_alive: u32,
    /// Whether a boss is currently alive.
    pub boss_alive: bool,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whether the terminal game-over transition already fired.
    pub game_over: bool,
    /// Dimensions of the play field.
    pub arena: ArenaSize,
}

impl SimulationView {
    /// Player HP expressed as a fraction of the maximum, in `[0, 1]`.
    #[must_use]
    pub fn player_hp_fraction(&self) -> f64 {
        if self.player_max_hp == 0 {
            return 0.0;
        }
        f64::from(self.player_hp) / f64::from(self.player_max_hp)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArenaSize, DelayRange, EnemyId, EnemyKind, ItemKind, Position, SimulationView, Velocity,
        Wave,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn enemy_kind_round_trips_through_bincode() {
        assert_round_trip(&EnemyKind::Shooter);
    }

    #[test]
    fn item_kind_round_trips_through_bincode() {
        assert_round_trip(&ItemKind::ScreenClear);
    }

    #[test]
    fn wave_never_reports_zero() {
        assert_eq!(Wave::new(0).get(), 1);
        assert_eq!(Wave::new(7).get(), 7);
        assert_eq!(Wave::new(7).next().get(), 8);
    }

    #[test]
    fn delay_range_swaps_inverted_bounds() {
        let range = DelayRange::new(Duration::from_millis(3_000), Duration::from_millis(2_000));
        assert_eq!(range.min(), Duration::from_millis(2_000));
        assert_eq!(range.max(), Duration::from_millis(3_000));
    }

    #[test]
    fn velocity_toward_is_stationary_for_coincident_points() {
        let origin = Position::new(10.0, 10.0);
        let velocity = Velocity::toward(origin, origin, 250.0);
        assert_eq!(velocity.dx(), 0.0);
        assert_eq!(velocity.dy(), 0.0);
    }

    #[test]
    fn velocity_toward_normalizes_direction() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(3.0, 4.0);
        let velocity = Velocity::toward(from, to, 100.0);
        assert!((velocity.dx() - 60.0).abs() < 1e-3);
        assert!((velocity.dy() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn arena_contains_checks_bounds() {
        let arena = ArenaSize::new(800.0, 600.0);
        assert!(arena.contains(Position::new(400.0, 300.0)));
        assert!(!arena.contains(Position::new(-1.0, 300.0)));
        assert!(!arena.contains(Position::new(400.0, 601.0)));
    }

    #[test]
    fn hp_fraction_handles_zero_maximum() {
        let view = SimulationView {
            wave: Wave::FIRST,
            weapon_level: 1,
            player_hp: 0,
            player_max_hp: 0,
            enemies_alive: 0,
            boss_alive: false,
            paused: false,
            game_over: false,
            arena: ArenaSize::new(800.0, 600.0),
        };
        assert_eq!(view.player_hp_fraction(), 0.0);
    }
}
