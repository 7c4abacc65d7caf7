#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tuning tables for the Selker combat engine.
//!
//! The provider loads a data-only TOML document of numeric coefficients and
//! answers every difficulty-dependent question the wave director and the item
//! drop system ask. Every getter is total: any field the document omits is
//! filled from a hardcoded default at construction time, and a document that
//! fails to load entirely is replaced wholesale by [`ConfigProvider::fallback`].
//! Formulas are fixed in code; the document only supplies coefficients.

use std::path::Path;
use std::time::Duration;

use selker_core::{DelayRange, EnemyKind, ItemKind, Wave};
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced while loading a tuning document.
///
/// Load failures are recoverable by construction: callers fall back to
/// [`ConfigProvider::fallback`] and keep running on defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The document was not valid TOML or did not match the schema.
    #[error("failed to parse config document: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Difficulty parameters resolved for a single wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Base number of enemies per spawn burst before weapon-level bonus.
    pub spawn_count: u32,
    /// Probability that an individual spawn is a shooter.
    pub shooter_ratio: f64,
    /// Delay between spawn bursts.
    pub spawn_delay: Duration,
    /// Probability that a destroyed enemy drops an item.
    pub drop_rate: f64,
    /// Real-time duration of the wave.
    pub wave_timer: Duration,
}

/// Boss statistics resolved for a single wave. Snapshot at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossStats {
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
    /// Score awarded when the boss dies to a weapon hit.
    pub score: u32,
    /// Probability that each guaranteed boss drop roll succeeds.
    pub drop_rate: f64,
}

/// Static statistics for a regular or shooter enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Hit points assigned at spawn.
    pub hp: u32,
    /// Damage dealt to the player on contact.
    pub collision_damage: u32,
    /// Damage carried by each fired projectile.
    pub bullet_damage: u32,
    /// Speed of fired projectiles in world units per second.
    pub bullet_speed: f32,
    /// Score awarded when destroyed by a weapon hit.
    pub score: u32,
    /// Inclusive bounds for the randomized shoot interval.
    pub shoot_delay: DelayRange,
    /// Probability that destruction drops an item.
    pub drop_rate: f64,
}

/// Weight formula coefficients for one item kind.
///
/// `weight = base + wave * per_wave + low_hp_bonus (if player HP is low)
/// + weapon_level * weapon_level_bonus`, clamped to `[min, max]` when the
/// clamps are present and floored at zero.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct WeightRule {
    /// Flat starting weight.
    #[serde(default)]
    pub base: f64,
    /// Weight added per wave.
    #[serde(default)]
    pub per_wave: f64,
    /// Weight added while the player is below the low-HP threshold.
    #[serde(default)]
    pub low_hp_bonus: f64,
    /// Weight added per weapon level.
    #[serde(default)]
    pub weapon_level_bonus: f64,
    /// Optional lower clamp applied after summation.
    #[serde(default)]
    pub min: Option<f64>,
    /// Optional upper clamp applied after summation.
    #[serde(default)]
    pub max: Option<f64>,
}

impl WeightRule {
    /// Rule with a flat base weight and no modifiers.
    #[must_use]
    pub const fn flat(base: f64) -> Self {
        Self {
            base,
            per_wave: 0.0,
            low_hp_bonus: 0.0,
            weapon_level_bonus: 0.0,
            min: None,
            max: None,
        }
    }

    /// Evaluates the rule for the given wave and player state.
    #[must_use]
    pub fn evaluate(&self, wave: Wave, low_hp: bool, weapon_level: u32) -> f64 {
        let mut weight = self.base
            + f64::from(wave.get()) * self.per_wave
            + f64::from(weapon_level) * self.weapon_level_bonus;
        if low_hp {
            weight += self.low_hp_bonus;
        }
        if let Some(min) = self.min {
            weight = weight.max(min);
        }
        if let Some(max) = self.max {
            weight = weight.min(max);
        }
        weight.max(0.0)
    }
}

/// Effect magnitudes applied when items are picked up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemEffects {
    /// HP restored by a heal pickup.
    pub heal_amount: u32,
    /// Score awarded by a bonus-score pickup.
    pub bonus_score: u32,
    /// Maximum-HP gain from a max-HP pickup.
    pub max_hp_increase: u32,
    /// Lifetime of the shield buff.
    pub shield_duration: Duration,
    /// Lifetime of the speed-boost buff.
    pub speed_boost_duration: Duration,
    /// Lifetime of the multishot buff.
    pub multishot_duration: Duration,
    /// Fraction of current boss HP removed by a bomb, in `[0, 1]`.
    pub bomb_percent: f64,
}

/// Player tuning coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTuning {
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

/// Read-only tuning provider consulted by the wave director and item drops.
#[derive(Clone, Debug)]
pub struct ConfigProvider {
    waves: WaveTuning,
    normal: EnemyStats,
    shooter: EnemyStats,
    boss: BossTuning,
    items: ItemTuning,
    player: PlayerTuning,
    size: SizeTuning,
    max_enemies: u32,
    weapon_bonus_per_level: u32,
}

impl ConfigProvider {
    /// Builds a provider backed entirely by hardcoded defaults.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_raw(RawConfig::default())
    }

    /// Parses a TOML tuning document. Omitted fields fall back to defaults.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(document)?;
        Ok(Self::from_raw(raw))
    }

    /// Reads and parses a tuning document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    /// Resolves every difficulty parameter for the provided wave.
    #[must_use]
    pub fn wave_config(&self, wave: Wave) -> WaveConfig {
        WaveConfig {
            spawn_count: self.waves.spawn_count(wave),
            shooter_ratio: self.waves.shooter_ratio(wave),
            spawn_delay: self.spawn_delay(wave),
            drop_rate: self.drop_rate(wave),
            wave_timer: self.wave_timer(wave),
        }
    }

    /// Static statistics for a non-boss enemy kind.
    ///
    /// Asking for [`EnemyKind::Boss`] yields the shooter table; boss stats are
    /// wave-dependent and come from [`ConfigProvider::boss_stats`] instead.
    #[must_use]
    pub fn enemy_stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Normal => self.normal,
            EnemyKind::Shooter | EnemyKind::Boss => self.shooter,
        }
    }

    /// Boss statistics resolved against the provided wave.
    #[must_use]
    pub fn boss_stats(&self, wave: Wave) -> BossStats {
        self.boss.resolve(wave)
    }

    /// Delay between spawn bursts for the provided wave.
    #[must_use]
    pub fn spawn_delay(&self, wave: Wave) -> Duration {
        self.waves.spawn_delay(wave)
    }

    /// Global ceiling on concurrently alive enemies.
    #[must_use]
    pub const fn max_enemies_on_screen(&self) -> u32 {
        self.max_enemies
    }

    /// Extra enemies added to each spawn burst per weapon level above one.
    #[must_use]
    pub fn weapon_level_bonus(&self, weapon_level: u32) -> u32 {
        weapon_level
            .saturating_sub(1)
            .saturating_mul(self.weapon_bonus_per_level)
    }

    /// Whether enemies spawned during the provided wave are shrunk.
    #[must_use]
    pub const fn should_reduce_enemy_size(&self, wave: Wave) -> bool {
        wave.get() >= self.size.shrink_from_wave
    }

    /// Fractional size reduction applied once shrinking is active.
    #[must_use]
    pub const fn enemy_size_reduction_percent(&self) -> f32 {
        self.size.reduction_percent
    }

    /// Real-time duration of the provided wave.
    #[must_use]
    pub fn wave_timer(&self, wave: Wave) -> Duration {
        self.waves.wave_timer(wave)
    }

    /// Interval between automatic player weapon shots.
    #[must_use]
    pub const fn auto_fire_delay(&self) -> Duration {
        self.player.auto_fire_delay
    }

    /// Player tuning coefficients.
    #[must_use]
    pub const fn player_tuning(&self) -> PlayerTuning {
        self.player
    }

    /// Effect magnitudes applied on item pickup.
    #[must_use]
    pub const fn item_effects(&self) -> ItemEffects {
        self.items.effects
    }

    /// Weight rule for the provided item kind.
    #[must_use]
    pub fn item_weight(&self, kind: ItemKind) -> WeightRule {
        self.items.weight(kind)
    }

    /// Player-HP fraction below which low-HP weight bonuses apply.
    #[must_use]
    pub const fn low_hp_threshold(&self) -> f64 {
        self.items.low_hp_threshold
    }

    /// Item kind returned when every weight resolves to zero.
    #[must_use]
    pub const fn fallback_item(&self) -> ItemKind {
        self.items.fallback
    }

    /// Probability that a destroyed enemy drops an item during the wave.
    #[must_use]
    pub fn drop_rate(&self, wave: Wave) -> f64 {
        self.items
            .drop_buckets
            .iter()
            .find(|bucket| bucket.range.contains(wave))
            .map_or(self.items.default_drop_rate, |bucket| bucket.rate)
    }

    /// Number of guaranteed drops rolled when a boss dies.
    #[must_use]
    pub const fn boss_drop_count(&self) -> u32 {
        self.items.boss_drop_count
    }

    fn from_raw(raw: RawConfig) -> Self {
        Self {
            waves: WaveTuning::from_raw(raw.waves),
            normal: raw.enemies.normal.resolve(defaults::NORMAL),
            shooter: raw.enemies.shooter.resolve(defaults::SHOOTER),
            boss: BossTuning::from_raw(raw.boss),
            items: ItemTuning::from_raw(raw.items),
            player: PlayerTuning {
                max_hp: raw.player.max_hp.unwrap_or(defaults::PLAYER_MAX_HP),
                weapon_damage: raw.player.weapon_damage.unwrap_or(defaults::WEAPON_DAMAGE),
                weapon_level_cap: raw
                    .player
                    .weapon_level_cap
                    .unwrap_or(defaults::WEAPON_LEVEL_CAP),
                auto_fire_delay: Duration::from_millis(
                    raw.player
                        .auto_fire_delay_ms
                        .unwrap_or(defaults::AUTO_FIRE_DELAY_MS),
                ),
                projectile_speed: raw
                    .player
                    .projectile_speed
                    .unwrap_or(defaults::PLAYER_PROJECTILE_SPEED),
            },
            size: SizeTuning {
                shrink_from_wave: raw.size.shrink_from_wave.unwrap_or(defaults::SHRINK_WAVE),
                reduction_percent: raw
                    .size
                    .reduction_percent
                    .unwrap_or(defaults::SHRINK_PERCENT),
            },
            max_enemies: raw.spawning.max_enemies.unwrap_or(defaults::MAX_ENEMIES),
            weapon_bonus_per_level: raw
                .spawning
                .weapon_bonus_per_level
                .unwrap_or(defaults::WEAPON_BONUS_PER_LEVEL),
        }
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Inclusive wave range parsed from a bucket key.
///
/// Accepted forms: `"4"` (exactly wave four), `"2-5"` (waves two through
/// five), `"7+"` (wave seven onward).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveRange {
    /// Matches a single wave.
    Exact(u32),
    /// Matches an inclusive span of waves.
    Span(u32, u32),
    /// Matches every wave at or above the bound.
    From(u32),
}

impl WaveRange {
    /// Parses a bucket key. Returns `None` for malformed keys, which callers
    /// skip so a bad bucket degrades to the default rate instead of failing.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if let Some(lower) = key.strip_suffix('+') {
            return lower.trim().parse().ok().map(WaveRange::From);
        }
        if let Some((lower, upper)) = key.split_once('-') {
            let lower: u32 = lower.trim().parse().ok()?;
            let upper: u32 = upper.trim().parse().ok()?;
            if lower > upper {
                return None;
            }
            return Some(WaveRange::Span(lower, upper));
        }
        key.parse().ok().map(WaveRange::Exact)
    }

    /// Reports whether the provided wave falls inside the range.
    #[must_use]
    pub const fn contains(&self, wave: Wave) -> bool {
        let value = wave.get();
        match *self {
            WaveRange::Exact(exact) => value == exact,
            WaveRange::Span(lower, upper) => value >= lower && value <= upper,
            WaveRange::From(lower) => value >= lower,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DropBucket {
    range: WaveRange,
    rate: f64,
}

#[derive(Clone, Copy, Debug)]
struct TimerBucket {
    range: WaveRange,
    timer: Duration,
}

#[derive(Clone, Debug)]
struct WaveTuning {
    timer: Duration,
    timer_buckets: Vec<TimerBucket>,
    count_base: u32,
    count_per_two_waves: u32,
    spawn_delay_base: Duration,
    spawn_delay_step: Duration,
    spawn_delay_min: Duration,
    shooter_from_wave: u32,
    shooter_ratio_base: f64,
    shooter_ratio_per_wave: f64,
    shooter_ratio_max: f64,
}

impl WaveTuning {
    fn from_raw(raw: RawWaves) -> Self {
        let timer_buckets = raw
            .timer_buckets
            .into_iter()
            .filter_map(|bucket| {
                WaveRange::parse(&bucket.range).map(|range| TimerBucket {
                    range,
                    timer: Duration::from_secs(bucket.seconds),
                })
            })
            .collect();
        Self {
            timer: Duration::from_secs(raw.timer_seconds.unwrap_or(defaults::WAVE_TIMER_SECS)),
            timer_buckets,
            count_base: raw.count_base.unwrap_or(defaults::COUNT_BASE),
            count_per_two_waves: raw
                .count_per_two_waves
                .unwrap_or(defaults::COUNT_PER_TWO_WAVES),
            spawn_delay_base: Duration::from_millis(
                raw.spawn_delay_base_ms.unwrap_or(defaults::SPAWN_DELAY_MS),
            ),
            spawn_delay_step: Duration::from_millis(
                raw.spawn_delay_step_ms
                    .unwrap_or(defaults::SPAWN_DELAY_STEP_MS),
            ),
            spawn_delay_min: Duration::from_millis(
                raw.spawn_delay_min_ms
                    .unwrap_or(defaults::SPAWN_DELAY_MIN_MS),
            ),
            shooter_from_wave: raw.shooter_from_wave.unwrap_or(defaults::SHOOTER_FROM_WAVE),
            shooter_ratio_base: raw
                .shooter_ratio_base
                .unwrap_or(defaults::SHOOTER_RATIO_BASE),
            shooter_ratio_per_wave: raw
                .shooter_ratio_per_wave
                .unwrap_or(defaults::SHOOTER_RATIO_PER_WAVE),
            shooter_ratio_max: raw.shooter_ratio_max.unwrap_or(defaults::SHOOTER_RATIO_MAX),
        }
    }

    fn wave_timer(&self, wave: Wave) -> Duration {
        self.timer_buckets
            .iter()
            .find(|bucket| bucket.range.contains(wave))
            .map_or(self.timer, |bucket| bucket.timer)
    }

    fn spawn_count(&self, wave: Wave) -> u32 {
        let escalation = wave.get().saturating_sub(1) / 2;
        self.count_base
            .saturating_add(escalation.saturating_mul(self.count_per_two_waves))
    }

    fn spawn_delay(&self, wave: Wave) -> Duration {
        let steps = wave.get().saturating_sub(1);
        let reduction = self.spawn_delay_step.saturating_mul(steps);
        self.spawn_delay_base
            .saturating_sub(reduction)
            .max(self.spawn_delay_min)
    }

    fn shooter_ratio(&self, wave: Wave) -> f64 {
        if wave.get() < self.shooter_from_wave {
            return 0.0;
        }
        let steps = f64::from(wave.get() - self.shooter_from_wave);
        (self.shooter_ratio_base + steps * self.shooter_ratio_per_wave)
            .min(self.shooter_ratio_max)
            .max(0.0)
    }
}

#[derive(Clone, Debug)]
struct BossTuning {
    hp_base: u32,
    hp_per_wave: u32,
    collision_damage: u32,
    attack_delay_base: Duration,
    attack_delay_decay: Duration,
    attack_delay_min: Duration,
    radial_bullet_count: Option<u32>,
    bullet_speed: f32,
    bullet_damage: u32,
    missile_damage: u32,
    missile_speed: f32,
    score_multiplier: u32,
    drop_rate: f64,
}

impl BossTuning {
    fn from_raw(raw: RawBoss) -> Self {
        Self {
            hp_base: raw.hp_base.unwrap_or(defaults::BOSS_HP_BASE),
            hp_per_wave: raw.hp_per_wave.unwrap_or(defaults::BOSS_HP_PER_WAVE),
            collision_damage: raw
                .collision_damage
                .unwrap_or(defaults::BOSS_COLLISION_DAMAGE),
            attack_delay_base: Duration::from_millis(
                raw.attack_delay_base_ms
                    .unwrap_or(defaults::BOSS_ATTACK_DELAY_MS),
            ),
            attack_delay_decay: Duration::from_millis(
                raw.attack_delay_decay_ms
                    .unwrap_or(defaults::BOSS_ATTACK_DECAY_MS),
            ),
            attack_delay_min: Duration::from_millis(
                raw.attack_delay_min_ms
                    .unwrap_or(defaults::BOSS_ATTACK_MIN_MS),
            ),
            radial_bullet_count: raw.radial_bullet_count,
            bullet_speed: raw.bullet_speed.unwrap_or(defaults::BOSS_BULLET_SPEED),
            bullet_damage: raw.bullet_damage.unwrap_or(defaults::BOSS_BULLET_DAMAGE),
            missile_damage: raw.missile_damage.unwrap_or(defaults::BOSS_MISSILE_DAMAGE),
            missile_speed: raw.missile_speed.unwrap_or(defaults::BOSS_MISSILE_SPEED),
            score_multiplier: raw
                .score_multiplier
                .unwrap_or(defaults::BOSS_SCORE_MULTIPLIER),
            drop_rate: raw.drop_rate.unwrap_or(defaults::BOSS_DROP_RATE),
        }
    }

    fn resolve(&self, wave: Wave) -> BossStats {
        let steps = wave.get().saturating_sub(1);
        let decay = self.attack_delay_decay.saturating_mul(wave.get());
        BossStats {
            hp: self
                .hp_base
                .saturating_add(self.hp_per_wave.saturating_mul(steps)),
            collision_damage: self.collision_damage,
            attack_delay: self
                .attack_delay_base
                .saturating_sub(decay)
                .max(self.attack_delay_min),
            radial_bullet_count: self
                .radial_bullet_count
                .unwrap_or_else(|| (4 + wave.get()).min(8)),
            bullet_speed: self.bullet_speed,
            bullet_damage: self.bullet_damage,
            missile_damage: self.missile_damage,
            missile_speed: self.missile_speed,
            score: self.score_multiplier.saturating_mul(wave.get()),
            drop_rate: self.drop_rate,
        }
    }
}

#[derive(Clone, Debug)]
struct ItemTuning {
    weights: [WeightRule; ItemKind::ALL.len()],
    effects: ItemEffects,
    low_hp_threshold: f64,
    fallback: ItemKind,
    default_drop_rate: f64,
    drop_buckets: Vec<DropBucket>,
    boss_drop_count: u32,
}

impl ItemTuning {
    fn from_raw(raw: RawItems) -> Self {
        let mut weights = defaults::item_weights();
        for (index, kind) in ItemKind::ALL.iter().enumerate() {
            if let Some(rule) = raw.weight_for(*kind) {
                weights[index] = rule;
            }
        }

        let drop_buckets = raw
            .drop_buckets
            .into_iter()
            .filter_map(|bucket| {
                WaveRange::parse(&bucket.range).map(|range| DropBucket {
                    range,
                    rate: bucket.rate,
                })
            })
            .collect::<Vec<_>>();
        let drop_buckets = if drop_buckets.is_empty() {
            defaults::drop_buckets()
        } else {
            drop_buckets
        };

        Self {
            weights,
            effects: ItemEffects {
                heal_amount: raw.heal_amount.unwrap_or(defaults::HEAL_AMOUNT),
                bonus_score: raw.bonus_score.unwrap_or(defaults::BONUS_SCORE),
                max_hp_increase: raw.max_hp_increase.unwrap_or(defaults::MAX_HP_INCREASE),
                shield_duration: Duration::from_millis(
                    raw.shield_duration_ms.unwrap_or(defaults::SHIELD_MS),
                ),
                speed_boost_duration: Duration::from_millis(
                    raw.speed_boost_duration_ms.unwrap_or(defaults::SPEED_MS),
                ),
                multishot_duration: Duration::from_millis(
                    raw.multishot_duration_ms.unwrap_or(defaults::MULTISHOT_MS),
                ),
                bomb_percent: raw.bomb_percent.unwrap_or(defaults::BOMB_PERCENT),
            },
            low_hp_threshold: raw.low_hp_threshold.unwrap_or(defaults::LOW_HP_THRESHOLD),
            fallback: raw.fallback.unwrap_or(ItemKind::Heal),
            default_drop_rate: raw.default_drop_rate.unwrap_or(defaults::DEFAULT_DROP_RATE),
            drop_buckets,
            boss_drop_count: raw.boss_drop_count.unwrap_or(defaults::BOSS_DROP_COUNT),
        }
    }

    fn weight(&self, kind: ItemKind) -> WeightRule {
        let index = ItemKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or(0);
        self.weights[index]
    }
}

#[derive(Clone, Copy, Debug)]
struct SizeTuning {
    shrink_from_wave: u32,
    reduction_percent: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    waves: RawWaves,
    #[serde(default)]
    enemies: RawEnemies,
    #[serde(default)]
    boss: RawBoss,
    #[serde(default)]
    items: RawItems,
    #[serde(default)]
    player: RawPlayer,
    #[serde(default)]
    size: RawSize,
    #[serde(default)]
    spawning: RawSpawning,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWaves {
    timer_seconds: Option<u64>,
    #[serde(default)]
    timer_buckets: Vec<RawTimerBucket>,
    count_base: Option<u32>,
    count_per_two_waves: Option<u32>,
    spawn_delay_base_ms: Option<u64>,
    spawn_delay_step_ms: Option<u64>,
    spawn_delay_min_ms: Option<u64>,
    shooter_from_wave: Option<u32>,
    shooter_ratio_base: Option<f64>,
    shooter_ratio_per_wave: Option<f64>,
    shooter_ratio_max: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnemies {
    #[serde(default)]
    normal: RawEnemyStats,
    #[serde(default)]
    shooter: RawEnemyStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnemyStats {
    hp: Option<u32>,
    collision_damage: Option<u32>,
    bullet_damage: Option<u32>,
    bullet_speed: Option<f32>,
    score: Option<u32>,
    shoot_delay_min_ms: Option<u64>,
    shoot_delay_max_ms: Option<u64>,
    drop_rate: Option<f64>,
}

impl RawEnemyStats {
    fn resolve(&self, fallback: EnemyStats) -> EnemyStats {
        let min = self
            .shoot_delay_min_ms
            .map_or(fallback.shoot_delay.min(), Duration::from_millis);
        let max = self
            .shoot_delay_max_ms
            .map_or(fallback.shoot_delay.max(), Duration::from_millis);
        EnemyStats {
            hp: self.hp.unwrap_or(fallback.hp),
            collision_damage: self.collision_damage.unwrap_or(fallback.collision_damage),
            bullet_damage: self.bullet_damage.unwrap_or(fallback.bullet_damage),
            bullet_speed: self.bullet_speed.unwrap_or(fallback.bullet_speed),
            score: self.score.unwrap_or(fallback.score),
            shoot_delay: DelayRange::new(min, max),
            drop_rate: self.drop_rate.unwrap_or(fallback.drop_rate),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBoss {
    hp_base: Option<u32>,
    hp_per_wave: Option<u32>,
    collision_damage: Option<u32>,
    attack_delay_base_ms: Option<u64>,
    attack_delay_decay_ms: Option<u64>,
    attack_delay_min_ms: Option<u64>,
    radial_bullet_count: Option<u32>,
    bullet_speed: Option<f32>,
    bullet_damage: Option<u32>,
    missile_damage: Option<u32>,
    missile_speed: Option<f32>,
    score_multiplier: Option<u32>,
    drop_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItems {
    weapon_level_up: Option<WeightRule>,
    heal: Option<WeightRule>,
    screen_clear: Option<WeightRule>,
    shield: Option<WeightRule>,
    speed_boost: Option<WeightRule>,
    multishot: Option<WeightRule>,
    bonus_score_weight: Option<WeightRule>,
    max_hp_increase_weight: Option<WeightRule>,
    heal_amount: Option<u32>,
    bonus_score: Option<u32>,
    max_hp_increase: Option<u32>,
    shield_duration_ms: Option<u64>,
    speed_boost_duration_ms: Option<u64>,
    multishot_duration_ms: Option<u64>,
    bomb_percent: Option<f64>,
    low_hp_threshold: Option<f64>,
    fallback: Option<ItemKind>,
    default_drop_rate: Option<f64>,
    #[serde(default)]
    drop_buckets: Vec<RawDropBucket>,
    boss_drop_count: Option<u32>,
}

impl RawItems {
    fn weight_for(&self, kind: ItemKind) -> Option<WeightRule> {
        match kind {
            ItemKind::WeaponLevelUp => self.weapon_level_up,
            ItemKind::Heal => self.heal,
            ItemKind::ScreenClear => self.screen_clear,
            ItemKind::Shield => self.shield,
            ItemKind::SpeedBoost => self.speed_boost,
            ItemKind::Multishot => self.multishot,
            ItemKind::BonusScore => self.bonus_score_weight,
            ItemKind::MaxHpIncrease => self.max_hp_increase_weight,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDropBucket {
    range: String,
    rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTimerBucket {
    range: String,
    seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlayer {
    max_hp: Option<u32>,
    weapon_damage: Option<u32>,
    weapon_level_cap: Option<u32>,
    auto_fire_delay_ms: Option<u64>,
    projectile_speed: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSize {
    shrink_from_wave: Option<u32>,
    reduction_percent: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpawning {
    max_enemies: Option<u32>,
    weapon_bonus_per_level: Option<u32>,
}

mod defaults {
    use std::time::Duration;

    use selker_core::DelayRange;

    use super::{DropBucket, EnemyStats, WaveRange, WeightRule};

    pub(crate) const WAVE_TIMER_SECS: u64 = 15;
    pub(crate) const COUNT_BASE: u32 = 1;
    pub(crate) const COUNT_PER_TWO_WAVES: u32 = 1;
    pub(crate) const SPAWN_DELAY_MS: u64 = 2_000;
    pub(crate) const SPAWN_DELAY_STEP_MS: u64 = 100;
    pub(crate) const SPAWN_DELAY_MIN_MS: u64 = 600;
    pub(crate) const SHOOTER_FROM_WAVE: u32 = 5;
    pub(crate) const SHOOTER_RATIO_BASE: f64 = 0.2;
    pub(crate) const SHOOTER_RATIO_PER_WAVE: f64 = 0.02;
    pub(crate) const SHOOTER_RATIO_MAX: f64 = 0.5;
    pub(crate) const MAX_ENEMIES: u32 = 20;
    pub(crate) const WEAPON_BONUS_PER_LEVEL: u32 = 1;
    pub(crate) const SHRINK_WAVE: u32 = 8;
    pub(crate) const SHRINK_PERCENT: f32 = 0.25;

    pub(crate) const PLAYER_MAX_HP: u32 = 100;
    pub(crate) const WEAPON_DAMAGE: u32 = 10;
    pub(crate) const WEAPON_LEVEL_CAP: u32 = 9;
    pub(crate) const AUTO_FIRE_DELAY_MS: u64 = 300;
    pub(crate) const PLAYER_PROJECTILE_SPEED: f32 = 420.0;

    pub(crate) const BOSS_HP_BASE: u32 = 300;
    pub(crate) const BOSS_HP_PER_WAVE: u32 = 150;
    pub(crate) const BOSS_COLLISION_DAMAGE: u32 = 25;
    pub(crate) const BOSS_ATTACK_DELAY_MS: u64 = 3_000;
    pub(crate) const BOSS_ATTACK_DECAY_MS: u64 = 150;
    pub(crate) const BOSS_ATTACK_MIN_MS: u64 = 1_200;
    pub(crate) const BOSS_BULLET_SPEED: f32 = 180.0;
    pub(crate) const BOSS_BULLET_DAMAGE: u32 = 12;
    pub(crate) const BOSS_MISSILE_DAMAGE: u32 = 20;
    pub(crate) const BOSS_MISSILE_SPEED: f32 = 140.0;
    pub(crate) const BOSS_SCORE_MULTIPLIER: u32 = 1_000;
    pub(crate) const BOSS_DROP_RATE: f64 = 1.0;

    pub(crate) const HEAL_AMOUNT: u32 = 20;
    pub(crate) const BONUS_SCORE: u32 = 500;
    pub(crate) const MAX_HP_INCREASE: u32 = 10;
    pub(crate) const SHIELD_MS: u64 = 8_000;
    pub(crate) const SPEED_MS: u64 = 6_000;
    pub(crate) const MULTISHOT_MS: u64 = 6_000;
    pub(crate) const BOMB_PERCENT: f64 = 0.3;
    pub(crate) const LOW_HP_THRESHOLD: f64 = 0.3;
    pub(crate) const DEFAULT_DROP_RATE: f64 = 0.05;
    pub(crate) const BOSS_DROP_COUNT: u32 = 3;

    pub(crate) const NORMAL: EnemyStats = EnemyStats {
        hp: 20,
        collision_damage: 10,
        bullet_damage: 0,
        bullet_speed: 0.0,
        score: 100,
        shoot_delay: DelayRange::from_const(Duration::ZERO, Duration::ZERO),
        drop_rate: 0.05,
    };

    pub(crate) const SHOOTER: EnemyStats = EnemyStats {
        hp: 30,
        collision_damage: 8,
        bullet_damage: 10,
        bullet_speed: 200.0,
        score: 250,
        shoot_delay: DelayRange::from_const(
            Duration::from_millis(2_000),
            Duration::from_millis(3_000),
        ),
        drop_rate: 0.08,
    };

    pub(crate) fn item_weights() -> [WeightRule; 8] {
        [
            // weapon level up
            WeightRule {
                base: 25.0,
                per_wave: 0.0,
                low_hp_bonus: 0.0,
                weapon_level_bonus: -2.0,
                min: Some(5.0),
                max: None,
            },
            // heal
            WeightRule {
                base: 25.0,
                per_wave: 0.0,
                low_hp_bonus: 20.0,
                weapon_level_bonus: 0.0,
                min: None,
                max: Some(60.0),
            },
            // screen clear
            WeightRule {
                base: 25.0,
                per_wave: 0.5,
                low_hp_bonus: 0.0,
                weapon_level_bonus: 0.0,
                min: None,
                max: Some(40.0),
            },
            // shield
            WeightRule::flat(25.0),
            // speed boost
            WeightRule::flat(15.0),
            // multishot
            WeightRule::flat(15.0),
            // bonus score
            WeightRule::flat(10.0),
            // max hp increase
            WeightRule::flat(10.0),
        ]
    }

    pub(crate) fn drop_buckets() -> Vec<DropBucket> {
        vec![
            DropBucket {
                range: WaveRange::Span(1, 3),
                rate: 0.05,
            },
            DropBucket {
                range: WaveRange::Span(4, 6),
                rate: 0.08,
            },
            DropBucket {
                range: WaveRange::From(7),
                rate: 0.12,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_provider_answers_every_query() {
        let config = ConfigProvider::fallback();
        let wave = Wave::new(1);

        assert_eq!(config.wave_config(wave).spawn_count, 1);
        assert_eq!(config.max_enemies_on_screen(), 20);
        assert_eq!(config.weapon_level_bonus(1), 0);
        assert_eq!(config.weapon_level_bonus(3), 2);
        assert_eq!(config.wave_timer(wave), Duration::from_secs(15));
        assert_eq!(config.auto_fire_delay(), Duration::from_millis(300));
        assert_eq!(config.boss_drop_count(), 3);
        assert_eq!(config.enemy_stats(EnemyKind::Shooter).collision_damage, 8);
    }

    #[test]
    fn empty_document_matches_fallback() {
        let parsed = ConfigProvider::from_toml_str("").expect("empty document parses");
        let fallback = ConfigProvider::fallback();
        assert_eq!(
            parsed.wave_config(Wave::new(4)),
            fallback.wave_config(Wave::new(4))
        );
        assert_eq!(
            parsed.boss_stats(Wave::new(4)),
            fallback.boss_stats(Wave::new(4))
        );
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            ConfigProvider::from_toml_str("not valid toml = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn wave_range_parses_all_accepted_forms() {
        assert_eq!(WaveRange::parse("4"), Some(WaveRange::Exact(4)));
        assert_eq!(WaveRange::parse("2-5"), Some(WaveRange::Span(2, 5)));
        assert_eq!(WaveRange::parse("7+"), Some(WaveRange::From(7)));
        assert_eq!(WaveRange::parse("5-2"), None);
        assert_eq!(WaveRange::parse("banana"), None);
    }

    #[test]
    fn drop_rate_uses_buckets_with_default_fallback() {
        let config = ConfigProvider::from_toml_str(
            r#"
            [items]
            default_drop_rate = 0.01

            [[items.drop_buckets]]
            range = "1-2"
            rate = 0.5
            "#,
        )
        .expect("document parses");

        assert_eq!(config.drop_rate(Wave::new(2)), 0.5);
        assert_eq!(config.drop_rate(Wave::new(9)), 0.01);
    }

    #[test]
    fn wave_timer_buckets_override_the_flat_timer() {
        let config = ConfigProvider::from_toml_str(
            r#"
            [waves]
            timer_seconds = 15

            [[waves.timer_buckets]]
            range = "1-2"
            seconds = 10

            [[waves.timer_buckets]]
            range = "7+"
            seconds = 25
            "#,
        )
        .expect("document parses");

        assert_eq!(config.wave_timer(Wave::new(2)), Duration::from_secs(10));
        assert_eq!(config.wave_timer(Wave::new(4)), Duration::from_secs(15));
        assert_eq!(config.wave_timer(Wave::new(9)), Duration::from_secs(25));
    }

    #[test]
    fn spawn_delay_shortens_with_waves_and_floors() {
        let config = ConfigProvider::fallback();
        let early = config.spawn_delay(Wave::new(1));
        let late = config.spawn_delay(Wave::new(30));
        assert!(late < early);
        assert_eq!(late, Duration::from_millis(600));
    }

    #[test]
    fn boss_stats_scale_with_wave_and_floor_attack_delay() {
        let config = ConfigProvider::fallback();
        let early = config.boss_stats(Wave::new(2));
        let late = config.boss_stats(Wave::new(40));

        assert!(late.hp > early.hp);
        assert_eq!(late.attack_delay, Duration::from_millis(1_200));
        assert_eq!(early.radial_bullet_count, 6);
        assert_eq!(late.radial_bullet_count, 8);
        assert_eq!(early.score, 2_000);
    }

    #[test]
    fn shooter_ratio_is_zero_before_threshold_wave() {
        let config = ConfigProvider::fallback();
        assert_eq!(config.wave_config(Wave::new(4)).shooter_ratio, 0.0);
        assert!(config.wave_config(Wave::new(5)).shooter_ratio > 0.0);
        assert!(config.wave_config(Wave::new(60)).shooter_ratio <= 0.5);
    }

    #[test]
    fn size_reduction_activates_at_threshold() {
        let config = ConfigProvider::fallback();
        assert!(!config.should_reduce_enemy_size(Wave::new(7)));
        assert!(config.should_reduce_enemy_size(Wave::new(8)));
        assert_eq!(config.enemy_size_reduction_percent(), 0.25);
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let config = ConfigProvider::from_toml_str(
            r#"
            [enemies.shooter]
            hp = 99

            [boss]
            score_multiplier = 7
            "#,
        )
        .expect("document parses");

        let shooter = config.enemy_stats(EnemyKind::Shooter);
        assert_eq!(shooter.hp, 99);
        assert_eq!(shooter.collision_damage, 8);
        assert_eq!(config.boss_stats(Wave::new(3)).score, 21);
    }

    #[test]
    fn weight_rule_evaluation_clamps_and_floors() {
        let rule = WeightRule {
            base: 10.0,
            per_wave: 1.0,
            low_hp_bonus: 5.0,
            weapon_level_bonus: -3.0,
            min: Some(2.0),
            max: Some(20.0),
        };

        assert_eq!(rule.evaluate(Wave::new(5), false, 1), 12.0);
        assert_eq!(rule.evaluate(Wave::new(5), true, 1), 17.0);
        assert_eq!(rule.evaluate(Wave::new(50), false, 1), 20.0);
        assert_eq!(rule.evaluate(Wave::new(1), false, 20), 2.0);
    }
}
