#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted item drop resolution.
//!
//! Destruction events carry the drop probability resolved at spawn time; the
//! resolver rolls them, picks a kind through cumulative weighted selection
//! over the fixed kind order, and emits `SpawnItem` commands carrying
//! config-resolved magnitudes. The roll and draw cores take explicit numbers
//! so every boundary is testable without touching an RNG.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use selker_config::ConfigProvider;
use selker_core::{
    Command, EnemyKind, Event, ItemKind, ItemSpawnSpec, Position, SimulationView, Wave,
};

const BOSS_DROP_RADIUS: f32 = 30.0;

/// Whether a destruction at the provided wave drops an item for this roll.
///
/// The comparison is strict, so a roll exactly at the configured rate misses.
#[must_use]
pub fn should_drop(config: &ConfigProvider, wave: Wave, roll: f64) -> bool {
    roll < config.drop_rate(wave)
}

/// Selects the dropped item kind for a unit-interval draw.
///
/// Weights are evaluated per kind in the canonical [`ItemKind::ALL`] order and
/// summed cumulatively; the draw scales against the total, so a boundary draw
/// of exactly `1.0` lands on the last kind with positive weight. A zero total
/// falls back to the configured kind rather than dropping nothing.
#[must_use]
pub fn select_kind(
    config: &ConfigProvider,
    wave: Wave,
    player_hp_fraction: f64,
    weapon_level: u32,
    draw: f64,
) -> ItemKind {
    let low_hp = player_hp_fraction < config.low_hp_threshold();
    let mut weights = [0.0f64; ItemKind::ALL.len()];
    let mut total = 0.0;
    for (index, kind) in ItemKind::ALL.iter().enumerate() {
        let weight = config.item_weight(*kind).evaluate(wave, low_hp, weapon_level);
        weights[index] = weight;
        total += weight;
    }

    if total <= 0.0 {
        return config.fallback_item();
    }

    let target = draw.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = config.fallback_item();
    for (index, kind) in ItemKind::ALL.iter().enumerate() {
        if weights[index] <= 0.0 {
            continue;
        }
        cumulative += weights[index];
        last_positive = *kind;
        if target < cumulative {
            return *kind;
        }
    }
    last_positive
}

/// Pure system that converts destruction events into item spawn commands.
#[derive(Debug)]
pub struct ItemDropResolver {
    config: ConfigProvider,
    rng: ChaCha8Rng,
}

impl ItemDropResolver {
    /// Creates a resolver with a deterministic random stream.
    #[must_use]
    pub fn new(config: ConfigProvider, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes destruction events and emits `SpawnItem` commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::EnemyDestroyed {
                kind,
                position,
                drop_rate,
                ..
            } = event
            else {
                continue;
            };

            // Contact kills pay no score but still roll for loot.
            match kind {
                EnemyKind::Boss => {
                    self.resolve_boss_drops(*position, view, out_commands);
                }
                EnemyKind::Normal | EnemyKind::Shooter => {
                    let roll = self.rng.gen::<f64>();
                    if roll < *drop_rate {
                        let spec = self.resolve_drop(*position, view);
                        out_commands.push(Command::SpawnItem { spec });
                    }
                }
            }
        }
    }

    // A boss death always yields the full configured count; the per-enemy
    // drop rate never gates boss loot.
    fn resolve_boss_drops(
        &mut self,
        position: Position,
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        let count = self.config.boss_drop_count();
        if count == 0 {
            return;
        }
        let step = std::f32::consts::TAU / count as f32;
        for index in 0..count {
            let angle = step * index as f32;
            let offset = position.offset(
                angle.cos() * BOSS_DROP_RADIUS,
                angle.sin() * BOSS_DROP_RADIUS,
            );
            let spec = self.resolve_drop(offset, view);
            out_commands.push(Command::SpawnItem { spec });
        }
    }

    fn resolve_drop(&mut self, position: Position, view: &SimulationView) -> ItemSpawnSpec {
        let draw = self.rng.gen::<f64>();
        let kind = select_kind(
            &self.config,
            view.wave,
            view.player_hp_fraction(),
            view.weapon_level,
            draw,
        );
        let effects = self.config.item_effects();
        let (magnitude, duration) = match kind {
            ItemKind::WeaponLevelUp => (1, None),
            ItemKind::Heal => (effects.heal_amount, None),
            ItemKind::ScreenClear => ((effects.bomb_percent * 100.0).round() as u32, None),
            ItemKind::Shield => (0, Some(effects.shield_duration)),
            ItemKind::SpeedBoost => (0, Some(effects.speed_boost_duration)),
            ItemKind::Multishot => (0, Some(effects.multishot_duration)),
            ItemKind::BonusScore => (effects.bonus_score, None),
            ItemKind::MaxHpIncrease => (effects.max_hp_increase, None),
        };
        ItemSpawnSpec {
            kind,
            magnitude,
            duration,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selker_core::{ArenaSize, DestructionCause, EnemyId};

    const FOUR_WAY_WEIGHTS: &str = r#"
        [items]
        weapon_level_up = { base = 25.0 }
        heal = { base = 25.0 }
        screen_clear = { base = 25.0 }
        shield = { base = 25.0 }
        speed_boost = { base = 0.0 }
        multishot = { base = 0.0 }
        bonus_score_weight = { base = 0.0 }
        max_hp_increase_weight = { base = 0.0 }
    "#;

    fn view() -> SimulationView {
        SimulationView {
            wave: Wave::FIRST,
            weapon_level: 1,
            player_hp: 100,
            player_max_hp: 100,
            enemies_alive: 0,
            boss_alive: false,
            paused: false,
            game_over: false,
            arena: ArenaSize::new(800.0, 600.0),
        }
    }

    fn destroyed(kind: EnemyKind, cause: DestructionCause, drop_rate: f64) -> Event {
        Event::EnemyDestroyed {
            enemy: EnemyId::new(0),
            kind,
            cause,
            position: Position::new(200.0, 200.0),
            drop_rate,
        }
    }

    #[test]
    fn drop_thresholds_compare_strictly() {
        let config = ConfigProvider::fallback();
        // Waves one through three carry a 0.05 rate by default.
        assert!(should_drop(&config, Wave::FIRST, 0.04));
        assert!(!should_drop(&config, Wave::FIRST, 0.06));
        assert!(!should_drop(&config, Wave::FIRST, 0.05));
    }

    #[test]
    fn equal_weights_select_each_kind_about_a_quarter_of_the_time() {
        let config = ConfigProvider::from_toml_str(FOUR_WAY_WEIGHTS).expect("config");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut counts = [0u32; ItemKind::ALL.len()];

        for _ in 0..10_000 {
            let kind = select_kind(&config, Wave::FIRST, 1.0, 1, rng.gen::<f64>());
            let index = ItemKind::ALL
                .iter()
                .position(|candidate| *candidate == kind)
                .expect("canonical kind");
            counts[index] += 1;
        }

        for index in 0..4 {
            let fraction = f64::from(counts[index]) / 10_000.0;
            assert!(
                (0.22..=0.28).contains(&fraction),
                "kind {index} frequency {fraction}"
            );
        }
        for index in 4..ItemKind::ALL.len() {
            assert_eq!(counts[index], 0);
        }
    }

    #[test]
    fn boundary_draw_lands_on_the_last_weighted_kind() {
        let config = ConfigProvider::from_toml_str(FOUR_WAY_WEIGHTS).expect("config");
        let kind = select_kind(&config, Wave::FIRST, 1.0, 1, 1.0);
        assert_eq!(kind, ItemKind::Shield);
    }

    #[test]
    fn zero_total_weight_falls_back_to_heal() {
        let document = r#"
            [items]
            weapon_level_up = { base = 0.0 }
            heal = { base = 0.0 }
            screen_clear = { base = 0.0 }
            shield = { base = 0.0 }
            speed_boost = { base = 0.0 }
            multishot = { base = 0.0 }
            bonus_score_weight = { base = 0.0 }
            max_hp_increase_weight = { base = 0.0 }
        "#;
        let config = ConfigProvider::from_toml_str(document).expect("config");
        assert_eq!(
            select_kind(&config, Wave::FIRST, 1.0, 1, 0.5),
            ItemKind::Heal
        );
    }

    #[test]
    fn boss_death_yields_the_configured_drop_count() {
        let mut resolver = ItemDropResolver::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        resolver.handle(
            &[destroyed(EnemyKind::Boss, DestructionCause::WeaponHit, 1.0)],
            &view(),
            &mut commands,
        );

        let drops = commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnItem { .. }))
            .count();
        assert_eq!(drops, 3);
    }

    #[test]
    fn boss_drops_ignore_the_reported_drop_rate() {
        let mut resolver = ItemDropResolver::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        resolver.handle(
            &[destroyed(EnemyKind::Boss, DestructionCause::WeaponHit, 0.0)],
            &view(),
            &mut commands,
        );

        let drops = commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnItem { .. }))
            .count();
        assert_eq!(drops, 3);
    }

    #[test]
    fn contact_kills_still_roll_for_loot() {
        let mut resolver = ItemDropResolver::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        resolver.handle(
            &[destroyed(
                EnemyKind::Normal,
                DestructionCause::PlayerContact,
                1.0,
            )],
            &view(),
            &mut commands,
        );

        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn certain_drop_rate_always_spawns_an_item() {
        let mut resolver = ItemDropResolver::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        resolver.handle(
            &[destroyed(EnemyKind::Normal, DestructionCause::WeaponHit, 1.0)],
            &view(),
            &mut commands,
        );

        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn low_hp_bonus_shifts_weight_toward_heals() {
        let document = r#"
            [items]
            weapon_level_up = { base = 10.0 }
            heal = { base = 0.0, low_hp_bonus = 100.0 }
            screen_clear = { base = 0.0 }
            shield = { base = 0.0 }
            speed_boost = { base = 0.0 }
            multishot = { base = 0.0 }
            bonus_score_weight = { base = 0.0 }
            max_hp_increase_weight = { base = 0.0 }
            low_hp_threshold = 0.3
        "#;
        let config = ConfigProvider::from_toml_str(document).expect("config");

        // Healthy player never sees the bonus weight.
        assert_eq!(
            select_kind(&config, Wave::FIRST, 1.0, 1, 0.99),
            ItemKind::WeaponLevelUp
        );
        // At 10 vs 110 total weight, any draw beyond the first slice heals.
        assert_eq!(
            select_kind(&config, Wave::FIRST, 0.2, 1, 0.5),
            ItemKind::Heal
        );
    }
}
