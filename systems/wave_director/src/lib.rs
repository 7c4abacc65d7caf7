#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave progression and enemy spawning system.
//!
//! The director owns the real-time wave countdown and the spawn cadence. It
//! consumes the world's event stream plus an immutable [`SimulationView`] and
//! responds exclusively with commands: `AdvanceWave` when the countdown
//! elapses, one `SpawnBoss` per wave transition carrying a stats snapshot
//! resolved from config at that moment, and periodic `SpawnEnemy` bursts whose
//! size grows with the wave and the player's weapon level.
//!
//! All randomness flows through a private SplitMix64 stream seeded via SHA-256
//! from the global seed, so identical seeds replay identical campaigns.

use std::time::Duration;

use selker_config::ConfigProvider;
use selker_core::{
    BossSpawnSpec, Command, EnemyKind, EnemySpawnSpec, Event, Position, SimulationView, Wave,
    SPAWN_BURST_CAP,
};
use sha2::{Digest, Sha256};

const RNG_STREAM_WAVE_DIRECTOR: &str = "wave-director";
const BOSS_SPAWN_Y: f32 = 80.0;
const ENEMY_SPAWN_Y: f32 = 20.0;

/// Pure system that drives wave transitions and enemy spawn bursts.
#[derive(Debug)]
pub struct WaveDirector {
    config: ConfigProvider,
    rng: SplitMix64,
    wave_countdown: Duration,
    spawn_cadence: Duration,
    boss_emitted: bool,
}

impl WaveDirector {
    /// Creates a director seeded deterministically from the global seed.
    #[must_use]
    pub fn new(config: ConfigProvider, global_seed: u64) -> Self {
        let rng = SplitMix64::new(derive_labeled_seed(global_seed, RNG_STREAM_WAVE_DIRECTOR));
        let wave_countdown = config.wave_timer(Wave::FIRST);
        let spawn_cadence = config.spawn_delay(Wave::FIRST);
        Self {
            config,
            rng,
            wave_countdown,
            spawn_cadence,
            boss_emitted: false,
        }
    }

    /// Consumes world events and emits spawn and wave-advance commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        if view.paused || view.game_over {
            return;
        }

        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.advance_countdown(*dt, view, out_commands);
                    self.advance_cadence(*dt, view, out_commands);
                }
                Event::WaveAdvanced { wave } => {
                    self.wave_countdown = self.config.wave_timer(*wave);
                    self.spawn_cadence = self.config.spawn_delay(*wave);
                    self.boss_emitted = false;
                }
                _ => {}
            }
        }
    }

    fn advance_countdown(
        &mut self,
        dt: Duration,
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        self.wave_countdown = self.wave_countdown.saturating_sub(dt);
        if !self.wave_countdown.is_zero() {
            return;
        }

        let next = view.wave.next();
        out_commands.push(Command::AdvanceWave { wave: next });

        // One boss per transition. The flag holds the emission back until the
        // world confirms the advance, and the world itself skips duplicates
        // while a boss lives.
        if !self.boss_emitted {
            out_commands.push(Command::SpawnBoss {
                spec: self.resolve_boss_spec(next, view),
            });
            self.boss_emitted = true;
        }

        self.emit_spawn_burst(next, view, out_commands);

        // Local re-arm keeps the countdown from refiring every tick while the
        // WaveAdvanced confirmation is still in flight.
        self.wave_countdown = self.config.wave_timer(next);
    }

    fn advance_cadence(
        &mut self,
        dt: Duration,
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        self.spawn_cadence = self.spawn_cadence.saturating_sub(dt);
        if !self.spawn_cadence.is_zero() {
            return;
        }
        self.emit_spawn_burst(view.wave, view, out_commands);
        self.spawn_cadence = self.config.spawn_delay(view.wave);
    }

    fn resolve_boss_spec(&self, wave: Wave, view: &SimulationView) -> BossSpawnSpec {
        let stats = self.config.boss_stats(wave);
        BossSpawnSpec {
            wave,
            hp: stats.hp,
            collision_damage: stats.collision_damage,
            attack_delay: stats.attack_delay,
            radial_bullet_count: stats.radial_bullet_count,
            bullet_speed: stats.bullet_speed,
            bullet_damage: stats.bullet_damage,
            missile_damage: stats.missile_damage,
            missile_speed: stats.missile_speed,
            score: stats.score,
            drop_rate: stats.drop_rate,
            position: Position::new(view.arena.width() / 2.0, BOSS_SPAWN_Y),
        }
    }

    fn emit_spawn_burst(
        &mut self,
        wave: Wave,
        view: &SimulationView,
        out_commands: &mut Vec<Command>,
    ) {
        // Skip, not queue: bursts at the concurrency ceiling are dropped.
        if view.enemies_alive >= self.config.max_enemies_on_screen() {
            return;
        }

        let wave_config = self.config.wave_config(wave);
        let bonus = self.config.weapon_level_bonus(view.weapon_level);
        let count = wave_config
            .spawn_count
            .saturating_add(bonus)
            .min(SPAWN_BURST_CAP);

        let scale = if self.config.should_reduce_enemy_size(wave) {
            1.0 - self.config.enemy_size_reduction_percent()
        } else {
            1.0
        };
        let drop_rate = self.config.drop_rate(wave);

        for _ in 0..count {
            let kind = if self.rng.next_unit() < wave_config.shooter_ratio {
                EnemyKind::Shooter
            } else {
                EnemyKind::Normal
            };
            let stats = self.config.enemy_stats(kind);
            let x = (self.rng.next_unit() as f32) * view.arena.width();
            out_commands.push(Command::SpawnEnemy {
                spec: EnemySpawnSpec {
                    kind,
                    hp: stats.hp,
                    collision_damage: stats.collision_damage,
                    bullet_damage: stats.bullet_damage,
                    bullet_speed: stats.bullet_speed,
                    score: stats.score,
                    drop_rate,
                    shoot_delay: match kind {
                        EnemyKind::Shooter => Some(stats.shoot_delay),
                        EnemyKind::Normal | EnemyKind::Boss => None,
                    },
                    scale,
                    position: Position::new(x, ENEMY_SPAWN_Y),
                },
            });
        }
    }
}

fn derive_labeled_seed(global_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    fn next_unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let value = self.next_u64() >> 11;
        (value as f64) * SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selker_core::ArenaSize;

    fn view(wave: u32, weapon_level: u32, enemies_alive: u32) -> SimulationView {
        SimulationView {
            wave: Wave::new(wave),
            weapon_level,
            player_hp: 100,
            player_max_hp: 100,
            enemies_alive,
            boss_alive: false,
            paused: false,
            game_over: false,
            arena: ArenaSize::new(800.0, 600.0),
        }
    }

    fn tick_event(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    fn spawn_count(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
            .count()
    }

    #[test]
    fn first_wave_burst_spawns_a_single_enemy() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        // Default wave-one cadence is two seconds.
        director.handle(&[tick_event(2_000)], &view(1, 1, 0), &mut commands);

        assert_eq!(spawn_count(&commands), 1);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::AdvanceWave { .. })));
    }

    #[test]
    fn burst_is_skipped_at_the_concurrency_ceiling() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        director.handle(&[tick_event(2_000)], &view(1, 1, 20), &mut commands);

        assert_eq!(spawn_count(&commands), 0);
    }

    #[test]
    fn countdown_expiry_advances_wave_and_spawns_one_boss() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        director.handle(&[tick_event(15_000)], &view(1, 1, 0), &mut commands);

        assert!(commands.contains(&Command::AdvanceWave { wave: Wave::new(2) }));
        let bosses = commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnBoss { .. }))
            .count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn boss_is_not_emitted_twice_before_the_advance_confirms() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();

        director.handle(&[tick_event(15_000)], &view(1, 1, 0), &mut commands);
        director.handle(&[tick_event(15_000)], &view(1, 1, 0), &mut commands);

        let bosses = commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnBoss { .. }))
            .count();
        assert_eq!(bosses, 1);

        // The confirmation re-arms the flag for the next transition.
        let confirm = Event::WaveAdvanced { wave: Wave::new(2) };
        director.handle(&[confirm], &view(2, 1, 0), &mut commands);
        commands.clear();
        director.handle(&[tick_event(15_000)], &view(2, 1, 0), &mut commands);
        let bosses = commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnBoss { .. }))
            .count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn bucketed_wave_timer_rearms_the_countdown_after_the_advance() {
        let config = ConfigProvider::from_toml_str(
            r#"
            [[waves.timer_buckets]]
            range = "2"
            seconds = 5
            "#,
        )
        .expect("document parses");
        let mut director = WaveDirector::new(config, 7);
        let mut commands = Vec::new();

        // Wave one runs on the default fifteen-second timer.
        director.handle(&[tick_event(15_000)], &view(1, 1, 0), &mut commands);
        assert!(commands.contains(&Command::AdvanceWave { wave: Wave::new(2) }));

        let confirm = Event::WaveAdvanced { wave: Wave::new(2) };
        director.handle(&[confirm], &view(2, 1, 0), &mut commands);

        // Wave two's bucket shortens the countdown to five seconds.
        commands.clear();
        director.handle(&[tick_event(5_000)], &view(2, 1, 0), &mut commands);
        assert!(commands.contains(&Command::AdvanceWave { wave: Wave::new(3) }));
    }

    #[test]
    fn early_waves_never_spawn_shooters() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 99);
        let mut commands = Vec::new();

        for _ in 0..20 {
            director.handle(&[tick_event(2_000)], &view(1, 1, 0), &mut commands);
        }

        for command in &commands {
            if let Command::SpawnEnemy { spec } = command {
                assert_eq!(spec.kind, EnemyKind::Normal);
            }
        }
        assert!(spawn_count(&commands) > 0);
    }

    #[test]
    fn paused_view_suppresses_all_output() {
        let mut director = WaveDirector::new(ConfigProvider::fallback(), 7);
        let mut commands = Vec::new();
        let mut paused = view(1, 1, 0);
        paused.paused = true;

        director.handle(&[tick_event(60_000)], &paused, &mut commands);

        assert!(commands.is_empty());
    }

    #[test]
    fn identical_seeds_replay_identical_campaigns() {
        let script = [tick_event(2_000), tick_event(2_000), tick_event(15_000)];
        let mut first = Vec::new();
        let mut second = Vec::new();

        let mut director_a = WaveDirector::new(ConfigProvider::fallback(), 1234);
        let mut director_b = WaveDirector::new(ConfigProvider::fallback(), 1234);
        for event in &script {
            director_a.handle(std::slice::from_ref(event), &view(1, 1, 0), &mut first);
            director_b.handle(std::slice::from_ref(event), &view(1, 1, 0), &mut second);
        }

        assert_eq!(first, second);
    }
}
