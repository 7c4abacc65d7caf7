#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the Selker combat engine.
//!
//! The world owns every mutable entity (the player, enemies, projectiles,
//! items) together with the cooperative scheduler that drives behavior
//! timers. All mutation flows through [`apply`]; systems and the hosting
//! shell observe the world exclusively through broadcast [`Event`] values and
//! the read-only [`query`] module.
//!
//! Within one tick the processing order is fixed: behavior timers fire first
//! (emitting fresh projectiles), then projectiles move and expire, then buffs
//! and items age out. Collision reports arrive as separate commands from the
//! hosting shell after the tick, so freshly spawned entities never resolve a
//! stale overlap from the previous frame.

use std::time::Duration;

use selker_core::{
    ArenaSize, Buff, Command, DelayRange, DestructionCause, EnemyId, EnemyKind, Event, ItemId,
    ItemKind, PlayerLoadout, Position, ProjectileId, ProjectileSide, Velocity, Wave,
};
use selker_system_combat::{
    apply_hit, bomb_damage, boss_weapon_damage, contact_outcome, score_for, ContactOutcome,
};
use selker_system_scheduler::{Scheduler, TimerHandle};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const DEFAULT_SEED: u64 = 0x5e1c_e7a9_0b3d_f441;

const PLAYER_SPAWN_MARGIN: f32 = 40.0;
const PLAYER_SHOT_TTL: Duration = Duration::from_secs(3);
const ENEMY_BULLET_TTL: Duration = Duration::from_secs(6);
const MISSILE_TTL: Duration = Duration::from_secs(5);
const HOMING_STEER_INTERVAL: Duration = Duration::from_millis(50);
const ITEM_LIFETIME: Duration = Duration::from_secs(10);
const MULTISHOT_SPREAD_RADIANS: f32 = 0.26;

const DEFAULT_ARENA: ArenaSize = ArenaSize::new(800.0, 600.0);
const DEFAULT_LOADOUT: PlayerLoadout = PlayerLoadout {
    max_hp: 100,
    weapon_damage: 10,
    weapon_level_cap: 9,
    auto_fire_delay: Duration::from_millis(300),
    projectile_speed: 420.0,
};

/// Represents the authoritative Selker simulation state.
#[derive(Debug)]
pub struct World {
    arena: ArenaSize,
    rng_state: u64,
    scheduler: Scheduler,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    items: Vec<Item>,
    wave: Wave,
    score: u64,
    paused: bool,
    game_over: bool,
    play_time: Duration,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_item_id: u32,
    auto_fire: Option<TimerHandle>,
}

impl World {
    /// Creates a world configured with default arena and loadout.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            arena: DEFAULT_ARENA,
            rng_state: DEFAULT_SEED,
            scheduler: Scheduler::new(),
            player: Player::from_loadout(DEFAULT_LOADOUT, DEFAULT_ARENA),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            wave: Wave::FIRST,
            score: 0,
            paused: false,
            game_over: false,
            play_time: Duration::ZERO,
            next_enemy_id: 0,
            next_projectile_id: 0,
            next_item_id: 0,
            auto_fire: None,
        };
        world.auto_fire = Some(
            world
                .scheduler
                .schedule_repeating(DEFAULT_LOADOUT.auto_fire_delay),
        );
        world
    }

    fn reset(&mut self, arena: ArenaSize, loadout: PlayerLoadout, seed: u64) {
        self.arena = arena;
        self.rng_state = seed;
        self.scheduler = Scheduler::new();
        self.player = Player::from_loadout(loadout, arena);
        self.enemies.clear();
        self.projectiles.clear();
        self.items.clear();
        self.wave = Wave::FIRST;
        self.score = 0;
        self.paused = false;
        self.game_over = false;
        self.play_time = Duration::ZERO;
        self.auto_fire = Some(self.scheduler.schedule_repeating(loadout.auto_fire_delay));
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn random_delay(&mut self, range: DelayRange) -> Duration {
        let min = range.min().as_millis() as u64;
        let max = range.max().as_millis() as u64;
        if min >= max {
            return range.min();
        }
        let span = max - min + 1;
        let value = self.advance_rng() % span;
        Duration::from_millis(min + value)
    }

    fn alive_enemies(&self) -> u32 {
        self.enemies.iter().filter(|enemy| enemy.alive).count() as u32
    }

    fn boss_alive(&self) -> bool {
        self.enemies
            .iter()
            .any(|enemy| enemy.alive && matches!(enemy.behavior, Behavior::Boss { .. }))
    }

    fn enemy_index(&self, enemy_id: EnemyId) -> Option<usize> {
        self.enemies
            .iter()
            .position(|enemy| enemy.id == enemy_id && enemy.alive)
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id = self.next_item_id.wrapping_add(1);
        id
    }

    fn spawn_projectile(
        &mut self,
        side: ProjectileSide,
        position: Position,
        velocity: Velocity,
        damage: u32,
        ttl: Duration,
        homing: Option<Homing>,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile {
            id,
            side,
            position,
            velocity,
            damage,
            ttl,
            homing,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            side,
            position,
        });
    }

    fn fire_player_weapon(&mut self, out_events: &mut Vec<Event>) {
        let position = self.player.position;
        let speed = self.player.projectile_speed;
        let damage = self.player.weapon_damage;

        if self.player.multishot.is_some() {
            for spread in [-MULTISHOT_SPREAD_RADIANS, 0.0, MULTISHOT_SPREAD_RADIANS] {
                let velocity = Velocity::new(speed * spread.sin(), -speed * spread.cos());
                self.spawn_projectile(
                    ProjectileSide::Player,
                    position,
                    velocity,
                    damage,
                    PLAYER_SHOT_TTL,
                    None,
                    out_events,
                );
            }
        } else {
            self.spawn_projectile(
                ProjectileSide::Player,
                position,
                Velocity::new(0.0, -speed),
                damage,
                PLAYER_SHOT_TTL,
                None,
                out_events,
            );
        }
    }

    fn dispatch_timer(&mut self, handle: TimerHandle, out_events: &mut Vec<Event>) {
        if self.auto_fire == Some(handle) {
            self.fire_player_weapon(out_events);
            return;
        }

        let Some(index) = self
            .enemies
            .iter()
            .position(|enemy| enemy.alive && enemy.behavior.timer() == Some(handle))
        else {
            // Destroyed-owner guard: a cancelled or swept entity's handle
            // fires into the void instead of a disposed entity.
            return;
        };

        let position = self.enemies[index].position;
        match self.enemies[index].behavior {
            Behavior::Normal => {}
            Behavior::Shooter {
                bullet_damage,
                bullet_speed,
                delay,
                ..
            } => {
                // Aimed at the player's position at fire time, not predictive.
                let velocity = Velocity::toward(position, self.player.position, bullet_speed);
                self.spawn_projectile(
                    ProjectileSide::Enemy,
                    position,
                    velocity,
                    bullet_damage,
                    ENEMY_BULLET_TTL,
                    None,
                    out_events,
                );
                let next_delay = self.random_delay(delay);
                let rearmed = self.scheduler.schedule_once(next_delay);
                if let Behavior::Shooter { timer, .. } = &mut self.enemies[index].behavior {
                    *timer = rearmed;
                }
            }
            Behavior::Boss {
                radial_bullet_count,
                bullet_speed,
                bullet_damage,
                missile_damage,
                missile_speed,
                ..
            } => {
                // High bit: the LCG's low bits cycle with short periods, so a
                // parity check would strictly alternate patterns.
                if self.advance_rng() >> 63 == 0 {
                    self.fire_radial_burst(
                        position,
                        radial_bullet_count,
                        bullet_speed,
                        bullet_damage,
                        out_events,
                    );
                } else {
                    let velocity =
                        Velocity::toward(position, self.player.position, missile_speed);
                    self.spawn_projectile(
                        ProjectileSide::Enemy,
                        position,
                        velocity,
                        missile_damage,
                        MISSILE_TTL,
                        Some(Homing {
                            speed: missile_speed,
                            steer_accumulator: Duration::ZERO,
                        }),
                        out_events,
                    );
                }
            }
        }
    }

    fn fire_radial_burst(
        &mut self,
        origin: Position,
        count: u32,
        speed: f32,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) {
        if count == 0 {
            return;
        }
        let step = std::f32::consts::TAU / count as f32;
        for index in 0..count {
            let angle = step * index as f32;
            let velocity = Velocity::new(angle.cos() * speed, angle.sin() * speed);
            self.spawn_projectile(
                ProjectileSide::Enemy,
                origin,
                velocity,
                damage,
                ENEMY_BULLET_TTL,
                None,
                out_events,
            );
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let player_position = self.player.position;
        let arena = self.arena;

        for projectile in &mut self.projectiles {
            if let Some(homing) = &mut projectile.homing {
                homing.steer_accumulator += dt;
                while homing.steer_accumulator >= HOMING_STEER_INTERVAL {
                    homing.steer_accumulator -= HOMING_STEER_INTERVAL;
                    projectile.velocity =
                        Velocity::toward(projectile.position, player_position, homing.speed);
                }
            }
            projectile.position = projectile.position.offset(
                projectile.velocity.dx() * seconds,
                projectile.velocity.dy() * seconds,
            );
            projectile.ttl = projectile.ttl.saturating_sub(dt);
        }

        let mut survivors = Vec::with_capacity(self.projectiles.len());
        for projectile in self.projectiles.drain(..) {
            if projectile.ttl.is_zero() || !arena.contains(projectile.position) {
                out_events.push(Event::ProjectileDespawned {
                    projectile: projectile.id,
                });
            } else {
                survivors.push(projectile);
            }
        }
        self.projectiles = survivors;
    }

    fn advance_buffs(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for (buff, slot) in [
            (Buff::Shield, &mut self.player.shield),
            (Buff::SpeedBoost, &mut self.player.speed_boost),
            (Buff::Multishot, &mut self.player.multishot),
        ] {
            if let Some(remaining) = slot {
                let next = remaining.saturating_sub(dt);
                if next.is_zero() {
                    *slot = None;
                    out_events.push(Event::BuffExpired { buff });
                } else {
                    *remaining = next;
                }
            }
        }
    }

    fn advance_items(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut survivors = Vec::with_capacity(self.items.len());
        for mut item in self.items.drain(..) {
            item.ttl = item.ttl.saturating_sub(dt);
            if item.ttl.is_zero() {
                out_events.push(Event::ItemExpired { item: item.id });
            } else {
                survivors.push(item);
            }
        }
        self.items = survivors;
    }

    /// Destruction side effects fire exactly once per enemy: the alive guard
    /// makes a duplicate invocation a no-op rather than a double payout.
    fn destroy_enemy(&mut self, index: usize, cause: DestructionCause, out_events: &mut Vec<Event>) {
        if !self.enemies[index].alive {
            return;
        }
        self.enemies[index].alive = false;

        if let Some(handle) = self.enemies[index].behavior.timer() {
            let _ = self.scheduler.cancel(handle);
        }

        let enemy = &self.enemies[index];
        let kind = enemy.behavior.kind();
        let payout = enemy.score;
        let position = enemy.position;
        let drop_rate = enemy.drop_rate;
        let id = enemy.id;

        if let Some(delta) = score_for(cause, payout) {
            self.score = self.score.saturating_add(delta);
            out_events.push(Event::ScoreChanged {
                score: self.score,
                delta,
            });
        }

        out_events.push(Event::EnemyDestroyed {
            enemy: id,
            kind,
            cause,
            position,
            drop_rate,
        });
    }

    fn damage_player(&mut self, damage: u32, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        self.player.hp = self.player.hp.saturating_sub(damage);
        out_events.push(Event::PlayerDamaged {
            damage,
            remaining: self.player.hp,
        });
        if self.player.hp == 0 {
            // Idempotent terminal transition.
            self.game_over = true;
            out_events.push(Event::GameOver {
                score: self.score,
                wave: self.wave,
            });
        }
    }

    fn detonate_screen_clear(&mut self, percent: f64, out_events: &mut Vec<Event>) {
        for index in 0..self.enemies.len() {
            if !self.enemies[index].alive {
                continue;
            }
            match self.enemies[index].behavior {
                Behavior::Boss { .. } => {
                    let damage = bomb_damage(self.enemies[index].hp, percent);
                    let raw = boss_weapon_damage(damage, true);
                    let outcome = apply_hit(self.enemies[index].hp, raw);
                    self.enemies[index].hp = outcome.remaining;
                    if outcome.destroyed {
                        self.destroy_enemy(index, DestructionCause::ScreenClear, out_events);
                    } else {
                        out_events.push(Event::EnemyDamaged {
                            enemy: self.enemies[index].id,
                            remaining: outcome.remaining,
                        });
                    }
                }
                Behavior::Normal | Behavior::Shooter { .. } => {
                    self.enemies[index].hp = 0;
                    self.destroy_enemy(index, DestructionCause::ScreenClear, out_events);
                }
            }
        }
    }

    fn apply_item_effect(&mut self, item: Item, out_events: &mut Vec<Event>) {
        match item.kind {
            ItemKind::WeaponLevelUp => {
                if self.player.weapon_level < self.player.weapon_level_cap {
                    self.player.weapon_level += 1;
                    out_events.push(Event::WeaponLevelChanged {
                        level: self.player.weapon_level,
                    });
                }
            }
            ItemKind::Heal => {
                let headroom = self.player.max_hp.saturating_sub(self.player.hp);
                let amount = item.magnitude.min(headroom);
                if amount > 0 {
                    self.player.hp += amount;
                    out_events.push(Event::PlayerHealed {
                        amount,
                        hp: self.player.hp,
                    });
                }
            }
            ItemKind::ScreenClear => {
                // Magnitude carries the boss-damage percent scaled by 100.
                let percent = f64::from(item.magnitude) / 100.0;
                self.detonate_screen_clear(percent, out_events);
            }
            ItemKind::Shield => {
                let duration = item.duration.unwrap_or_default();
                self.player.shield = Some(duration);
                out_events.push(Event::BuffStarted {
                    buff: Buff::Shield,
                    duration,
                });
            }
            ItemKind::SpeedBoost => {
                let duration = item.duration.unwrap_or_default();
                self.player.speed_boost = Some(duration);
                out_events.push(Event::BuffStarted {
                    buff: Buff::SpeedBoost,
                    duration,
                });
            }
            ItemKind::Multishot => {
                let duration = item.duration.unwrap_or_default();
                self.player.multishot = Some(duration);
                out_events.push(Event::BuffStarted {
                    buff: Buff::Multishot,
                    duration,
                });
            }
            ItemKind::BonusScore => {
                let delta = u64::from(item.magnitude);
                self.score = self.score.saturating_add(delta);
                out_events.push(Event::ScoreChanged {
                    score: self.score,
                    delta,
                });
            }
            ItemKind::MaxHpIncrease => {
                self.player.max_hp = self.player.max_hp.saturating_add(item.magnitude);
                out_events.push(Event::MaxHpRaised {
                    max_hp: self.player.max_hp,
                });
            }
        }
    }

    fn sweep_destroyed(&mut self) {
        self.enemies.retain(|enemy| enemy.alive);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSimulation {
            arena,
            loadout,
            seed,
        } => {
            world.reset(arena, loadout, seed);
        }
        Command::Tick { dt } => {
            if world.paused || world.game_over || dt.is_zero() {
                return;
            }
            world.play_time = world.play_time.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let mut fired = Vec::new();
            world.scheduler.tick(dt, &mut fired);
            for handle in fired {
                world.dispatch_timer(handle, out_events);
            }

            world.advance_projectiles(dt, out_events);
            world.advance_buffs(dt, out_events);
            world.advance_items(dt, out_events);
            world.sweep_destroyed();
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::SetPlayerPosition { position } => {
            let x = position.x().clamp(0.0, world.arena.width());
            let y = position.y().clamp(0.0, world.arena.height());
            world.player.position = Position::new(x, y);
        }
        Command::AdvanceWave { wave } => {
            // Stale or regressive requests are dropped; the counter only
            // ever moves to its immediate successor.
            if world.game_over || wave != world.wave.next() {
                return;
            }
            world.wave = wave;
            out_events.push(Event::WaveAdvanced { wave });
        }
        Command::SpawnEnemy { spec } => {
            // Bosses carry wave-resolved stats and arrive through SpawnBoss;
            // a Boss kind here is dropped like a stale wave request.
            if world.game_over || spec.kind == EnemyKind::Boss {
                return;
            }
            let id = world.allocate_enemy_id();
            let behavior = match spec.kind {
                EnemyKind::Shooter => {
                    let delay = spec
                        .shoot_delay
                        .unwrap_or_else(|| DelayRange::new(Duration::ZERO, Duration::ZERO));
                    let initial = world.random_delay(delay);
                    Behavior::Shooter {
                        bullet_damage: spec.bullet_damage,
                        bullet_speed: spec.bullet_speed,
                        delay,
                        timer: world.scheduler.schedule_once(initial),
                    }
                }
                EnemyKind::Normal | EnemyKind::Boss => Behavior::Normal,
            };
            world.enemies.push(Enemy {
                id,
                hp: spec.hp,
                collision_damage: spec.collision_damage,
                score: spec.score,
                drop_rate: spec.drop_rate,
                position: spec.position,
                scale: spec.scale,
                behavior,
                alive: true,
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind: spec.kind,
                position: spec.position,
            });
        }
        Command::SpawnBoss { spec } => {
            // At most one boss alive at a time; duplicates are skipped.
            if world.game_over || world.boss_alive() {
                return;
            }
            let id = world.allocate_enemy_id();
            let timer = world.scheduler.schedule_repeating(spec.attack_delay);
            world.enemies.push(Enemy {
                id,
                hp: spec.hp,
                collision_damage: spec.collision_damage,
                score: spec.score,
                drop_rate: spec.drop_rate,
                position: spec.position,
                scale: 1.0,
                behavior: Behavior::Boss {
                    radial_bullet_count: spec.radial_bullet_count,
                    bullet_speed: spec.bullet_speed,
                    bullet_damage: spec.bullet_damage,
                    missile_damage: spec.missile_damage,
                    missile_speed: spec.missile_speed,
                    timer,
                },
                alive: true,
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind: EnemyKind::Boss,
                position: spec.position,
            });
            out_events.push(Event::BossSpawned {
                enemy: id,
                wave: spec.wave,
            });
        }
        Command::SpawnItem { spec } => {
            if world.game_over {
                return;
            }
            let id = world.allocate_item_id();
            world.items.push(Item {
                id,
                kind: spec.kind,
                magnitude: spec.magnitude,
                duration: spec.duration,
                position: spec.position,
                ttl: ITEM_LIFETIME,
            });
            out_events.push(Event::ItemSpawned {
                item: id,
                kind: spec.kind,
                position: spec.position,
            });
        }
        Command::ResolveProjectileHit { projectile, enemy } => {
            if world.game_over {
                return;
            }
            let Some(shot_index) = world
                .projectiles
                .iter()
                .position(|candidate| candidate.id == projectile)
            else {
                return;
            };
            if world.projectiles[shot_index].side != ProjectileSide::Player {
                return;
            }
            // The projectile is spent whether or not the enemy survives.
            let shot = world.projectiles.remove(shot_index);

            let Some(index) = world.enemy_index(enemy) else {
                return;
            };
            let damage = match world.enemies[index].behavior {
                Behavior::Boss { .. } => boss_weapon_damage(shot.damage, false),
                Behavior::Normal | Behavior::Shooter { .. } => shot.damage,
            };
            let outcome = apply_hit(world.enemies[index].hp, damage);
            world.enemies[index].hp = outcome.remaining;
            if outcome.destroyed {
                world.destroy_enemy(index, DestructionCause::WeaponHit, out_events);
                world.sweep_destroyed();
            } else {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    remaining: outcome.remaining,
                });
            }
        }
        Command::ResolvePlayerContact { enemy } => {
            if world.game_over {
                return;
            }
            let Some(index) = world.enemy_index(enemy) else {
                return;
            };
            let kind = world.enemies[index].behavior.kind();
            let collision_damage = world.enemies[index].collision_damage;
            match contact_outcome(kind, world.player.shield.is_some(), collision_damage) {
                ContactOutcome::ShieldAbsorbed => {
                    world.player.shield = None;
                    out_events.push(Event::ShieldConsumed);
                }
                ContactOutcome::Damaged {
                    damage,
                    enemy_destroyed,
                } => {
                    if enemy_destroyed {
                        world.destroy_enemy(index, DestructionCause::PlayerContact, out_events);
                        world.sweep_destroyed();
                    }
                    world.damage_player(damage, out_events);
                }
            }
        }
        Command::ResolveProjectilePlayerHit { projectile } => {
            if world.game_over {
                return;
            }
            let Some(shot_index) = world
                .projectiles
                .iter()
                .position(|candidate| candidate.id == projectile)
            else {
                return;
            };
            if world.projectiles[shot_index].side != ProjectileSide::Enemy {
                return;
            }
            let shot = world.projectiles.remove(shot_index);
            if world.player.shield.is_some() {
                world.player.shield = None;
                out_events.push(Event::ShieldConsumed);
            } else {
                world.damage_player(shot.damage, out_events);
            }
        }
        Command::ResolveItemPickup { item } => {
            if world.game_over {
                return;
            }
            let Some(index) = world
                .items
                .iter()
                .position(|candidate| candidate.id == item)
            else {
                return;
            };
            // Removal before application makes the effect exactly-once even
            // if the shell reports the same overlap twice.
            let picked = world.items.remove(index);
            out_events.push(Event::ItemPickedUp {
                item: picked.id,
                kind: picked.kind,
            });
            world.apply_item_effect(picked, out_events);
            world.sweep_destroyed();
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use selker_core::{
        Buff, EnemyId, EnemyKind, ItemId, ItemKind, Position, ProjectileId, ProjectileSide,
        SimulationView, Wave,
    };

    use super::{Behavior, World};

    /// Captures the summary view consumed by pure systems.
    #[must_use]
    pub fn simulation_view(world: &World) -> SimulationView {
        SimulationView {
            wave: world.wave,
            weapon_level: world.player.weapon_level,
            player_hp: world.player.hp,
            player_max_hp: world.player.max_hp,
            enemies_alive: world.alive_enemies(),
            boss_alive: world.boss_alive(),
            paused: world.paused,
            game_over: world.game_over,
            arena: world.arena,
        }
    }

    /// Current score total.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Wave currently in progress.
    #[must_use]
    pub fn wave(world: &World) -> Wave {
        world.wave
    }

    /// Total simulated time the world has been running, pauses excluded.
    #[must_use]
    pub fn play_time(world: &World) -> Duration {
        world.play_time
    }

    /// Immutable representation of the player used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Location the player occupies.
        pub position: Position,
        /// Current hit points.
        pub hp: u32,
        /// Maximum hit points.
        pub max_hp: u32,
        /// Current weapon level.
        pub weapon_level: u32,
        /// Remaining shield time, if a shield is active.
        pub shield: Option<Duration>,
        /// Remaining speed-boost time, if active.
        pub speed_boost: Option<Duration>,
        /// Remaining multishot time, if active.
        pub multishot: Option<Duration>,
    }

    impl PlayerSnapshot {
        /// Reports whether the provided buff is currently active.
        #[must_use]
        pub const fn has_buff(&self, buff: Buff) -> bool {
            match buff {
                Buff::Shield => self.shield.is_some(),
                Buff::SpeedBoost => self.speed_boost.is_some(),
                Buff::Multishot => self.multishot.is_some(),
            }
        }
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            hp: world.player.hp,
            max_hp: world.player.max_hp,
            weapon_level: world.player.weapon_level,
            shield: world.player.shield,
            speed_boost: world.player.speed_boost,
            multishot: world.player.multishot,
        }
    }

    /// Immutable representation of a single enemy used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Unique identifier assigned to the enemy.
        pub id: EnemyId,
        /// Variant of the enemy.
        pub kind: EnemyKind,
        /// Hit points remaining.
        pub hp: u32,
        /// Damage dealt to the player on contact.
        pub collision_damage: u32,
        /// Location the enemy occupies.
        pub position: Position,
        /// Presentation scale applied to the enemy's base size.
        pub scale: f32,
    }

    /// Captures read-only snapshots of all living enemies, ordered by id.
    #[must_use]
    pub fn enemy_view(world: &World) -> Vec<EnemySnapshot> {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .filter(|enemy| enemy.alive)
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.behavior.kind(),
                hp: enemy.hp,
                collision_damage: enemy.collision_damage,
                position: enemy.position,
                scale: enemy.scale,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a single projectile used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Unique identifier assigned to the projectile.
        pub id: ProjectileId,
        /// Side that owns the projectile.
        pub side: ProjectileSide,
        /// Location the projectile occupies.
        pub position: Position,
        /// Damage carried by the projectile.
        pub damage: u32,
    }

    /// Captures read-only snapshots of all live projectiles, ordered by id.
    #[must_use]
    pub fn projectile_view(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                side: projectile.side,
                position: projectile.position,
                damage: projectile.damage,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a single item used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ItemSnapshot {
        /// Unique identifier assigned to the item.
        pub id: ItemId,
        /// Variant of the item.
        pub kind: ItemKind,
        /// Location the item occupies.
        pub position: Position,
    }

    /// Captures read-only snapshots of all uncollected items, ordered by id.
    #[must_use]
    pub fn item_view(world: &World) -> Vec<ItemSnapshot> {
        let mut snapshots: Vec<ItemSnapshot> = world
            .items
            .iter()
            .map(|item| ItemSnapshot {
                id: item.id,
                kind: item.kind,
                position: item.position,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Reports whether the enemy behaves as a boss. Test-support query.
    #[must_use]
    pub fn is_boss(world: &World, enemy: EnemyId) -> bool {
        world
            .enemies
            .iter()
            .any(|candidate| candidate.id == enemy && matches!(candidate.behavior, Behavior::Boss { .. }))
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Position,
    hp: u32,
    max_hp: u32,
    weapon_level: u32,
    weapon_damage: u32,
    weapon_level_cap: u32,
    projectile_speed: f32,
    shield: Option<Duration>,
    speed_boost: Option<Duration>,
    multishot: Option<Duration>,
}

impl Player {
    fn from_loadout(loadout: PlayerLoadout, arena: ArenaSize) -> Self {
        Self {
            position: Position::new(
                arena.width() / 2.0,
                (arena.height() - PLAYER_SPAWN_MARGIN).max(0.0),
            ),
            hp: loadout.max_hp,
            max_hp: loadout.max_hp,
            weapon_level: 1,
            weapon_damage: loadout.weapon_damage,
            weapon_level_cap: loadout.weapon_level_cap,
            projectile_speed: loadout.projectile_speed,
            shield: None,
            speed_boost: None,
            multishot: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    hp: u32,
    collision_damage: u32,
    score: u32,
    drop_rate: f64,
    position: Position,
    scale: f32,
    behavior: Behavior,
    alive: bool,
}

#[derive(Clone, Copy, Debug)]
enum Behavior {
    Normal,
    Shooter {
        bullet_damage: u32,
        bullet_speed: f32,
        delay: DelayRange,
        timer: TimerHandle,
    },
    Boss {
        radial_bullet_count: u32,
        bullet_speed: f32,
        bullet_damage: u32,
        missile_damage: u32,
        missile_speed: f32,
        timer: TimerHandle,
    },
}

impl Behavior {
    const fn kind(&self) -> EnemyKind {
        match self {
            Behavior::Normal => EnemyKind::Normal,
            Behavior::Shooter { .. } => EnemyKind::Shooter,
            Behavior::Boss { .. } => EnemyKind::Boss,
        }
    }

    const fn timer(&self) -> Option<TimerHandle> {
        match self {
            Behavior::Normal => None,
            Behavior::Shooter { timer, .. } | Behavior::Boss { timer, .. } => Some(*timer),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Homing {
    speed: f32,
    steer_accumulator: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    side: ProjectileSide,
    position: Position,
    velocity: Velocity,
    damage: u32,
    ttl: Duration,
    homing: Option<Homing>,
}

#[derive(Clone, Copy, Debug)]
struct Item {
    id: ItemId,
    kind: ItemKind,
    magnitude: u32,
    duration: Option<Duration>,
    position: Position,
    ttl: Duration,
}
