//! Wave/spawn director
//!
//! Watches the living enemy count. When a wave is wiped out it waits out a
//! grace delay, then orders the next, larger wave spread over the spawn
//! points.

use serde::{Deserialize, Serialize};
use strafe_ai::EnemyKind;
use strafe_core::Countdown;
use strafe_math::{consts::TAU, Vec3};

/// Wave tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies in wave 1
    pub base_enemies: u32,
    /// Extra enemies per wave
    pub per_wave: u32,
    /// Every `step_every` waves, add `step_bonus` more
    pub step_every: u32,
    pub step_bonus: u32,
    /// Hard cap on enemies per wave
    pub max_enemies: u32,
    /// Delay before the first wave
    pub initial_delay: f32,
    /// Delay between clearing a wave and spawning the next
    pub grace_delay: f32,
    /// Spawn points closer than this to the player are skipped
    pub min_spawn_distance: f32,
    pub spawn_points: Vec<Vec3>,
    /// Clearing this wave wins the session; None plays forever
    pub max_waves: Option<u32>,

    /// First wave that fields soldiers
    pub soldiers_from_wave: u32,
    /// First wave that fields a sniper
    pub snipers_from_wave: u32,
    /// A heavy joins every n-th wave (0 disables)
    pub heavy_every: u32,
    /// A boss joins every n-th wave (0 disables)
    pub boss_every: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemies: 4,
            per_wave: 1,
            step_every: 5,
            step_bonus: 2,
            max_enemies: 24,
            initial_delay: 0.0,
            grace_delay: 3.0,
            min_spawn_distance: 8.0,
            spawn_points: Self::ring(8, 20.0),
            max_waves: None,
            soldiers_from_wave: 3,
            snipers_from_wave: 6,
            heavy_every: 4,
            boss_every: 10,
        }
    }
}

impl WaveConfig {
    /// `count` spawn points evenly spaced on a ground circle around the origin
    pub fn ring(count: usize, radius: f32) -> Vec<Vec3> {
        (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
            })
            .collect()
    }

    pub fn with_spawn_points(mut self, points: Vec<Vec3>) -> Self {
        self.spawn_points = points;
        self
    }

    pub fn with_max_waves(mut self, max_waves: u32) -> Self {
        self.max_waves = Some(max_waves);
        self
    }

    pub fn with_grace_delay(mut self, delay: f32) -> Self {
        self.grace_delay = delay;
        self
    }

    /// Enemy count for wave `wave` (1-based). Never decreases as waves go up.
    pub fn enemies_for_wave(&self, wave: u32) -> u32 {
        if wave == 0 {
            return 0;
        }
        let n = wave - 1;
        let steps = if self.step_every > 0 { n / self.step_every } else { 0 };
        self.base_enemies
            .saturating_add(self.per_wave.saturating_mul(n))
            .saturating_add(self.step_bonus.saturating_mul(steps))
            .min(self.max_enemies)
    }

    /// Archetypes fielded in `wave`, strongest first
    pub fn composition(&self, wave: u32) -> Vec<EnemyKind> {
        let total = self.enemies_for_wave(wave) as usize;
        let mut kinds = Vec::with_capacity(total);

        let every = |n: u32| n > 0 && wave % n == 0;
        if every(self.boss_every) {
            kinds.push(EnemyKind::Boss);
        }
        if every(self.heavy_every) {
            kinds.push(EnemyKind::Heavy);
        }
        if wave >= self.snipers_from_wave {
            kinds.push(EnemyKind::Sniper);
        }
        kinds.truncate(total);

        let remaining = total - kinds.len();
        let soldiers = if wave >= self.soldiers_from_wave { remaining / 2 } else { 0 };
        kinds.extend(std::iter::repeat(EnemyKind::Soldier).take(soldiers));
        kinds.extend(std::iter::repeat(EnemyKind::Grunt).take(remaining - soldiers));
        kinds
    }
}

/// One enemy the simulation should spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub position: Vec3,
}

/// Director progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Counting down to the next wave
    Intermission,
    /// A wave is alive
    Active,
    /// The last configured wave was cleared
    Complete,
}

/// What the director decided this tick
#[derive(Debug, Clone, PartialEq)]
pub enum WaveEvent {
    Started { wave: u32, spawns: Vec<SpawnOrder> },
    Cleared { wave: u32 },
    /// The final wave was cleared
    Victory { waves: u32 },
}

/// Escalating wave spawner
#[derive(Debug, Clone)]
pub struct WaveDirector {
    config: WaveConfig,
    wave: u32,
    phase: WavePhase,
    grace: Countdown,
    next_spawn_point: usize,
}

impl WaveDirector {
    pub fn new(config: WaveConfig) -> Self {
        let grace = Countdown::started(config.initial_delay);
        Self {
            config,
            wave: 0,
            phase: WavePhase::Intermission,
            grace,
            next_spawn_point: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Current wave, 0 before the first
    #[inline]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    #[inline]
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == WavePhase::Complete
    }

    /// Seconds until the next wave while in intermission
    pub fn time_until_next_wave(&self) -> Option<f32> {
        match self.phase {
            WavePhase::Intermission => Some(self.grace.remaining()),
            _ => None,
        }
    }

    /// Back to before wave 1
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Advance one tick, given how many enemies are alive after this tick's
    /// sweep and where the player stands.
    pub fn update(&mut self, dt: f32, alive_enemies: usize, player_position: Vec3) -> Vec<WaveEvent> {
        let mut events = Vec::new();

        if self.phase == WavePhase::Active && alive_enemies == 0 {
            log::info!("Wave {} cleared", self.wave);
            events.push(WaveEvent::Cleared { wave: self.wave });

            if self.config.max_waves.is_some_and(|max| self.wave >= max) {
                self.phase = WavePhase::Complete;
                events.push(WaveEvent::Victory { waves: self.wave });
                return events;
            }
            self.phase = WavePhase::Intermission;
            self.grace.start_with(self.config.grace_delay);
            // The tick that clears a wave does not also count toward the grace delay
            if self.config.grace_delay > 0.0 {
                return events;
            }
        }

        if self.phase == WavePhase::Intermission {
            self.grace.tick(dt);
            if self.grace.is_finished() {
                events.push(self.start_next_wave(player_position));
            }
        }
        events
    }

    fn start_next_wave(&mut self, player_position: Vec3) -> WaveEvent {
        self.wave += 1;
        self.phase = WavePhase::Active;

        let kinds = self.config.composition(self.wave);
        let spawns: Vec<SpawnOrder> = kinds
            .into_iter()
            .filter_map(|kind| {
                self.pick_spawn_point(player_position)
                    .map(|position| SpawnOrder { kind, position })
            })
            .collect();

        log::info!("Wave {} started with {} enemies", self.wave, spawns.len());
        WaveEvent::Started {
            wave: self.wave,
            spawns,
        }
    }

    /// Next spawn point in round-robin order that is far enough from the
    /// player, or the farthest point when none is.
    pub fn pick_spawn_point(&mut self, player_position: Vec3) -> Option<Vec3> {
        let points = &self.config.spawn_points;
        if points.is_empty() {
            log::warn!("Wave director has no spawn points");
            return None;
        }

        let count = points.len();
        let min_distance = self.config.min_spawn_distance;
        let chosen = (0..count)
            .map(|offset| (self.next_spawn_point + offset) % count)
            .find(|&i| points[i].distance_xz(player_position) >= min_distance)
            .unwrap_or_else(|| {
                let mut farthest = 0;
                for i in 1..count {
                    if points[i].distance_xz(player_position) > points[farthest].distance_xz(player_position) {
                        farthest = i;
                    }
                }
                farthest
            });

        self.next_spawn_point = (chosen + 1) % count;
        Some(points[chosen])
    }
}
