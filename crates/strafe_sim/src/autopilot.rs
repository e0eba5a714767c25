//! Scripted player for headless runs
//!
//! Produces an [`InputState`] each tick: turn toward the closest living
//! enemy, fire once the crosshair is close enough, and strafe side to side
//! while engaged.

use strafe_math::{degrees, wrap_angle, Transform, Vec2};
use strafe_physics::SpatialQuery;
use strafe_player::{Action, InputState};

use crate::world::Simulation;

/// Bot input generator
#[derive(Debug, Clone)]
pub struct Autopilot {
    input: InputState,
    /// Largest turn per tick, degrees
    pub max_turn: f32,
    /// Fire when the aim error is below this, degrees
    pub fire_cone: f32,
    /// Seconds between strafe direction changes; 0 disables strafing
    pub strafe_period: f32,
    strafe_timer: f32,
    strafe_left: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            input: InputState::new(),
            max_turn: 12.0,
            fire_cone: 3.0,
            strafe_period: 1.5,
            strafe_timer: 0.0,
            strafe_left: false,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strafe_period(mut self, seconds: f32) -> Self {
        self.strafe_period = seconds.max(0.0);
        self
    }

    /// Decide this tick's input from the current simulation state
    pub fn next(&mut self, sim: &Simulation, dt: f32) -> &InputState {
        self.input.end_frame();

        let player = sim.player();
        let target = if player.is_alive() {
            sim.enemies().closest(player.position())
        } else {
            None
        };

        let Some(enemy) = target else {
            for action in [Action::Fire, Action::MoveLeft, Action::MoveRight] {
                self.input.release(action);
            }
            return &self.input;
        };

        // Aim at the body center
        let eye = player.eye_position();
        let aim_point = enemy.hit_target().body.center;
        let to_target = aim_point - eye;
        let flat = to_target.flatten().length();

        let desired_yaw = Transform::yaw_towards(to_target).unwrap_or(player.yaw());
        let desired_pitch = to_target.y.atan2(flat);
        let yaw_error = degrees(wrap_angle(desired_yaw - player.yaw()));
        let pitch_error = degrees(desired_pitch - player.pitch());

        let sensitivity = player.stats().mouse_sensitivity;
        if sensitivity > 0.0 {
            let turn_x = (-yaw_error).clamp(-self.max_turn, self.max_turn);
            let turn_y = pitch_error.clamp(-self.max_turn, self.max_turn);
            self.input
                .set_look_delta(Vec2::new(turn_x / sensitivity, turn_y / sensitivity));
        }

        let aligned = yaw_error.abs() < self.fire_cone && pitch_error.abs() < self.fire_cone;
        let visible = sim.level().line_of_sight(eye, aim_point);
        self.input.set_held(Action::Fire, aligned && visible);

        if self.strafe_period > 0.0 {
            self.strafe_timer -= dt;
            if self.strafe_timer <= 0.0 {
                self.strafe_timer += self.strafe_period;
                self.strafe_left = !self.strafe_left;
            }
            self.input.set_held(Action::MoveLeft, self.strafe_left);
            self.input.set_held(Action::MoveRight, !self.strafe_left);
        }

        &self.input
    }

    /// Input produced by the last [`next`](Self::next) call
    pub fn input(&self) -> &InputState {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use strafe_ai::EnemyKind;
    use strafe_gamestate::WaveConfig;
    use strafe_math::Vec3;
    use strafe_player::InputSource;

    fn sim_with_enemy(at: Vec3) -> Simulation {
        let config = SimConfig::default().with_waves(WaveConfig {
            initial_delay: 1000.0,
            ..WaveConfig::default()
        });
        let mut sim = Simulation::new(config);
        sim.start();
        sim.spawn_enemy(EnemyKind::Grunt, at);
        sim
    }

    #[test]
    fn test_idle_without_enemies() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.start();
        let mut pilot = Autopilot::new();
        let input = pilot.next(&sim, 0.125);
        assert!(!input.held(Action::Fire));
        assert_eq!(input.look_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_turns_toward_enemy() {
        // Enemy directly to the right (+X); turning right means negative yaw
        let sim = sim_with_enemy(Vec3::new(15.0, 0.0, 0.0));
        let mut pilot = Autopilot::new();
        let input = pilot.next(&sim, 0.125);
        assert!(input.look_delta().x > 0.0);
        assert!(!input.held(Action::Fire));
    }

    #[test]
    fn test_fires_when_aligned() {
        // Straight ahead on -Z; only a small pitch correction is needed
        let sim = sim_with_enemy(Vec3::new(0.0, 0.0, -30.0));
        let mut pilot = Autopilot::new();
        let input = pilot.next(&sim, 0.125);
        assert!(input.held(Action::Fire));
        assert!(input.pressed(Action::Fire));
    }

    #[test]
    fn test_strafe_alternates() {
        let sim = sim_with_enemy(Vec3::new(0.0, 0.0, -30.0));
        let mut pilot = Autopilot::new().with_strafe_period(0.25);

        let first = pilot.next(&sim, 0.125).held(Action::MoveLeft);
        pilot.next(&sim, 0.125);
        let later = pilot.next(&sim, 0.125).held(Action::MoveLeft);
        assert_ne!(first, later);
    }
}
