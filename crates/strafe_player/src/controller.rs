//! First-person player controller
//!
//! Look, ground movement with sprint/crouch modifiers, jumping and gravity.
//! The player's position is the feet position; the camera sits at eye height
//! above it.

use crate::input::{Action, InputSource};
use serde::{Deserialize, Serialize};
use strafe_combat::{DamageOutcome, Health, HitTarget};
use strafe_core::{EntityHeader, EntityId, EntityKind};
use strafe_math::{radians, wrap_angle, Sphere, Transform, Vec2, Vec3};
use strafe_physics::{slide_move, SpatialQuery};

/// Height above the floor at which a grounded player counts as having walked off a ledge
const LEDGE_TOLERANCE: f32 = 0.05;

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub max_health: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    /// Upward velocity applied on jump
    pub jump_force: f32,
    pub gravity: f32,
    pub eye_height: f32,
    pub crouch_eye_height: f32,
    /// Degrees per unit of look delta
    pub mouse_sensitivity: f32,
    /// Pitch limit, degrees
    pub max_pitch: f32,
    pub body_radius: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            walk_speed: 5.0,
            sprint_speed: 8.0,
            crouch_speed: 2.5,
            jump_force: 8.0,
            gravity: 20.0,
            eye_height: 1.8,
            crouch_eye_height: 1.2,
            mouse_sensitivity: 0.1,
            max_pitch: 89.0,
            body_radius: 0.4,
        }
    }
}

impl PlayerStats {
    pub fn with_speed(mut self, walk: f32, sprint: f32) -> Self {
        self.walk_speed = walk;
        self.sprint_speed = sprint;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }
}

/// What the controller did this tick, consumed by weapon spread
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementReport {
    /// Horizontal movement was requested
    pub moving: bool,
    pub jumped: bool,
    pub landed: bool,
    /// Not grounded at the end of the tick
    pub airborne: bool,
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    header: EntityHeader,
    stats: PlayerStats,
    health: Health,
    velocity: Vec3,
    grounded: bool,
    crouching: bool,
    sprinting: bool,
}

impl Player {
    /// Create a player standing at `position` (feet)
    pub fn new(id: EntityId, stats: PlayerStats, position: Vec3) -> Self {
        Self {
            header: EntityHeader::new(id, EntityKind::Player, Transform::from_position(position)),
            health: Health::new(stats.max_health),
            stats,
            velocity: Vec3::ZERO,
            grounded: true,
            crouching: false,
            sprinting: false,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.header.id()
    }

    #[inline]
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.header.transform
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.header.transform.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.header.transform.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.header.transform.pitch
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    #[inline]
    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    #[inline]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn eye_height(&self) -> f32 {
        if self.crouching {
            self.stats.crouch_eye_height
        } else {
            self.stats.eye_height
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, self.eye_height(), 0.0)
    }

    /// Camera transform at eye height
    pub fn camera(&self) -> Transform {
        Transform {
            position: self.eye_position(),
            ..self.header.transform
        }
    }

    /// Unit view direction
    pub fn aim_direction(&self) -> Vec3 {
        self.header.transform.forward()
    }

    /// Body and head volumes for combat resolution
    pub fn hit_target(&self) -> HitTarget {
        let half = self.eye_height() * 0.5;
        let body = Sphere::new(self.position() + Vec3::new(0.0, half, 0.0), half.max(self.stats.body_radius));
        HitTarget::new(self.id(), EntityKind::Player, body)
            .with_head(Sphere::new(self.eye_position(), 0.2))
    }

    /// Apply a look delta. Pitch is clamped so the view never flips.
    pub fn look(&mut self, delta: Vec2) {
        let sensitivity = self.stats.mouse_sensitivity;
        let limit = radians(self.stats.max_pitch);
        let transform = &mut self.header.transform;
        transform.yaw = wrap_angle(transform.yaw - radians(delta.x * sensitivity));
        transform.pitch = (transform.pitch + radians(delta.y * sensitivity)).clamp(-limit, limit);
    }

    /// Advance one tick.
    ///
    /// `movement_multiplier` scales ground speed (the held weapon's handling).
    /// A dead player does not move.
    pub fn update(
        &mut self,
        dt: f32,
        input: &dyn InputSource,
        world: &dyn SpatialQuery,
        movement_multiplier: f32,
    ) -> MovementReport {
        let mut report = MovementReport::default();
        if !self.is_alive() {
            return report;
        }

        self.look(input.look_delta());

        self.crouching = input.held(Action::Crouch);
        let axis = input.move_axis();
        self.sprinting = input.held(Action::Sprint) && !self.crouching && axis.y > 0.0;

        let transform = self.header.transform;
        let direction = (transform.forward_flat() * axis.y + transform.right() * axis.x).normalize_or_zero();
        report.moving = direction != Vec3::ZERO;

        let base_speed = if self.crouching {
            self.stats.crouch_speed
        } else if self.sprinting {
            self.stats.sprint_speed
        } else {
            self.stats.walk_speed
        };
        let speed = base_speed * movement_multiplier.max(0.0);

        if input.pressed(Action::Jump) && self.grounded && !self.crouching {
            self.velocity.y = self.stats.jump_force;
            self.grounded = false;
            report.jumped = true;
        }
        if !self.grounded {
            self.velocity.y -= self.stats.gravity * dt;
        }

        let from = self.position();
        let mut to = from + direction * (speed * dt);
        to.y = from.y + self.velocity.y * dt;
        let mut position = slide_move(world, from, to, self.stats.body_radius);

        let floor = world.floor_height(position);
        if self.grounded {
            if position.y - floor > LEDGE_TOLERANCE {
                // Walked off a ledge
                self.grounded = false;
            } else {
                position.y = floor;
            }
        } else if position.y <= floor && self.velocity.y <= 0.0 {
            position.y = floor;
            self.velocity.y = 0.0;
            self.grounded = true;
            report.landed = true;
        }

        self.header.transform.position = position;
        report.airborne = !self.grounded;
        report
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        if outcome.killed {
            log::info!("Player {} died", self.id());
        }
        outcome
    }

    /// Heal, returning the amount actually restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health.heal(amount)
    }

    /// Restore full health at `position`. The outer loop decides when.
    pub fn respawn(&mut self, position: Vec3) {
        self.health.restore();
        self.velocity = Vec3::ZERO;
        self.grounded = true;
        self.crouching = false;
        self.sprinting = false;
        self.header.transform.position = position;
        self.header.transform.pitch = 0.0;
        log::info!("Player {} respawned at {:?}", self.id(), position);
    }

    /// Teleport without touching health or velocity
    pub fn set_position(&mut self, position: Vec3) {
        self.header.transform.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use approx::assert_relative_eq;
    use strafe_math::AABB;
    use strafe_physics::{LevelGeometry, OpenField};

    fn player() -> Player {
        Player::new(EntityId::from_raw(1), PlayerStats::default(), Vec3::ZERO)
    }

    #[test]
    fn test_pitch_clamped() {
        let mut p = player();
        p.look(Vec2::new(0.0, 10_000.0));
        assert_relative_eq!(p.pitch(), radians(89.0), epsilon = 1e-5);
        p.look(Vec2::new(0.0, -100_000.0));
        assert_relative_eq!(p.pitch(), radians(-89.0), epsilon = 1e-5);
    }

    #[test]
    fn test_look_right_turns_towards_positive_x() {
        let mut p = player();
        // 900 units at 0.1 deg per unit = 90 degrees
        p.look(Vec2::new(900.0, 0.0));
        let forward = p.aim_direction();
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_walk_and_sprint_speeds() {
        let world = OpenField::default();
        let mut input = InputState::new();
        input.press(Action::MoveForward);

        let mut p = player();
        let report = p.update(1.0, &input, &world, 1.0);
        assert!(report.moving);
        assert_relative_eq!(p.position().z, -5.0, epsilon = 1e-4);

        input.press(Action::Sprint);
        let mut p = player();
        p.update(1.0, &input, &world, 1.0);
        assert!(p.is_sprinting());
        assert_relative_eq!(p.position().z, -8.0, epsilon = 1e-4);

        // Weapon handling slows movement
        let mut p = player();
        input.release(Action::Sprint);
        p.update(1.0, &input, &world, 0.5);
        assert_relative_eq!(p.position().z, -2.5, epsilon = 1e-4);
    }

    #[test]
    fn test_diagonal_is_normalized_and_ignores_pitch() {
        let world = OpenField::default();
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::MoveRight);

        let mut p = player();
        p.look(Vec2::new(0.0, 600.0));
        p.update(1.0, &input, &world, 1.0);
        assert_relative_eq!(p.position().distance_xz(Vec3::ZERO), 5.0, epsilon = 1e-4);
        assert_eq!(p.position().y, 0.0);
    }

    #[test]
    fn test_crouch_slows_and_lowers_eye() {
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::Crouch);
        input.press(Action::Sprint);

        let mut p = player();
        p.update(1.0, &input, &OpenField::default(), 1.0);
        assert!(p.is_crouching());
        assert!(!p.is_sprinting());
        assert_relative_eq!(p.position().z, -2.5, epsilon = 1e-4);
        assert_relative_eq!(p.eye_position().y, 1.2);
    }

    #[test]
    fn test_jump_and_land() {
        let world = OpenField::default();
        let mut input = InputState::new();
        input.press(Action::Jump);

        let mut p = player();
        let report = p.update(0.05, &input, &world, 1.0);
        assert!(report.jumped);
        assert!(!p.is_grounded());
        assert!(p.position().y > 0.0);

        // Holding jump does not re-trigger mid-air
        input.end_frame();
        let mut landed = false;
        for _ in 0..40 {
            let report = p.update(0.05, &input, &world, 1.0);
            assert!(!report.jumped);
            if report.landed {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(p.is_grounded());
        assert_eq!(p.position().y, 0.0);
        assert_eq!(p.velocity().y, 0.0);
    }

    #[test]
    fn test_walls_block_per_axis() {
        let level = LevelGeometry::arena(20.0)
            .with_collider(AABB::new(Vec3::new(-15.0, 0.0, -3.0), Vec3::new(15.0, 3.0, -2.0)));
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::MoveRight);

        let mut p = player();
        for _ in 0..20 {
            p.update(0.1, &input, &level, 1.0);
        }
        // Stopped in front of the wall but kept sliding sideways
        assert!(p.position().z > -2.0);
        assert!(p.position().x > 3.0);
    }

    #[test]
    fn test_walking_off_a_ledge() {
        let level = LevelGeometry::arena(20.0)
            .with_collider(AABB::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 1.0, 2.0)));
        let mut p = Player::new(EntityId::from_raw(1), PlayerStats::default(), Vec3::new(0.0, 1.0, 0.0));
        let mut input = InputState::new();
        input.press(Action::MoveRight);

        let mut left_ground = false;
        for _ in 0..30 {
            let report = p.update(0.05, &input, &level, 1.0);
            if report.airborne {
                left_ground = true;
            }
            if report.landed {
                break;
            }
        }
        assert!(left_ground);
        assert!(p.is_grounded());
        assert_eq!(p.position().y, 0.0);
    }

    #[test]
    fn test_health_clamp_and_death() {
        let mut p = player();
        assert_eq!(p.heal(50.0), 0.0);
        let outcome = p.take_damage(250.0);
        assert!(outcome.killed);
        assert_eq!(p.health().current(), 0.0);
        assert!(!p.is_alive());

        // The dead stay put
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        p.update(1.0, &input, &OpenField::default(), 1.0);
        assert_eq!(p.position(), Vec3::ZERO);

        p.respawn(Vec3::new(1.0, 0.0, 1.0));
        assert!(p.is_alive());
        assert!(p.health().is_full());
    }
}
