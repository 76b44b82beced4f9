//! Collision detection and response
//!
//! The tricky part of a brick breaker: working out which surface and which
//! edge the ball struck from raw overlap, then producing a velocity that keeps
//! the speed invariant `|velocity| == base_speed * speed_multiplier` intact
//! across walls, paddle steering, bricks and compounding speed-ups.
//!
//! [`CollisionResolver`] is the only writer of the ball's velocity. Everything
//! else asks for transforms through its methods.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bricks::Brick;
use super::events::{CollisionEvent, WallSide};
use super::geometry::{Circle, Edge, Penetration, validate_radius};
use super::state::Paddle;
use crate::error::GeometryError;
use crate::tuning::Tuning;

/// Squared speeds below this are treated as a zero-length velocity
const DEGENERATE_SPEED_SQ: f32 = 1e-8;

/// The ball. Position is the circle center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec2,
    pub radius: f32,
    /// Current velocity (pixels/s)
    pub velocity: Vec2,
    /// Serve velocity without any multiplier applied
    pub base_velocity: Vec2,
    /// Cumulative speed multiplier (milestones and paddle boosts); survives
    /// serves, reset only on restart
    pub speed_multiplier: f32,
}

/// Something the ball can be in contact with across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColliderId {
    Paddle,
    Brick(u32),
}

/// Resolver parameters, taken from [`Tuning`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub viewport: Vec2,
    pub base_speed: f32,
    pub steer_factor: f32,
    pub momentum_transfer: f32,
    pub paddle_speed: f32,
    pub bounce_boost: f32,
    pub serve_position: Vec2,
    /// Serve cone in radians, measured from +x toward +y (down)
    pub serve_angle_min: f32,
    pub serve_angle_max: f32,
}

impl From<&Tuning> for ResolverConfig {
    fn from(t: &Tuning) -> Self {
        Self {
            viewport: Vec2::new(t.viewport_width, t.viewport_height),
            base_speed: t.ball_base_speed,
            steer_factor: t.paddle_steer_factor,
            momentum_transfer: t.paddle_momentum_transfer,
            paddle_speed: t.paddle_speed,
            bounce_boost: t.bounce_boost,
            serve_position: t.serve_position(),
            serve_angle_min: t.serve_angle_min_deg.to_radians(),
            serve_angle_max: t.serve_angle_max_deg.to_radians(),
        }
    }
}

/// Owns ball motion, contact debouncing and every velocity transform
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    ball: BallState,
    config: ResolverConfig,
    /// Colliders the ball overlapped at the end of the previous query
    active_contacts: BTreeSet<ColliderId>,
    rng: Pcg32,
}

impl CollisionResolver {
    /// Create a resolver with the ball parked at the serve position, heading
    /// straight down at base speed.
    pub fn new(tuning: &Tuning, seed: u64) -> Result<Self, GeometryError> {
        validate_radius("ball", tuning.ball_radius)?;
        if !(tuning.ball_base_speed > 0.0 && tuning.ball_base_speed.is_finite()) {
            return Err(GeometryError::InvalidSpeed {
                entity: "ball",
                speed: tuning.ball_base_speed,
            });
        }

        let config = ResolverConfig::from(tuning);
        let base_velocity = Vec2::new(0.0, config.base_speed);
        Ok(Self {
            ball: BallState {
                position: config.serve_position,
                radius: tuning.ball_radius,
                velocity: base_velocity,
                base_velocity,
                speed_multiplier: 1.0,
            },
            config,
            active_contacts: BTreeSet::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn ball(&self) -> &BallState {
        &self.ball
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.ball.speed_multiplier
    }

    /// Speed the ball should have under the current multiplier
    pub fn target_speed(&self) -> f32 {
        self.config.base_speed * self.ball.speed_multiplier
    }

    pub fn is_touching(&self, collider: ColliderId) -> bool {
        self.active_contacts.contains(&collider)
    }

    /// Place the ball directly (test setups and external scene construction)
    pub fn place_ball(&mut self, position: Vec2, velocity: Vec2) {
        self.ball.position = position;
        self.ball.velocity = velocity;
    }

    /// Integrate position over `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.ball.position += self.ball.velocity * dt;
        self.ball.position
    }

    /// Reflect off the left, right and top walls.
    ///
    /// The reflected axis is negated and the ball is pushed back inside the
    /// arena. A corner contact reflects both axes and reports the ceiling.
    pub fn resolve_wall_contact(&mut self) -> Option<CollisionEvent> {
        let r = self.ball.radius;
        let width = self.config.viewport.x;
        let ball = &mut self.ball;
        let mut side = None;

        if ball.position.x - r < 0.0 {
            ball.position.x = r;
            ball.velocity.x = -ball.velocity.x;
            side = Some(WallSide::Left);
        } else if ball.position.x + r > width {
            ball.position.x = width - r;
            ball.velocity.x = -ball.velocity.x;
            side = Some(WallSide::Right);
        }

        if ball.position.y - r < 0.0 {
            ball.position.y = r;
            ball.velocity.y = -ball.velocity.y;
            side = Some(WallSide::Ceiling);
        }

        if let Some(side) = side {
            log::debug!("Wall contact {:?} at {:?}", side, ball.position);
        }
        side.map(CollisionEvent::Wall)
    }

    /// True once the ball has fully dropped below the floor
    pub fn is_out_of_bounds(&self) -> bool {
        self.ball.position.y - self.ball.radius > self.config.viewport.y
    }

    /// Debounced paddle contact: bounces only on the not-touching to touching
    /// transition.
    pub fn resolve_paddle_contact(&mut self, paddle: &Paddle) -> Option<CollisionEvent> {
        let rect = paddle.rect();
        if !self.circle().overlaps(&rect) {
            self.active_contacts.remove(&ColliderId::Paddle);
            return None;
        }
        if !self.active_contacts.insert(ColliderId::Paddle) {
            return None;
        }
        Some(self.bounce_off_paddle(rect.center, rect.size(), paddle.velocity_x))
    }

    /// Steer the ball off the paddle by where it landed.
    ///
    /// The outgoing magnitude is exactly the incoming speed times the bounce
    /// boost, and the boost is folded into the speed multiplier.
    pub fn bounce_off_paddle(
        &mut self,
        paddle_center: Vec2,
        paddle_size: Vec2,
        paddle_velocity_x: f32,
    ) -> CollisionEvent {
        let half_width = (paddle_size.x / 2.0).max(f32::EPSILON);
        let offset = ((self.ball.position.x - paddle_center.x) / half_width).clamp(-1.0, 1.0);

        let nudge = if self.config.paddle_speed > 0.0 {
            self.config.momentum_transfer * paddle_velocity_x / self.config.paddle_speed
        } else {
            0.0
        };
        let steer = (offset + nudge).clamp(-1.0, 1.0);

        let speed = self.current_speed();
        let boost = self.config.bounce_boost;
        self.ball.velocity = paddle_bounce_velocity(speed, steer, self.config.steer_factor, boost);

        self.ball.speed_multiplier *= boost;

        log::debug!(
            "Paddle contact offset={:.3} steer={:.3} vel={:?}",
            offset,
            steer,
            self.ball.velocity
        );
        CollisionEvent::Paddle { offset }
    }

    /// Debounced brick contact against live bricks.
    ///
    /// At most one brick is resolved per call: of the bricks newly touched,
    /// the one whose center is nearest the ball (ties: lowest id, given bricks
    /// in id order). Other newly touched bricks stay out of the contact set so
    /// they are considered again next tick.
    pub fn resolve_brick_contacts<'a, I>(&mut self, bricks: I) -> Option<CollisionEvent>
    where
        I: IntoIterator<Item = &'a Brick>,
    {
        let circle = self.circle();
        let mut still_touching = Vec::new();
        let mut candidate: Option<(&Brick, f32)> = None;

        for brick in bricks.into_iter().filter(|b| b.alive) {
            if !circle.overlaps(&brick.rect) {
                continue;
            }
            let id = ColliderId::Brick(brick.id);
            if self.active_contacts.contains(&id) {
                still_touching.push(id);
                continue;
            }
            let dist = (brick.rect.center - circle.center).length_squared();
            if candidate.is_none_or(|(_, best)| dist < best) {
                candidate = Some((brick, dist));
            }
        }

        self.active_contacts
            .retain(|c| matches!(c, ColliderId::Paddle));
        self.active_contacts.extend(still_touching);

        let (brick, _) = candidate?;
        self.active_contacts.insert(ColliderId::Brick(brick.id));
        let edge = self.bounce_off_brick(brick.rect.center, brick.rect.size());
        log::debug!("Brick {} ({:?}) struck on {:?} edge", brick.id, brick.color, edge);
        Some(CollisionEvent::Brick {
            id: brick.id,
            color: brick.color,
            edge,
        })
    }

    /// Reflect off a brick edge picked by minimum penetration.
    ///
    /// Equal x and y penetration reflects the vertical component.
    pub fn bounce_off_brick(&mut self, brick_center: Vec2, brick_size: Vec2) -> Edge {
        let edge = Penetration::from_centers(
            self.ball.position,
            self.ball.radius,
            brick_center,
            brick_size,
        )
        .struck_edge();

        if edge.is_vertical_axis() {
            self.ball.velocity.y = -self.ball.velocity.y;
        } else {
            self.ball.velocity.x = -self.ball.velocity.x;
        }
        edge
    }

    /// Compound the speed multiplier, keeping the current direction
    pub fn apply_speed_multiplier(&mut self, factor: f32) {
        if !(factor >= 1.0 && factor.is_finite()) {
            log::warn!("Ignoring speed factor {factor}: multiplier never decreases");
            return;
        }
        let direction = self.direction();
        let previous = self.ball.speed_multiplier;
        self.ball.speed_multiplier = previous * factor;
        self.ball.velocity = direction * self.target_speed();
        log::info!(
            "Speed multiplier {:.3} -> {:.3}",
            previous,
            self.ball.speed_multiplier
        );
    }

    /// Move the ball to the serve position and draw a new downward direction
    /// from the serve cone. Without `preserve_multiplier` the multiplier
    /// returns to 1.0 (full restart only).
    pub fn reset_for_serve(&mut self, preserve_multiplier: bool) {
        if !preserve_multiplier {
            self.ball.speed_multiplier = 1.0;
        }

        let (lo, hi) = (
            self.config.serve_angle_min.min(self.config.serve_angle_max),
            self.config.serve_angle_min.max(self.config.serve_angle_max),
        );
        let angle = self.rng.random_range(lo..=hi);
        let direction = Vec2::new(angle.cos(), angle.sin());

        self.ball.base_velocity = direction * self.config.base_speed;
        self.ball.velocity = self.ball.base_velocity * self.ball.speed_multiplier;
        self.ball.position = self.config.serve_position;
        self.active_contacts.clear();

        log::info!(
            "Serve at {:.1} deg, speed {:.1} (x{:.3})",
            angle.to_degrees(),
            self.target_speed(),
            self.ball.speed_multiplier
        );
    }

    fn circle(&self) -> Circle {
        Circle {
            center: self.ball.position,
            radius: self.ball.radius,
        }
    }

    /// Unit direction of travel, falling back to the base direction when the
    /// velocity has collapsed to zero
    fn direction(&self) -> Vec2 {
        let v = self.ball.velocity;
        if v.length_squared() > DEGENERATE_SPEED_SQ && v.is_finite() {
            v.normalize()
        } else {
            log::warn!("Degenerate ball velocity {v:?}, using base direction");
            self.ball.base_velocity.normalize_or(Vec2::Y)
        }
    }

    /// Current speed, or the target speed when the velocity is degenerate
    fn current_speed(&self) -> f32 {
        let v = self.ball.velocity;
        if v.length_squared() > DEGENERATE_SPEED_SQ && v.is_finite() {
            v.length()
        } else {
            log::warn!("Degenerate ball velocity {v:?}, using target speed");
            self.target_speed()
        }
    }
}

/// Outgoing paddle velocity for a given speed and steer offset in [-1, 1].
///
/// Horizontal share is `speed * steer_factor * steer`; the vertical share
/// makes up the rest of the magnitude and always points up. The result is
/// re-normalized so `|v| == speed * boost` for every offset.
pub fn paddle_bounce_velocity(speed: f32, steer: f32, steer_factor: f32, boost: f32) -> Vec2 {
    let horizontal = speed * steer_factor * steer.clamp(-1.0, 1.0);
    let vertical = (speed * speed - horizontal * horizontal).max(0.0).sqrt();
    let direction = Vec2::new(horizontal, -vertical);
    let len = direction.length();
    if len <= f32::EPSILON {
        return Vec2::new(0.0, -speed * boost);
    }
    direction * (speed * boost / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::BrickColor;
    use crate::sim::geometry::Rect;
    use proptest::prelude::*;

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(&Tuning::default(), 7).unwrap()
    }

    fn brick(id: u32, center: Vec2) -> Brick {
        Brick {
            id,
            row: 0,
            col: id,
            rect: Rect::new("brick", center, Vec2::new(40.0, 20.0)).unwrap(),
            color: BrickColor::Yellow,
            alive: true,
        }
    }

    #[test]
    fn test_new_rejects_invalid_ball() {
        let tuning = Tuning {
            ball_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            CollisionResolver::new(&tuning, 1),
            Err(GeometryError::InvalidRadius { entity: "ball", .. })
        ));

        let tuning = Tuning {
            ball_base_speed: -5.0,
            ..Default::default()
        };
        assert!(CollisionResolver::new(&tuning, 1).is_err());
    }

    #[test]
    fn test_advance_integrates_position() {
        let mut r = resolver();
        r.place_ball(Vec2::new(100.0, 100.0), Vec2::new(60.0, -30.0));
        let pos = r.advance(0.5);
        assert_eq!(pos, Vec2::new(130.0, 85.0));
    }

    #[test]
    fn test_wall_reflects_x_only() {
        let tuning = Tuning {
            ball_radius: 10.0,
            ..Default::default()
        };
        let mut r = CollisionResolver::new(&tuning, 1).unwrap();
        r.place_ball(Vec2::new(-1.0, 300.0), Vec2::new(100.0, 50.0));

        let event = r.resolve_wall_contact();
        assert_eq!(event, Some(CollisionEvent::Wall(WallSide::Left)));
        assert_eq!(r.ball().velocity, Vec2::new(-100.0, 50.0));
        assert_eq!(r.ball().position.x, 10.0);
    }

    #[test]
    fn test_wall_right_and_ceiling() {
        let mut r = resolver();
        r.place_ball(Vec2::new(795.0, 300.0), Vec2::new(100.0, 50.0));
        assert_eq!(r.resolve_wall_contact(), Some(CollisionEvent::Wall(WallSide::Right)));
        assert_eq!(r.ball().velocity, Vec2::new(-100.0, 50.0));

        r.place_ball(Vec2::new(400.0, 3.0), Vec2::new(20.0, -80.0));
        assert_eq!(r.resolve_wall_contact(), Some(CollisionEvent::Wall(WallSide::Ceiling)));
        assert_eq!(r.ball().velocity, Vec2::new(20.0, 80.0));
    }

    #[test]
    fn test_wall_no_contact_inside_arena() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 300.0), Vec2::new(100.0, 50.0));
        assert_eq!(r.resolve_wall_contact(), None);
        assert_eq!(r.ball().velocity, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_floor_is_not_a_wall() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 615.0), Vec2::new(0.0, 100.0));
        assert_eq!(r.resolve_wall_contact(), None);
        assert!(r.is_out_of_bounds());
    }

    #[test]
    fn test_center_paddle_hit_is_vertical() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 555.0), Vec2::new(0.0, 300.0));
        let event = r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 0.0);
        assert_eq!(event, CollisionEvent::Paddle { offset: 0.0 });
        let v = r.ball().velocity;
        assert!(v.x.abs() < 1e-4);
        assert!(v.y < 0.0);
        assert!((v.length() - 330.0).abs() < 1e-3);
        assert!((r.speed_multiplier() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_edge_paddle_hit_steers() {
        let mut r = resolver();
        r.place_ball(Vec2::new(460.0, 555.0), Vec2::new(0.0, 300.0));
        let event = r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 0.0);
        assert_eq!(event, CollisionEvent::Paddle { offset: 1.0 });
        let v = r.ball().velocity;
        // Horizontal share is steer factor * speed, scaled by the boost
        assert!((v.x - 300.0 * 0.6 * 1.1).abs() < 1e-3);
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_paddle_momentum_nudges_steer() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 555.0), Vec2::new(0.0, 300.0));
        r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 500.0);
        let v = r.ball().velocity;
        assert!(v.x > 0.0);
        assert!((v.length() - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_contact_is_debounced() {
        let mut r = resolver();
        let paddle = Paddle::new(&Tuning::default()).unwrap();
        let top = paddle.rect().top();
        let x = paddle.rect().center.x;

        r.place_ball(Vec2::new(x, top - 4.0), Vec2::new(0.0, 300.0));
        assert!(r.resolve_paddle_contact(&paddle).is_some());
        let after_first = r.ball().velocity;

        // Still overlapping on the next query: no second bounce
        assert!(r.resolve_paddle_contact(&paddle).is_none());
        assert_eq!(r.ball().velocity, after_first);
        assert!(r.is_touching(ColliderId::Paddle));

        // Leave and come back: bounces again
        r.place_ball(Vec2::new(x, top - 50.0), Vec2::new(0.0, 300.0));
        assert!(r.resolve_paddle_contact(&paddle).is_none());
        assert!(!r.is_touching(ColliderId::Paddle));
        r.place_ball(Vec2::new(x, top - 4.0), Vec2::new(0.0, 300.0));
        assert!(r.resolve_paddle_contact(&paddle).is_some());
    }

    #[test]
    fn test_repeated_paddle_bounces_compound_boost() {
        let mut r = resolver();
        let paddle_center = Vec2::new(400.0, 568.0);
        let paddle_size = Vec2::new(100.0, 16.0);
        let mut expected_multiplier = 1.0f32;

        // Alternate edge and center hits so the steer path is exercised too
        for bounce in 0..10 {
            let pre = r.target_speed();
            let x = if bounce % 2 == 0 { 445.0 } else { 400.0 };
            r.place_ball(Vec2::new(x, 555.0), Vec2::new(0.0, pre));
            r.bounce_off_paddle(paddle_center, paddle_size, 0.0);

            let post = r.ball().velocity.length();
            assert!(
                (post - pre * 1.1).abs() <= 1e-4 * pre,
                "bounce {bounce}: pre={pre} post={post}"
            );
            expected_multiplier *= 1.1;
            let multiplier = r.speed_multiplier();
            assert!((multiplier - expected_multiplier).abs() <= 1e-5 * expected_multiplier);
            assert!((post - r.target_speed()).abs() <= 1e-4 * post);
        }
    }

    #[test]
    fn test_speed_increase_applies_after_many_bounces() {
        let mut r = resolver();
        for _ in 0..20 {
            let speed = r.target_speed();
            r.place_ball(Vec2::new(400.0, 555.0), Vec2::new(0.0, speed));
            r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 0.0);
        }
        let before = r.speed_multiplier();
        let speed_before = r.ball().velocity.length();

        r.apply_speed_multiplier(1.15);

        assert!((r.speed_multiplier() - before * 1.15).abs() <= 1e-5 * before);
        let speed_after = r.ball().velocity.length();
        assert!((speed_after - speed_before * 1.15).abs() <= 1e-3 * speed_before);
    }

    #[test]
    fn test_apply_speed_multiplier_preserves_direction() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 300.0), Vec2::new(180.0, -240.0));
        r.apply_speed_multiplier(1.15);
        let v = r.ball().velocity;
        assert!((v.length() - 300.0 * 1.15).abs() < 1e-3);
        let dir = v.normalize();
        assert!((dir - Vec2::new(0.6, -0.8)).length() < 1e-5);
    }

    #[test]
    fn test_apply_speed_multiplier_ignores_shrinking_factor() {
        let mut r = resolver();
        r.apply_speed_multiplier(0.5);
        assert_eq!(r.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_degenerate_velocity_uses_base_direction() {
        let mut r = resolver();
        r.place_ball(Vec2::new(400.0, 300.0), Vec2::ZERO);
        r.apply_speed_multiplier(1.15);
        let v = r.ball().velocity;
        assert!(v.is_finite());
        // Base direction is straight down before any serve
        assert!((v - Vec2::new(0.0, 345.0)).length() < 1e-3);

        r.place_ball(Vec2::new(400.0, 555.0), Vec2::ZERO);
        r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 0.0);
        assert!(r.ball().velocity.is_finite());
        assert!(r.ball().velocity.y < 0.0);
    }

    #[test]
    fn test_reset_for_serve_cone_and_multiplier() {
        let mut r = resolver();
        r.apply_speed_multiplier(1.15);

        r.reset_for_serve(true);
        let v = r.ball().velocity;
        assert!(v.y > 0.0, "serve must head toward the paddle");
        let angle = v.y.atan2(v.x).to_degrees();
        assert!((60.0 - 1e-3..=120.0 + 1e-3).contains(&angle));
        assert!((v.length() - 345.0).abs() < 1e-3);
        assert_eq!(r.ball().position, Tuning::default().serve_position());

        r.reset_for_serve(false);
        assert_eq!(r.speed_multiplier(), 1.0);
        assert!((r.ball().velocity.length() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_serve_is_deterministic_per_seed() {
        let mut a = CollisionResolver::new(&Tuning::default(), 42).unwrap();
        let mut b = CollisionResolver::new(&Tuning::default(), 42).unwrap();
        for _ in 0..5 {
            a.reset_for_serve(true);
            b.reset_for_serve(true);
            assert_eq!(a.ball().velocity, b.ball().velocity);
        }
    }

    #[test]
    fn test_brick_top_contact_reflects_y() {
        let mut r = resolver();
        let b = brick(3, Vec2::new(100.0, 100.0));
        r.place_ball(Vec2::new(100.0, 84.0), Vec2::new(50.0, 200.0));
        let event = r.resolve_brick_contacts([&b]);
        assert_eq!(
            event,
            Some(CollisionEvent::Brick {
                id: 3,
                color: BrickColor::Yellow,
                edge: Edge::Top
            })
        );
        assert_eq!(r.ball().velocity, Vec2::new(50.0, -200.0));
    }

    #[test]
    fn test_brick_side_contact_reflects_x() {
        let mut r = resolver();
        let b = brick(1, Vec2::new(100.0, 100.0));
        r.place_ball(Vec2::new(73.0, 100.0), Vec2::new(200.0, 50.0));
        r.resolve_brick_contacts([&b]);
        assert_eq!(r.ball().velocity, Vec2::new(-200.0, 50.0));
    }

    #[test]
    fn test_brick_contact_is_debounced() {
        let mut r = resolver();
        let b = brick(1, Vec2::new(100.0, 100.0));
        r.place_ball(Vec2::new(100.0, 84.0), Vec2::new(0.0, 200.0));
        assert!(r.resolve_brick_contacts([&b]).is_some());
        assert!(r.resolve_brick_contacts([&b]).is_none());
        assert_eq!(r.ball().velocity, Vec2::new(0.0, -200.0));
    }

    #[test]
    fn test_one_brick_per_tick_nearest_wins() {
        let mut r = resolver();
        let left = brick(1, Vec2::new(100.0, 100.0));
        let right = brick(2, Vec2::new(142.0, 100.0));
        // Ball over the seam, slightly closer to the right brick
        r.place_ball(Vec2::new(122.0, 84.0), Vec2::new(0.0, 200.0));
        let event = r.resolve_brick_contacts([&left, &right]);
        assert!(matches!(event, Some(CollisionEvent::Brick { id: 2, .. })));
        assert!(r.is_touching(ColliderId::Brick(2)));
        assert!(!r.is_touching(ColliderId::Brick(1)));

        // The unresolved brick is picked up on the next query
        let event = r.resolve_brick_contacts([&left, &right]);
        assert!(matches!(event, Some(CollisionEvent::Brick { id: 1, .. })));
    }

    #[test]
    fn test_dead_bricks_are_ignored() {
        let mut r = resolver();
        let mut b = brick(1, Vec2::new(100.0, 100.0));
        b.alive = false;
        r.place_ball(Vec2::new(100.0, 84.0), Vec2::new(0.0, 200.0));
        assert!(r.resolve_brick_contacts([&b]).is_none());
    }

    proptest! {
        #[test]
        fn prop_paddle_bounce_preserves_boosted_magnitude(
            speed in 1.0f32..1000.0,
            steer in -1.0f32..=1.0,
        ) {
            let v = paddle_bounce_velocity(speed, steer, 0.6, 1.1);
            let expected = speed * 1.1;
            prop_assert!((v.length() - expected).abs() <= 1e-4 * expected.max(1.0));
            prop_assert!(v.y < 0.0);
        }

        #[test]
        fn prop_resolver_paddle_bounce_magnitude(
            offset_px in -50.0f32..=50.0,
            multiplier_steps in 0u32..4,
        ) {
            let mut r = resolver();
            for _ in 0..multiplier_steps {
                r.apply_speed_multiplier(1.15);
            }
            let speed = r.target_speed();
            r.place_ball(Vec2::new(400.0 + offset_px, 555.0), Vec2::new(0.0, speed));
            r.bounce_off_paddle(Vec2::new(400.0, 568.0), Vec2::new(100.0, 16.0), 0.0);
            let v = r.ball().velocity;
            prop_assert!((v.length() - speed * 1.1).abs() <= 1e-4 * speed);
            prop_assert!((v.length() - r.target_speed()).abs() <= 1e-4 * speed);
        }

        #[test]
        fn prop_brick_tie_always_vertical(
            quarter_px in 1u32..20,
            vx in -300.0f32..300.0,
            vy in -300.0f32..300.0,
        ) {
            // Ball center placed so x and y overlap are both `depth`
            let depth = quarter_px as f32 * 0.25;
            let half = Vec2::new(20.0, 10.0);
            let radius = 8.0;
            let center = Vec2::new(100.0, 100.0);
            let ball = center - half - Vec2::splat(radius) + Vec2::splat(depth);
            let p = Penetration::from_centers(ball, radius, center, half * 2.0);
            prop_assert_eq!(p.x_depth(), p.y_depth());

            let mut r = resolver();
            r.place_ball(ball, Vec2::new(vx, vy));
            let edge = r.bounce_off_brick(center, half * 2.0);
            prop_assert!(edge.is_vertical_axis());
            prop_assert_eq!(r.ball().velocity, Vec2::new(vx, -vy));
        }
    }
}
