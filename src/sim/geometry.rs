//! Axis-aligned overlap utilities
//!
//! Screen coordinates: x grows right, y grows down. Rectangles are stored by
//! center and half extents; circles by center and radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Rect {
    /// Build from center and full size, rejecting zero/negative sizes
    pub fn new(entity: &'static str, center: Vec2, size: Vec2) -> Result<Self, GeometryError> {
        validate_size(entity, size)?;
        Ok(Self {
            center,
            half_size: size / 2.0,
        })
    }

    /// Build from top-left corner and full size
    pub fn from_top_left(
        entity: &'static str,
        top_left: Vec2,
        size: Vec2,
    ) -> Result<Self, GeometryError> {
        Self::new(entity, top_left + size / 2.0, size)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_size * 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_size.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half_size.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_size.y
    }

    /// Closest point on (or in) the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.center - self.half_size, self.center + self.half_size)
    }
}

/// A circle, used for the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(entity: &'static str, center: Vec2, radius: f32) -> Result<Self, GeometryError> {
        validate_radius(entity, radius)?;
        Ok(Self { center, radius })
    }

    /// True if the circle touches or overlaps the rectangle
    pub fn overlaps(&self, rect: &Rect) -> bool {
        circle_rect_overlap(self.center, self.radius, rect)
    }
}

/// Reject zero, negative and non-finite sizes
pub fn validate_size(entity: &'static str, size: Vec2) -> Result<(), GeometryError> {
    if size.x > 0.0 && size.y > 0.0 && size.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidSize {
            entity,
            width: size.x,
            height: size.y,
        })
    }
}

/// Reject zero, negative and non-finite radii
pub fn validate_radius(entity: &'static str, radius: f32) -> Result<(), GeometryError> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidRadius { entity, radius })
    }
}

/// Circle/rectangle overlap via the closest point on the rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Rectangle edge struck by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// True for top/bottom, the edges that flip the vertical velocity
    #[inline]
    pub fn is_vertical_axis(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// How far the ball's bounding box has pushed past each edge of a rectangle.
///
/// Each depth is measured from the named edge inward; a value <= 0 means the
/// ball is clear of that edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Penetration {
    /// Depths from the center delta and the combined half extents
    pub fn from_centers(
        ball_center: Vec2,
        ball_radius: f32,
        rect_center: Vec2,
        rect_size: Vec2,
    ) -> Self {
        let delta = ball_center - rect_center;
        let extent = rect_size / 2.0 + Vec2::splat(ball_radius);
        Self {
            left: extent.x + delta.x,
            right: extent.x - delta.x,
            top: extent.y + delta.y,
            bottom: extent.y - delta.y,
        }
    }

    /// Smallest horizontal overlap
    #[inline]
    pub fn x_depth(&self) -> f32 {
        self.left.min(self.right)
    }

    /// Smallest vertical overlap
    #[inline]
    pub fn y_depth(&self) -> f32 {
        self.top.min(self.bottom)
    }

    /// The edge with the smallest overlap.
    ///
    /// Ties between the axes go to the vertical axis (top/bottom); ties within
    /// an axis go to top and left respectively.
    pub fn struck_edge(&self) -> Edge {
        if self.y_depth() <= self.x_depth() {
            if self.top <= self.bottom {
                Edge::Top
            } else {
                Edge::Bottom
            }
        } else if self.left <= self.right {
            Edge::Left
        } else {
            Edge::Right
        }
    }
}
