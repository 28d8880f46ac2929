//! Circle and rectangle geometry for bodies and obstacles
//!
//! Everything in the playfield is a circle; rectangles only bound the
//! playfield and the hole spawn area.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// True if `point` lies inside or on the circle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Penetration depth if the two circles touch or overlap
    ///
    /// Touching circles report `Some(0.0)`.
    pub fn overlap(&self, other: &Circle) -> Option<f32> {
        let reach = self.radius + other.radius;
        let dist = self.center.distance(other.center);
        if dist > reach { None } else { Some(reach - dist) }
    }

    /// Axis-aligned bounds of the circle
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Axis-aligned rectangle: origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The rectangle shrunk by `margin` on every side
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - 2.0 * margin).max(0.0),
            h: (self.h - 2.0 * margin).max(0.0),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Separating-axis overlap test; shared edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// True if the circle lies entirely inside the rectangle
    pub fn contains_circle(&self, circle: &Circle) -> bool {
        circle.center.x - circle.radius >= self.x
            && circle.center.x + circle.radius <= self.right()
            && circle.center.y - circle.radius >= self.y
            && circle.center.y + circle.radius <= self.bottom()
    }

    /// Map unit coordinates (`0..=1` on each axis) into the rectangle
    pub fn lerp(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(self.x + u * self.w, self.y + v * self.h)
    }
}

/// A physically simulated circular body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub shape: Circle,
    pub vel: Vec2,
}

impl Mover {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            shape: Circle::new(pos, radius),
            vel,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.shape.center
    }

    /// Advance position by one tick of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.shape.center += self.vel;
    }

    /// Scale velocity down so its magnitude is at most `max_speed`
    ///
    /// Direction is preserved: both components are scaled by
    /// `max_speed / speed` when the limit is exceeded.
    pub fn clamp_speed(&mut self, max_speed: f32) {
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel *= max_speed / speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_overlap_depth() {
        let a = Circle::new(Vec2::ZERO, 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        assert_eq!(a.overlap(&b), Some(5.0));

        let far = Circle::new(Vec2::new(25.0, 0.0), 4.0);
        assert_eq!(a.overlap(&far), None);

        let touching = Circle::new(Vec2::new(20.0, 0.0), 10.0);
        assert_eq!(a.overlap(&touching), Some(0.0));
    }

    #[test]
    fn test_circle_contains() {
        let c = Circle::new(Vec2::new(5.0, 5.0), 2.0);
        assert!(c.contains(Vec2::new(6.0, 6.0)));
        assert!(c.contains(Vec2::new(7.0, 5.0)));
        assert!(!c.contains(Vec2::new(8.0, 5.0)));
    }

    #[test]
    fn test_negative_radius_clamped() {
        assert_eq!(Circle::new(Vec2::ZERO, -3.0).radius, 0.0);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rect_inset_and_containment() {
        let field = Rect::new(0.0, 0.0, 683.0, 384.0);
        let spawn = field.inset(50.0);
        assert_eq!(spawn, Rect::new(50.0, 50.0, 583.0, 284.0));
        assert!(field.contains_circle(&Circle::new(Vec2::new(50.0, 50.0), 10.0)));
        assert!(!field.contains_circle(&Circle::new(Vec2::new(5.0, 50.0), 10.0)));
        assert_eq!(spawn.lerp(0.0, 0.0), Vec2::new(50.0, 50.0));
        assert_eq!(spawn.lerp(1.0, 1.0), Vec2::new(633.0, 334.0));
    }

    #[test]
    fn test_clamp_speed_preserves_direction() {
        let mut m = Mover::new(Vec2::ZERO, 10.0, Vec2::new(30.0, 40.0));
        m.clamp_speed(10.0);
        assert!((m.vel.length() - 10.0).abs() < 1e-4);
        assert!((m.vel.x - 6.0).abs() < 1e-4);
        assert!((m.vel.y - 8.0).abs() < 1e-4);

        // Under the limit: untouched
        let mut slow = Mover::new(Vec2::ZERO, 10.0, Vec2::new(1.0, 2.0));
        slow.clamp_speed(10.0);
        assert_eq!(slow.vel, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_circle_bounds() {
        let c = Circle::new(Vec2::new(10.0, 20.0), 5.0);
        assert_eq!(c.bounds(), Rect::new(5.0, 15.0, 10.0, 10.0));
    }
}
