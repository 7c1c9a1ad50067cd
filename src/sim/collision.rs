//! Collision detection and response for axis-aligned bodies
//!
//! Movement is resolved one axis at a time, X first and then Y. The order
//! matters: resolving X first lets a body slide along a floor it is resting
//! in, and lets a falling body land on a ledge it just walked off.

use super::rect::{Rect, clamp};
use super::state::Body;

/// What happened to a body during one resolution step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Landing {
    /// Came to rest on top of a solid while falling
    pub grounded: bool,
    /// Hit the underside of a solid while rising
    pub bonked: bool,
    /// Horizontal movement was stopped by a solid
    pub blocked: bool,
}

/// Advance `body` by its velocity over `dt` and push it out of `solids`.
///
/// Solids are visited in slice order; platform sets are non-overlapping, so
/// first-overlap resolution is enough. Final x is clamped into
/// `[0, world_width - body.w]`.
pub fn resolve_body(body: &mut Body, solids: &[Rect], world_width: f32, dt: f32) -> Landing {
    let mut landing = Landing::default();

    // Horizontal
    body.pos.x += body.vel.x * dt;
    for solid in solids {
        if body.rect().overlaps(solid) {
            if body.vel.x > 0.0 {
                body.pos.x = solid.x - body.size.x;
            } else if body.vel.x < 0.0 {
                body.pos.x = solid.right();
            }
            body.vel.x = 0.0;
            landing.blocked = true;
        }
    }

    // Vertical
    body.pos.y += body.vel.y * dt;
    for solid in solids {
        if body.rect().overlaps(solid) {
            if body.vel.y > 0.0 {
                body.pos.y = solid.y - body.size.y;
                body.vel.y = 0.0;
                landing.grounded = true;
            } else if body.vel.y < 0.0 {
                body.pos.y = solid.bottom();
                body.vel.y = 0.0;
                landing.bonked = true;
            }
        }
    }

    body.pos.x = clamp(body.pos.x, 0.0, world_width - body.size.x);

    landing
}
