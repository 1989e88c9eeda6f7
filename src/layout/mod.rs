//! Anchor Layout - Closed-form rect resolution.
//!
//! Maps a component's relative rect and anchor data to an absolute screen
//! rect given the parent's absolute rect. Pure geometry; no layout tree,
//! no measurement pass. The scene composes this along the parent chain.
//!
//! # Resolution rule (per axis)
//!
//! The anchor (min, max) points are normalized positions inside the parent.
//! - Point anchor (`min == max`): the relative position is an offset from
//!   the anchored parent point and the relative size is used as-is.
//! - Stretch anchor (`min != max`): the rect spans the anchored region;
//!   the relative position and size act as deltas on top of it, so a zero
//!   relative rect fills the spanned axis exactly.

use crate::types::{Anchor, AnchorPoint, Rect};

// =============================================================================
// Resolution
// =============================================================================

/// Resolve one axis of the anchor transform.
///
/// `parent_pos`/`parent_size` describe the parent's absolute axis span,
/// `rel_pos`/`rel_size` the component's relative rect on that axis.
fn resolve_axis(
    parent_pos: i32,
    parent_size: i32,
    rel_pos: i32,
    rel_size: i32,
    min: f32,
    max: f32,
) -> (i32, i32) {
    let anchored_start = parent_pos + (parent_size as f32 * min).round() as i32;
    if (max - min).abs() < f32::EPSILON {
        (anchored_start + rel_pos, rel_size)
    } else {
        let span = (parent_size as f32 * (max - min)).round() as i32;
        (anchored_start + rel_pos, span + rel_size)
    }
}

/// Resolve a component's absolute rect against its parent's absolute rect.
///
/// `custom` supplies the (min, max) anchor points used when `anchor` is
/// [`Anchor::Custom`]; presets carry their own points.
pub fn resolve_rect(
    parent: Rect,
    relative: Rect,
    anchor: Anchor,
    custom: (AnchorPoint, AnchorPoint),
) -> Rect {
    let (min, max) = anchor.points().unwrap_or(custom);
    let (x, w) = resolve_axis(parent.x, parent.w, relative.x, relative.w, min.x, max.x);
    let (y, h) = resolve_axis(parent.y, parent.h, relative.y, relative.h, min.y, max.y);
    Rect::new(x, y, w, h)
}

// =============================================================================
// Tests
// =============================================================================
