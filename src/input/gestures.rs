//! Gesture-state combinator.
//!
//! Two gesture kinds can be in flight at once: a drag and a magnification.
//! Each is `None` (idle) or carries its route and its uncommitted delta.
//!
//! ```text
//!   Idle ──begin──► Active ──end────► Idle   (delta committed)
//!                     │  ▲
//!                  update│
//!                     └──┘ ──cancel─► Idle   (delta dropped)
//! ```
//!
//! Where a gesture goes is fixed at `begin` from the selection at that
//! moment. With no selection, drags pan and magnification zooms the canvas.
//! With a selection, both act on the selected emoji.

use egui::Vec2;

use crate::document::{Emoji, EmojiId};
use crate::error::{GestureError, GestureKind};

/// What an in-flight drag moves
#[derive(Debug, Clone, PartialEq)]
pub enum DragRoute {
    /// Whole-canvas pan
    Canvas,
    /// Every emoji that was selected when the drag began
    Selection(Vec<EmojiId>),
    /// One unselected emoji grabbed directly
    Emoji(EmojiId),
}

/// What an in-flight magnification scales
#[derive(Debug, Clone, PartialEq)]
pub enum MagnifyRoute {
    /// Whole-canvas zoom
    Canvas,
    /// Size of every emoji that was selected when the gesture began
    Selection(Vec<EmojiId>),
}

/// The committed result of a finished gesture
#[derive(Debug, Clone, PartialEq)]
pub enum GestureCommit {
    /// Add to the steady pan (document units)
    Pan(Vec2),
    /// Multiply into the steady zoom
    Zoom(f32),
    /// Move these emoji by a document-space delta
    Move { ids: Vec<EmojiId>, delta: Vec2 },
    /// Scale each of these emoji by a factor
    Scale { ids: Vec<EmojiId>, factor: f32 },
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    route: DragRoute,
    offset: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveMagnify {
    route: MagnifyRoute,
    scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    drag: Option<ActiveDrag>,
    magnify: Option<ActiveMagnify>,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the drag route for a drag that starts on `grabbed` (or on empty canvas).
    pub fn route_drag(grabbed: Option<&Emoji>, selected: Vec<EmojiId>) -> DragRoute {
        match grabbed {
            Some(emoji) if !emoji.is_selected => DragRoute::Emoji(emoji.id),
            _ if !selected.is_empty() => DragRoute::Selection(selected),
            _ => DragRoute::Canvas,
        }
    }

    pub fn route_magnify(selected: Vec<EmojiId>) -> MagnifyRoute {
        if selected.is_empty() {
            MagnifyRoute::Canvas
        } else {
            MagnifyRoute::Selection(selected)
        }
    }

    pub fn begin_drag(&mut self, route: DragRoute) -> Result<(), GestureError> {
        if self.drag.is_some() {
            return Err(GestureError::AlreadyActive(GestureKind::Drag));
        }
        log::debug!("Drag began: {:?}", route);
        self.drag = Some(ActiveDrag {
            route,
            offset: Vec2::ZERO,
        });
        Ok(())
    }

    /// Replaces the in-flight drag offset (document units, total since begin).
    pub fn update_drag(&mut self, offset: Vec2) -> Result<(), GestureError> {
        let drag = self
            .drag
            .as_mut()
            .ok_or(GestureError::NotActive(GestureKind::Drag))?;
        drag.offset = offset;
        Ok(())
    }

    pub fn end_drag(&mut self, offset: Vec2) -> Result<(DragRoute, GestureCommit), GestureError> {
        let drag = self
            .drag
            .take()
            .ok_or(GestureError::NotActive(GestureKind::Drag))?;
        let commit = match &drag.route {
            DragRoute::Canvas => GestureCommit::Pan(offset),
            DragRoute::Selection(ids) => GestureCommit::Move {
                ids: ids.clone(),
                delta: offset,
            },
            DragRoute::Emoji(id) => GestureCommit::Move {
                ids: vec![*id],
                delta: offset,
            },
        };
        log::debug!("Drag ended: {:?}", commit);
        Ok((drag.route, commit))
    }

    /// Drops the in-flight drag without committing it.
    pub fn cancel_drag(&mut self) -> Option<DragRoute> {
        let route = self.drag.take().map(|drag| drag.route);
        if route.is_some() {
            log::debug!("Drag cancelled");
        }
        route
    }

    pub fn begin_magnify(&mut self, route: MagnifyRoute) -> Result<(), GestureError> {
        if self.magnify.is_some() {
            return Err(GestureError::AlreadyActive(GestureKind::Magnify));
        }
        log::debug!("Magnify began: {:?}", route);
        self.magnify = Some(ActiveMagnify { route, scale: 1.0 });
        Ok(())
    }

    /// Replaces the in-flight magnification (cumulative since begin).
    pub fn update_magnify(&mut self, scale: f32) -> Result<(), GestureError> {
        let magnify = self
            .magnify
            .as_mut()
            .ok_or(GestureError::NotActive(GestureKind::Magnify))?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GestureError::InvalidZoom(scale));
        }
        magnify.scale = scale;
        Ok(())
    }

    pub fn end_magnify(&mut self, scale: f32) -> Result<GestureCommit, GestureError> {
        let magnify = self
            .magnify
            .take()
            .ok_or(GestureError::NotActive(GestureKind::Magnify))?;
        let commit = match magnify.route {
            MagnifyRoute::Canvas => GestureCommit::Zoom(scale),
            MagnifyRoute::Selection(ids) => GestureCommit::Scale { ids, factor: scale },
        };
        log::debug!("Magnify ended: {:?}", commit);
        Ok(commit)
    }

    pub fn cancel_magnify(&mut self) -> Option<MagnifyRoute> {
        let route = self.magnify.take().map(|magnify| magnify.route);
        if route.is_some() {
            log::debug!("Magnify cancelled");
        }
        route
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_magnifying(&self) -> bool {
        self.magnify.is_some()
    }

    pub fn drag_route(&self) -> Option<&DragRoute> {
        self.drag.as_ref().map(|drag| &drag.route)
    }

    pub fn magnify_route(&self) -> Option<&MagnifyRoute> {
        self.magnify.as_ref().map(|magnify| &magnify.route)
    }

    /// In-flight canvas pan (identity unless a canvas drag is active)
    pub fn pan_delta(&self) -> Vec2 {
        match &self.drag {
            Some(ActiveDrag {
                route: DragRoute::Canvas,
                offset,
            }) => *offset,
            _ => Vec2::ZERO,
        }
    }

    /// In-flight canvas zoom (identity unless a canvas magnification is active)
    pub fn zoom_delta(&self) -> f32 {
        match &self.magnify {
            Some(ActiveMagnify {
                route: MagnifyRoute::Canvas,
                scale,
            }) => *scale,
            _ => 1.0,
        }
    }

    /// In-flight offset for one emoji (document units)
    pub fn emoji_offset(&self, id: EmojiId) -> Vec2 {
        match &self.drag {
            Some(ActiveDrag {
                route: DragRoute::Selection(ids),
                offset,
            }) if ids.contains(&id) => *offset,
            Some(ActiveDrag {
                route: DragRoute::Emoji(dragged),
                offset,
            }) if *dragged == id => *offset,
            _ => Vec2::ZERO,
        }
    }

    /// In-flight size factor for one emoji
    pub fn emoji_scale(&self, id: EmojiId) -> f32 {
        match &self.magnify {
            Some(ActiveMagnify {
                route: MagnifyRoute::Selection(ids),
                scale,
            }) if ids.contains(&id) => *scale,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DocCoord;
    use egui::vec2;

    fn emoji(id: EmojiId, selected: bool) -> Emoji {
        let mut emoji = Emoji::new(id, "🐶", DocCoord::ORIGIN, 40);
        emoji.is_selected = selected;
        emoji
    }

    #[test]
    fn test_routing_follows_selection() {
        assert_eq!(GestureState::route_drag(None, vec![]), DragRoute::Canvas);
        assert_eq!(
            GestureState::route_drag(None, vec![1, 2]),
            DragRoute::Selection(vec![1, 2])
        );
        assert_eq!(
            GestureState::route_drag(Some(&emoji(1, true)), vec![1]),
            DragRoute::Selection(vec![1])
        );
        assert_eq!(
            GestureState::route_drag(Some(&emoji(3, false)), vec![1]),
            DragRoute::Emoji(3)
        );
        assert_eq!(GestureState::route_magnify(vec![]), MagnifyRoute::Canvas);
        assert_eq!(
            GestureState::route_magnify(vec![4]),
            MagnifyRoute::Selection(vec![4])
        );
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut gestures = GestureState::new();
        gestures.begin_drag(DragRoute::Canvas).unwrap();
        assert_eq!(
            gestures.begin_drag(DragRoute::Emoji(1)),
            Err(GestureError::AlreadyActive(GestureKind::Drag))
        );
        assert_eq!(gestures.drag_route(), Some(&DragRoute::Canvas));
    }

    #[test]
    fn test_update_without_begin_is_rejected() {
        let mut gestures = GestureState::new();
        assert_eq!(
            gestures.update_drag(Vec2::ZERO),
            Err(GestureError::NotActive(GestureKind::Drag))
        );
        assert!(gestures.end_magnify(2.0).is_err());
    }

    #[test]
    fn test_deltas_only_reach_their_route() {
        let mut gestures = GestureState::new();
        gestures.begin_drag(DragRoute::Selection(vec![1, 2])).unwrap();
        gestures.update_drag(vec2(5.0, 6.0)).unwrap();
        gestures.begin_magnify(MagnifyRoute::Canvas).unwrap();
        gestures.update_magnify(2.0).unwrap();

        assert_eq!(gestures.pan_delta(), Vec2::ZERO);
        assert_eq!(gestures.emoji_offset(1), vec2(5.0, 6.0));
        assert_eq!(gestures.emoji_offset(3), Vec2::ZERO);
        assert_eq!(gestures.zoom_delta(), 2.0);
        assert_eq!(gestures.emoji_scale(1), 1.0);
    }

    #[test]
    fn test_end_resets_to_identity() {
        let mut gestures = GestureState::new();
        gestures.begin_drag(DragRoute::Canvas).unwrap();
        gestures.update_drag(vec2(9.0, 9.0)).unwrap();
        let (_, commit) = gestures.end_drag(vec2(10.0, 0.0)).unwrap();

        assert_eq!(commit, GestureCommit::Pan(vec2(10.0, 0.0)));
        assert!(!gestures.is_dragging());
        assert_eq!(gestures.pan_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_cancel_drops_delta() {
        let mut gestures = GestureState::new();
        gestures.begin_magnify(MagnifyRoute::Selection(vec![7])).unwrap();
        gestures.update_magnify(3.0).unwrap();
        assert_eq!(
            gestures.cancel_magnify(),
            Some(MagnifyRoute::Selection(vec![7]))
        );
        assert_eq!(gestures.emoji_scale(7), 1.0);
        assert_eq!(gestures.cancel_magnify(), None);
    }
}
