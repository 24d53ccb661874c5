//! Leptos DragDrop Utilities
//!
//! Mouse-event drag-and-drop of cards between columns.
//! Uses movement threshold to distinguish click from drag.

use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Drop target types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space of a column
    Column(u32),
    /// Over another card; the card's column receives the drop
    Card { column: u32, card: u32 },
}

impl DropTarget {
    pub fn column(&self) -> u32 {
        match *self {
            DropTarget::Column(column) => column,
            DropTarget::Card { column, .. } => column,
        }
    }
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Card being dragged (threshold passed)
    pub dragging: RwSignal<Option<u32>>,
    /// Card under a pressed button, not yet dragging
    pub pending: RwSignal<Option<u32>>,
    pub drop_target: RwSignal<Option<DropTarget>>,
    /// Set briefly after a drop so the trailing click is ignored
    pub just_ended: RwSignal<bool>,
    /// Mousedown position
    pub start: RwSignal<(i32, i32)>,
}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

const CLICK_SUPPRESS_MS: u64 = 100;

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging: RwSignal::new(None),
        pending: RwSignal::new(None),
        drop_target: RwSignal::new(None),
        just_ended: RwSignal::new(false),
        start: RwSignal::new((0, 0)),
    }
}

pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

impl DndSignals {
    pub fn is_dragging(&self, card: u32) -> bool {
        self.dragging.get() == Some(card)
    }

    /// True when a click on a card should be handled as a click
    pub fn accepts_click(&self) -> bool {
        !self.just_ended.get_untracked() && self.dragging.get_untracked().is_none()
    }

    pub fn is_over_column(&self, column: u32) -> bool {
        self.dragging.get().is_some() && self.drop_target.get().map(|t| t.column()) == Some(column)
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    let was_dragging = dnd.dragging.get_untracked().is_some();
    dnd.dragging.set(None);
    dnd.drop_target.set(None);
    dnd.pending.set(None);

    if was_dragging {
        dnd.just_ended.set(true);
        let clear = dnd.just_ended;
        set_timeout(move || clear.set(false), Duration::from_millis(CLICK_SUPPRESS_MS));
    }
}

/// Create mousedown handler for a draggable card
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, card: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Controls inside a card keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        dnd.pending.set(Some(card));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

pub fn make_on_column_mouseenter(dnd: DndSignals, column: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_target.set(Some(DropTarget::Column(column)));
        }
    }
}

pub fn make_on_card_mouseenter(dnd: DndSignals, column: u32, card: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        match dnd.dragging.get_untracked() {
            Some(dragging) if dragging != card => {
                dnd.drop_target.set(Some(DropTarget::Card { column, card }));
            }
            _ => {}
        }
    }
}

/// Leaving a card falls back to its column.
pub fn make_on_card_mouseleave(dnd: DndSignals, column: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_target.set(Some(DropTarget::Column(column)));
        }
    }
}

pub fn make_on_column_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_target.set(None);
        }
    }
}

/// Bind window mousemove/mouseup for drag start and drop detection.
/// Listeners are removed when the calling owner is cleaned up.
pub fn bind_global_handlers<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(u32, DropTarget) + Clone + 'static,
{
    let on_move = window_event_listener(ev::mousemove, move |ev| {
        let pending = dnd.pending.get_untracked();
        if pending.is_some() && dnd.dragging.get_untracked().is_none() {
            let current = (ev.client_x(), ev.client_y());
            if exceeds_threshold(dnd.start.get_untracked(), current) {
                dnd.dragging.set(pending);
            }
        }
    });

    let on_up = window_event_listener(ev::mouseup, move |_ev| {
        let dragging = dnd.dragging.get_untracked();
        let target = dnd.drop_target.get_untracked();
        end_drag(&dnd);
        // Not dragging: the click event fires naturally on the element
        if let (Some(card), Some(target)) = (dragging, target) {
            on_drop(card, target);
        }
    });

    on_cleanup(move || {
        on_move.remove();
        on_up.remove();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        assert!(!exceeds_threshold((100, 100), (104, 95)));
        assert!(exceeds_threshold((100, 100), (106, 100)));
        assert!(exceeds_threshold((100, 100), (100, 94)));
    }

    #[test]
    fn test_target_column() {
        assert_eq!(DropTarget::Column(3).column(), 3);
        assert_eq!(DropTarget::Card { column: 4, card: 9 }.column(), 4);
    }
}
