//! Keyboard navigation between drop targets while a dashboard item is dragged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinate, Rect};
use crate::id::ItemId;
use crate::kind::DragKind;

/// Arrow key the navigator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `ArrowUp`
    Up,
    /// `ArrowDown`
    Down,
    /// `ArrowLeft`
    Left,
    /// `ArrowRight`
    Right,
}

impl Direction {
    /// Map a keyboard event code to a direction. Any other key yields `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Whether `rect` lies in this direction as seen from `from`.
    fn admits(self, from: &Rect, rect: &Rect) -> bool {
        match self {
            Self::Down => from.top < rect.top,
            Self::Up => from.top > rect.top,
            Self::Left => from.left >= rect.right(),
            Self::Right => from.right() <= rect.left,
        }
    }
}

/// Data attached to draggables and droppables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragData {
    /// Kind of the item.
    #[serde(rename = "type")]
    pub kind: DragKind,
    /// Number of nested children (columns and boards only).
    #[serde(default)]
    pub children: usize,
}

impl DragData {
    /// Data for a childless item of `kind`.
    #[must_use]
    pub const fn new(kind: DragKind) -> Self {
        Self { kind, children: 0 }
    }

    /// Attach a child count.
    #[must_use]
    pub const fn with_children(mut self, children: usize) -> Self {
        self.children = children;
        self
    }
}

/// True when the entry carries board, clip or tab drag data.
#[must_use]
pub fn has_draggable_data(data: Option<&DragData>) -> bool {
    data.is_some_and(|data| data.kind.is_dashboard_item())
}

/// The item currently being dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDrag {
    /// Identifier of the dragged item.
    pub id: ItemId,
    /// Attached drag data, if any.
    #[serde(default)]
    pub data: Option<DragData>,
}

impl ActiveDrag {
    fn kind(&self) -> Option<DragKind> {
        self.data.map(|data| data.kind)
    }
}

/// A registered drop container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppableContainer {
    /// Identifier of the container.
    pub id: ItemId,
    /// Disabled containers never receive keyboard focus.
    #[serde(default)]
    pub disabled: bool,
    /// Attached drag data, if any.
    #[serde(default)]
    pub data: Option<DragData>,
    /// Current measured rectangle of the container node.
    #[serde(default)]
    pub rect: Option<Rect>,
}

impl DroppableContainer {
    /// Enabled container without data or measured rect.
    #[must_use]
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
            data: None,
            rect: None,
        }
    }

    /// Attach drag data.
    #[must_use]
    pub const fn with_data(mut self, data: DragData) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the current rectangle.
    #[must_use]
    pub const fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Set the disabled flag.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn is_populated_column(&self) -> bool {
        self.data
            .is_some_and(|data| data.kind == DragKind::Column && data.children > 0)
    }
}

/// Geometry of a drag in progress, as reported by the host framework.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragGeometrySnapshot {
    /// Item being dragged.
    #[serde(default)]
    pub active: Option<ActiveDrag>,
    /// Measured rectangles keyed by container id.
    #[serde(default)]
    pub droppable_rects: HashMap<ItemId, Rect>,
    /// Containers in registration order.
    #[serde(default)]
    pub droppable_containers: Vec<DroppableContainer>,
    /// Bounding box of the dragged item.
    #[serde(default)]
    pub collision_rect: Option<Rect>,
}

/// Result of feeding a key press to the navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardOutcome {
    /// Not a navigation key; the host keeps its default behavior.
    Ignored,
    /// Navigation key; the host must suppress its default scrolling and move
    /// to the coordinate when one was found.
    Handled(Option<Coordinate>),
}

impl KeyboardOutcome {
    /// Whether the host should call `preventDefault` on the event.
    #[must_use]
    pub const fn prevents_default(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Next coordinate for the drag overlay, if any.
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Handled(coordinate) => *coordinate,
            Self::Ignored => None,
        }
    }
}

/// A candidate scored by the closest-corners metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    /// Container identifier.
    pub id: ItemId,
    /// Mean corner distance, rounded to four decimals.
    pub value: f64,
}

/// Score candidates by the mean distance between corresponding corners.
///
/// The result is sorted ascending; equal scores keep the candidate order.
#[must_use]
pub fn closest_corners<'a, I>(collision_rect: &Rect, candidates: I) -> Vec<Collision>
where
    I: IntoIterator<Item = (&'a ItemId, &'a Rect)>,
{
    let corners = collision_rect.corners();
    let mut collisions: Vec<Collision> = candidates
        .into_iter()
        .map(|(id, rect)| {
            let total: f64 = rect
                .corners()
                .iter()
                .zip(corners.iter())
                .map(|(a, b)| a.distance_to(*b))
                .sum();
            Collision {
                id: id.clone(),
                value: round4(total / 4.0),
            }
        })
        .collect();
    // sort_by is stable, so ties resolve by container order.
    collisions.sort_by(|a, b| a.value.total_cmp(&b.value));
    collisions
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Resolve where keyboard focus moves when `key_code` is pressed mid-drag.
#[must_use]
pub fn resolve_next_drop_target(key_code: &str, snapshot: &DragGeometrySnapshot) -> KeyboardOutcome {
    let Some(direction) = Direction::from_code(key_code) else {
        return KeyboardOutcome::Ignored;
    };
    let (Some(active), Some(collision_rect)) = (&snapshot.active, &snapshot.collision_rect) else {
        return KeyboardOutcome::Handled(None);
    };

    let active_is_column = active.kind() == Some(DragKind::Column);
    // Columns reorder horizontally only.
    if active_is_column && direction.is_vertical() {
        return KeyboardOutcome::Handled(None);
    }

    let candidates = snapshot
        .droppable_containers
        .iter()
        .filter(|entry| !entry.disabled)
        .filter_map(|entry| snapshot.droppable_rects.get(&entry.id).map(|rect| (entry, rect)))
        .filter(|(entry, _)| active_is_column || !entry.is_populated_column())
        .filter(|(_, rect)| direction.admits(collision_rect, rect))
        .map(|(entry, rect)| (&entry.id, rect));

    let collisions = closest_corners(collision_rect, candidates);
    let coordinate = collisions.first().and_then(|winner| {
        snapshot
            .droppable_containers
            .iter()
            .find(|entry| entry.id == winner.id)
            .and_then(|entry| entry.rect)
            .map(|rect| rect.top_left())
    });
    KeyboardOutcome::Handled(coordinate)
}
