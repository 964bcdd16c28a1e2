//! Room, furniture, and fixed-element data model.
//!
//! A [`Room`] is the immutable template for an optimization run: its
//! dimensions, fixed elements, and the list of furniture items that must be
//! placed. Candidate layouts only carry per-item [`Placement`]s, aligned by
//! index with [`Room::furniture`].

use crate::error::{Error, Result};
use crate::geometry::{Rect, Rotation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Kind of an immovable fixed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedKind {
    /// A door and its swing clearance.
    Door,
    /// A window opening.
    Window,
    /// An interior wall segment or other built-in obstacle.
    WallSegment,
}

/// An immovable element of the room (door, window, wall segment).
///
/// Created once from room configuration and never mutated during
/// optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedElement {
    /// What this element is.
    pub kind: FixedKind,
    /// Its footprint in room coordinates.
    pub rect: Rect,
}

impl FixedElement {
    /// Creates a new fixed element.
    pub fn new(kind: FixedKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// A furniture item template: identity and base dimensions, fixed for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    /// Unique identifier within the room.
    pub id: String,
    /// Type tag (`bed`, `chair`, `tv-unit`, ...). Free-form, not an enum.
    pub kind: String,
    /// Base (unrotated) width.
    pub width: f64,
    /// Base (unrotated) height.
    pub height: f64,
}

impl FurnitureItem {
    /// Creates a new furniture item.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            width,
            height,
        }
    }

    /// Footprint area (rotation-invariant).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The item's rectangle at the given placement.
    pub fn rect_at(&self, placement: &Placement) -> Rect {
        Rect::new(placement.x, placement.y, self.width, self.height)
            .with_rotation(placement.rotation)
    }
}

/// Position and rotation of one furniture item. The only mutable furniture
/// state during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// X coordinate of the lower-left corner of the effective bounds.
    pub x: f64,
    /// Y coordinate of the lower-left corner of the effective bounds.
    pub y: f64,
    /// Quadrant rotation.
    pub rotation: Rotation,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(x: f64, y: f64, rotation: Rotation) -> Self {
        Self { x, y, rotation }
    }
}

/// The optimization arena: room dimensions, fixed elements, and the
/// furniture template list. Shared read-only across all individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room width (x extent).
    pub width: f64,
    /// Room height (y extent).
    pub height: f64,
    /// Immovable elements.
    pub fixed_elements: Vec<FixedElement>,
    /// Furniture items to place, in canonical index order.
    pub furniture: Vec<FurnitureItem>,
}

impl Room {
    /// Creates an empty room with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fixed_elements: Vec::new(),
            furniture: Vec::new(),
        }
    }

    /// Adds a fixed element.
    pub fn with_fixed_element(mut self, element: FixedElement) -> Self {
        self.fixed_elements.push(element);
        self
    }

    /// Adds a furniture item to the template list.
    pub fn with_furniture(mut self, item: FurnitureItem) -> Self {
        self.furniture.push(item);
        self
    }

    /// Room floor area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Total furniture footprint area.
    pub fn footprint_area(&self) -> f64 {
        self.furniture.iter().map(|f| f.area()).sum()
    }

    /// Returns true if the total furniture footprint exceeds the room area.
    ///
    /// Not an error: the GA still runs and reports its honest best.
    pub fn is_infeasible(&self) -> bool {
        self.footprint_area() > self.area()
    }

    /// Validates the room configuration.
    ///
    /// Rejects non-positive or non-finite dimensions up front so numeric
    /// edge cases never surface mid-run.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(Error::InvalidConfiguration(format!(
                "room dimensions must be positive and finite, got {}x{}",
                self.width, self.height
            )));
        }

        if self.furniture.is_empty() {
            return Err(Error::InvalidConfiguration(
                "furniture list is empty; nothing to optimize".into(),
            ));
        }

        for item in &self.furniture {
            if !(item.width.is_finite() && item.width > 0.0)
                || !(item.height.is_finite() && item.height > 0.0)
            {
                return Err(Error::InvalidConfiguration(format!(
                    "furniture '{}' has invalid dimensions {}x{}",
                    item.id, item.width, item.height
                )));
            }
        }

        for element in &self.fixed_elements {
            let r = &element.rect;
            if !(r.width.is_finite() && r.width > 0.0)
                || !(r.height.is_finite() && r.height > 0.0)
                || !r.x.is_finite()
                || !r.y.is_finite()
            {
                return Err(Error::InvalidConfiguration(format!(
                    "fixed element {:?} has invalid rectangle",
                    element.kind
                )));
            }
        }

        Ok(())
    }

    /// Loads a room description from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let room: Room = serde_json::from_str(&data)?;
        Ok(room)
    }

    /// Writes the room description to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
