use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// Coarse category of an interactive screen region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    /// A clickable button.
    Button,
    /// An editable text field.
    TextField,
    /// An item within a menu.
    MenuItem,
    /// A non-interactive-looking glyph that is nonetheless actionable.
    Icon,
    /// A toggleable checkbox.
    Checkbox,
    /// A hyperlink or link-like affordance.
    Link,
    /// A scrollable content area.
    ScrollArea,
    /// Anything that does not fit the above categories.
    Other,
}

/// Visual/interaction state of a zone at the moment it was last observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    /// Interactable and not otherwise distinguished.
    Enabled,
    /// Present but not interactable.
    Disabled,
    /// Holds keyboard focus.
    Focused,
    /// Currently under the cursor.
    Hovered,
    /// Mid-press (mouse-down observed but not yet released).
    Pressed,
    /// A checkbox/toggle in the checked position.
    Checked,
    /// A checkbox/toggle in the unchecked position.
    Unchecked,
}

/// A bounded, labeled region of the screen considered interactive.
///
/// Invariants upheld by producers (the Region Analyzer and Vision Analyzer)
/// and enforced by the registry: `bounds` is non-empty, `id` is unique
/// within the registry at any instant, and `last_seen` only moves forward
/// for a given `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable identifier, unique within the registry.
    pub id: String,
    /// Human-readable label as reported by the analyzer.
    pub label: String,
    /// Coarse category.
    pub kind: ZoneKind,
    /// Last observed interaction state.
    pub state: ZoneState,
    /// Bounding rectangle in logical screen coordinates.
    pub bounds: Rect,
    /// Analyzer confidence in `[0, 1]`.
    pub confidence: f64,
    /// Id of an enclosing zone, if any. A lookup key only; the registry
    /// never stores a back-pointer from a child to its parent.
    pub parent_id: Option<String>,
    /// Monotonic timestamp (milliseconds) of the observation that produced
    /// or refreshed this record.
    pub last_seen: u64,
}

impl Zone {
    /// Aim point a motion trajectory should target: the bounds center.
    #[must_use]
    pub fn aim_point(&self) -> (f64, f64) {
        self.bounds.center()
    }

    /// True when `bounds` is well-formed and `confidence` is in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.bounds.is_empty() && (0.0..=1.0).contains(&self.confidence)
    }
}
