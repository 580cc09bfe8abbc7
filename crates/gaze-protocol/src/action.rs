use serde::{Deserialize, Serialize};

/// Mouse button used by a `CLICK`/`DRAG`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle/wheel button.
    Middle,
}

impl Default for MouseButton {
    fn default() -> Self {
        Self::Left
    }
}

/// Lifecycle state of an [`Action`] as it moves through the executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Constructed, not yet dispatched.
    Pending,
    /// Dispatched to the platform adapter, outcome not yet known.
    InProgress,
    /// Dispatched and confirmed successful.
    Completed,
    /// Dispatched and confirmed unsuccessful.
    Failed,
}

/// The kind and parameters of a single atomic input action.
///
/// Kind and parameters are kept as one tagged union rather than two
/// independently-settable fields so an `Action` can never carry a kind that
/// disagrees with its own parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionParams {
    /// Click at an explicit point (for `__global__` steps) or, when `x`/`y`
    /// are `None`, at the zone's aim point (for visual steps).
    Click {
        /// Explicit x coordinate, if any.
        x: Option<f64>,
        /// Explicit y coordinate, if any.
        y: Option<f64>,
        /// Button to press.
        #[serde(default)]
        button: MouseButton,
    },
    /// Double-click, same coordinate rules as `Click`.
    DoubleClick {
        /// Explicit x coordinate, if any.
        x: Option<f64>,
        /// Explicit y coordinate, if any.
        y: Option<f64>,
    },
    /// Type literal UTF-8 text into the currently focused element.
    TypeText {
        /// Text to type.
        text: String,
    },
    /// Send a key chord, e.g. `ctrl+shift+s`.
    KeyPress {
        /// Chord syntax per the platform adapter contract.
        key: String,
    },
    /// Scroll by a platform-normalized tick amount.
    Scroll {
        /// Explicit x coordinate, if any.
        x: Option<f64>,
        /// Explicit y coordinate, if any.
        y: Option<f64>,
        /// Signed tick amount; sign indicates direction.
        amount: i32,
    },
    /// Move the cursor without clicking.
    Move {
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// Drag from one point to another. Kept as a first-class primitive
    /// rather than two composed clicks (see DESIGN.md open question (c)).
    Drag {
        /// Starting point.
        from: (f64, f64),
        /// Ending point.
        to: (f64, f64),
    },
}

impl ActionParams {
    /// Short discriminant name, used for logging and error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::DoubleClick { .. } => "double_click",
            Self::TypeText { .. } => "type_text",
            Self::KeyPress { .. } => "key_press",
            Self::Scroll { .. } => "scroll",
            Self::Move { .. } => "move",
            Self::Drag { .. } => "drag",
        }
    }
}

/// One atomic input action, en route to or already dispatched through the
/// platform adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Zone the action targets, if any (absent for explicit-coordinate
    /// `__global__` actions).
    pub target_zone_id: Option<String>,
    /// Kind and parameters.
    pub params: ActionParams,
    /// Current lifecycle status.
    pub status: ActionStatus,
}

impl Action {
    /// Construct a new, `Pending` action.
    #[must_use]
    pub fn new(params: ActionParams, target_zone_id: Option<String>) -> Self {
        Self {
            target_zone_id,
            params,
            status: ActionStatus::Pending,
        }
    }
}
