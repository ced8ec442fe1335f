//! State management module
//!
//! The display board, the countdown/mode state machine and the shared
//! application state that ties them together.

pub mod app_state;
pub mod controller_state;
pub mod countdown;
pub mod display;
pub mod mode;
pub mod zmanim;

// Re-export main types
pub use app_state::{AppState, RefreshRecord, RefreshScope};
pub use controller_state::{ControllerState, FlipOutcome, RefreshOutcome};
pub use countdown::{ColorTier, CountdownView, PLACEHOLDER};
pub use display::{DisplayBoard, DisplaySnapshot, Field, FieldValue, HandAngles};
pub use mode::Mode;
pub use zmanim::TargetTimes;
