//! Per-bar trading signal.

use serde::{Deserialize, Serialize};

/// What a signal rule proposes at a given bar.
///
/// The rule only proposes; the simulator enforces position exclusivity
/// (a `Buy` while long and a `Close` while flat are both ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Close,
    Hold,
}
