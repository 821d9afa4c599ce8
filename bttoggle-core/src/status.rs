/*!
 * Status Interpretation
 * Turns free-text control tool output into power and connection state
 */

use serde::{Deserialize, Serialize};

pub const POWERED_INDICATOR: &str = "Powered: yes";
pub const CONNECTED_INDICATOR: &str = "Connected: yes";

/// Reads adapter and device state out of raw `show` / `info` output.
pub trait StatusInterpreter: Send + Sync {
    fn is_powered(&self, show_output: &str) -> bool;
    fn is_connected(&self, info_output: &str) -> bool;
}

/// Substring matching on fixed indicator lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorInterpreter {
    pub powered: String,
    pub connected: String,
}

impl Default for IndicatorInterpreter {
    fn default() -> Self {
        Self {
            powered: POWERED_INDICATOR.to_string(),
            connected: CONNECTED_INDICATOR.to_string(),
        }
    }
}

impl StatusInterpreter for IndicatorInterpreter {
    fn is_powered(&self, show_output: &str) -> bool {
        show_output.contains(&self.powered)
    }

    fn is_connected(&self, info_output: &str) -> bool {
        info_output.contains(&self.connected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    pub powered: bool,
    pub connected: bool,
}

impl LinkStatus {
    pub fn render<'a>(&self, text: &'a DisplayText) -> &'a str {
        if !self.powered {
            &text.off
        } else if !self.connected {
            &text.disconnected
        } else {
            &text.connected
        }
    }
}

/// What to print for each link state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayText {
    pub connected: String,
    pub disconnected: String,
    pub off: String,
}

impl Default for DisplayText {
    fn default() -> Self {
        Self {
            connected: "connected".to_string(),
            disconnected: "disconnected".to_string(),
            off: "off".to_string(),
        }
    }
}
