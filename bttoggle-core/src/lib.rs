/*!
 * bttoggle core
 * Drives bluetoothctl and a yad device menu to toggle, pick and report
 * a Bluetooth connection
 */

pub mod control;
pub mod directory;
pub mod error;
pub mod feed;
pub mod menu;
pub mod process;
pub mod reader;
pub mod scan;
pub mod session;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

pub use control::{connect_device, BluetoothControl, Bluetoothctl};
pub use directory::{Device, DeviceDirectory};
pub use error::{CtlError, Result};
pub use feed::{FeedExit, FeedWriter, SeenSet};
pub use menu::{default_menu_command, parse_selection, Selection, SelectionMenu};
pub use process::ToolCommand;
pub use session::{pick, plan_toggle, probe, toggle, ToggleAction};
pub use status::{DisplayText, IndicatorInterpreter, LinkStatus, StatusInterpreter};
pub use store::LastDeviceStore;
