//! Drives the bluetoothctl adapter against a shell script standing in for the
//! real tool.

use bttoggle_core::{
    probe, toggle, BluetoothControl, Bluetoothctl, CtlError, DisplayText, ToggleAction,
    ToolCommand,
};
use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

struct FakeTool {
    _dir: tempfile::TempDir,
    script: PathBuf,
    log: PathBuf,
}

impl FakeTool {
    fn new(powered: bool, connected: Option<bool>, devices: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bluetoothctl.sh");
        let log = dir.path().join("calls.log");
        let devices_file = dir.path().join("devices.txt");
        fs::write(&devices_file, devices).unwrap();

        let yes_no = |flag: bool| if flag { "yes" } else { "no" };
        let info = match connected {
            Some(flag) => format!(
                "printf 'Device AA:BB:CC:DD:EE:FF (public)\\n\\tName: Pixel Buds\\n\\tConnected: {}\\n'",
                yes_no(flag)
            ),
            None => "echo 'Missing device address argument'; exit 1".to_string(),
        };

        let body = format!(
            r#"echo "$*" >> '{log}'
case "$1" in
  show) printf 'Controller 5C:F3:70:8B:2A:01 (public)\n\tPowered: {powered}\n' ;;
  info) {info} ;;
  devices) cat '{devices}' ;;
  connect) if [ "$2" = "00:00:00:00:00:00" ]; then echo "Device $2 not available"; exit 1; fi; echo "Connection successful" ;;
  power) echo "Changing power $2 succeeded" ;;
  disconnect) echo "Successful disconnected" ;;
  *) echo "Invalid command $1"; exit 1 ;;
esac
"#,
            log = log.display(),
            powered = yes_no(powered),
            info = info,
            devices = devices_file.display(),
        );
        fs::write(&script, body).unwrap();

        Self {
            _dir: dir,
            script,
            log,
        }
    }

    fn control(&self) -> Bluetoothctl {
        let tool = ToolCommand::new("sh").arg(self.script.display().to_string());
        Bluetoothctl::new(tool, CancellationToken::new())
    }

    fn calls(&self) -> Vec<String> {
        read_log(&self.log)
    }
}

fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn text() -> DisplayText {
    DisplayText {
        connected: "c".to_string(),
        disconnected: "d".to_string(),
        off: "o".to_string(),
    }
}

#[tokio::test]
async fn powered_and_connected_renders_connected_text() {
    let tool = FakeTool::new(true, Some(true), "");
    let status = probe(&tool.control()).await.unwrap();

    assert_eq!(status.render(&text()), "c");
    assert_eq!(tool.calls(), vec!["show", "info"]);
}

#[tokio::test]
async fn powered_off_renders_off_text() {
    let tool = FakeTool::new(false, Some(true), "");
    let status = probe(&tool.control()).await.unwrap();
    assert_eq!(status.render(&text()), "o");
}

#[tokio::test]
async fn no_default_device_reads_as_disconnected() {
    let tool = FakeTool::new(true, None, "");
    let status = probe(&tool.control()).await.unwrap();
    assert_eq!(status.render(&text()), "d");
}

#[tokio::test]
async fn per_device_info_failure_is_an_error() {
    let tool = FakeTool::new(true, None, "");
    let err = tool
        .control()
        .is_connected(Some("AA:BB:CC:DD:EE:FF"))
        .await
        .unwrap_err();
    match err {
        CtlError::ProcessFailed { output, .. } => {
            assert_eq!(output, "Missing device address argument")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn devices_are_listed_by_address() {
    let tool = FakeTool::new(
        true,
        Some(false),
        "Device AA:BB:CC:DD:EE:FF Pixel Buds\nDevice 11:22:33:44:55:66 MX Master 3\n",
    );
    let directory = tool.control().devices().await.unwrap();

    assert_eq!(directory.len(), 2);
    assert_eq!(directory.get("11:22:33:44:55:66").unwrap().name, "MX Master 3");
    assert_eq!(directory.by_name()["Pixel Buds"], "AA:BB:CC:DD:EE:FF");
}

#[tokio::test]
async fn malformed_listing_fails_the_query() {
    let tool = FakeTool::new(true, Some(false), "Device AA:BB:CC:DD:EE:FF Pixel Buds\nWaiting\n");
    let err = tool.control().devices().await.unwrap_err();
    assert!(matches!(err, CtlError::MalformedOutput { line } if line == "Waiting"));
}

#[tokio::test]
async fn connect_failure_carries_tool_output() {
    let tool = FakeTool::new(true, Some(false), "");
    let err = tool.control().connect("00:00:00:00:00:00").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("connect 00:00:00:00:00:00"), "{message}");
    assert!(message.contains("Device 00:00:00:00:00:00 not available"), "{message}");
}

#[tokio::test]
async fn toggle_from_connected_powers_off() {
    let tool = FakeTool::new(true, Some(true), "");
    let control = tool.control();

    let status = probe(&control).await.unwrap();
    let action = toggle(&control, status, "AA:BB:CC:DD:EE:FF").await.unwrap();

    assert_eq!(action, ToggleAction::PowerOff);
    assert_eq!(tool.calls(), vec!["show", "info", "power off"]);
}

#[tokio::test]
async fn toggle_from_off_powers_on_and_connects() {
    let tool = FakeTool::new(false, Some(false), "");
    let control = tool.control();

    let status = probe(&control).await.unwrap();
    toggle(&control, status, "AA:BB:CC:DD:EE:FF").await.unwrap();

    assert_eq!(
        tool.calls(),
        vec!["show", "info", "power on", "connect AA:BB:CC:DD:EE:FF"]
    );
}
