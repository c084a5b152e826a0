// Method channels exposed to the application shell.
// Dispatches download, widget-refresh, and power calls and serves them over JSON lines.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, WidgetError};
use crate::widget::WidgetRefresher;

use super::download::Downloader;
use super::power::{self, PowerSettings};

pub const DOWNLOADS_CHANNEL: &str = "cqut/downloads";
pub const WIDGET_CHANNEL: &str = "cqut/widget";
pub const POWER_CHANNEL: &str = "cqut/power";

/// One call from the shell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub channel: String,
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

impl MethodCall {
    pub fn new(channel: &str, method: &str, args: Value) -> Self {
        Self {
            channel: channel.to_string(),
            method: method.to_string(),
            args,
        }
    }

    /// Non-blank string argument.
    fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    Success { value: Value },
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Into<Value>) -> Self {
        MethodResult::Success {
            value: value.into(),
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        MethodResult::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Routes shell calls to the platform facilities.
pub struct Bridge {
    downloader: Box<dyn Downloader>,
    power: Box<dyn PowerSettings>,
    widgets: Box<dyn WidgetRefresher>,
}

impl Bridge {
    pub fn new(
        downloader: Box<dyn Downloader>,
        power: Box<dyn PowerSettings>,
        widgets: Box<dyn WidgetRefresher>,
    ) -> Self {
        Self {
            downloader,
            power,
            widgets,
        }
    }

    /// Handle one call. Unknown channels and methods are not implemented.
    pub fn handle(&mut self, call: &MethodCall) -> MethodResult {
        tracing::debug!(channel = %call.channel, method = %call.method, "method call");
        match call.channel.as_str() {
            DOWNLOADS_CHANNEL => self.handle_downloads(call),
            WIDGET_CHANNEL => self.handle_widget(call),
            POWER_CHANNEL => self.handle_power(call),
            _ => MethodResult::NotImplemented,
        }
    }

    fn handle_downloads(&mut self, call: &MethodCall) -> MethodResult {
        if call.method != "enqueueDownload" {
            return MethodResult::NotImplemented;
        }

        let (Some(url), Some(file_name)) = (call.arg("url"), call.arg("fileName")) else {
            return MethodResult::error("INVALID_ARGS", "url/fileName is required");
        };

        match self.downloader.enqueue(url, file_name) {
            Ok(ticket) => MethodResult::success(json!({
                "downloadId": ticket.download_id,
                "path": ticket.path.display().to_string(),
            })),
            Err(e) => MethodResult::error("DOWNLOAD_FAILED", e.to_string()),
        }
    }

    fn handle_widget(&mut self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            "updateTodayWidget" => {
                self.widgets.refresh_all_widgets();
                MethodResult::success(Value::Null)
            }
            _ => MethodResult::NotImplemented,
        }
    }

    fn handle_power(&mut self, call: &MethodCall) -> MethodResult {
        let device = self.power.as_mut();
        match call.method.as_str() {
            "manufacturer" => MethodResult::success(device.manufacturer()),
            "isIgnoringBatteryOptimizations" => {
                MethodResult::success(power::ignoring_battery_optimizations(device))
            }
            "isBackgroundRestricted" => MethodResult::success(power::background_restricted(device)),
            "requestIgnoreBatteryOptimizations" => {
                MethodResult::success(power::request_ignore_battery_optimizations(device))
            }
            "openBatteryOptimizationSettings" => {
                MethodResult::success(power::open_battery_optimization_settings(device))
            }
            "openAppDetailsSettings" => {
                MethodResult::success(power::open_app_details_settings(device))
            }
            "openAutoStartSettings" => MethodResult::success(power::open_autostart_settings(device)),
            _ => MethodResult::NotImplemented,
        }
    }
}

/// Serve calls as JSON lines until `input` ends. Each line gets exactly one reply line.
pub fn serve_lines(input: impl BufRead, mut output: impl Write, bridge: &mut Bridge) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<MethodCall>(&line) {
            Ok(call) => bridge.handle(&call),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable method call");
                MethodResult::error("BAD_CALL", e.to_string())
            }
        };

        let reply = serde_json::to_string(&result).map_err(WidgetError::Json)?;
        writeln!(output, "{}", reply)?;
        output.flush()?;
    }
    Ok(())
}
