// Platform bridge module.
// Method channels the application shell calls for downloads, widget refresh, and power settings.

pub mod channel;
pub mod download;
pub mod power;

pub use channel::{Bridge, MethodCall, MethodResult, serve_lines};
pub use download::{DownloadTicket, Downloader, HttpDownloader};
pub use power::{HostPower, PowerSettings, SettingsScreen};
