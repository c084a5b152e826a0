// Battery and autostart settings.
// Device capability queries and best-effort navigation to vendor settings screens.

/// First platform level with battery-optimization exemptions.
pub const BATTERY_OPTIMIZATION_MIN_SDK: u32 = 23;
/// First platform level with background restrictions.
pub const BACKGROUND_RESTRICTION_MIN_SDK: u32 = 28;

/// A settings screen the host may be able to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsScreen {
    /// System prompt asking to exempt this app from battery optimization.
    RequestIgnoreBatteryOptimizations,
    /// System list of battery optimization exemptions.
    BatteryOptimizationSettings,
    /// This app's details page.
    AppDetails,
    /// A vendor screen addressed by package and activity.
    Vendor {
        package: &'static str,
        activity: &'static str,
    },
}

/// Vendor autostart screens, tried in order.
pub const AUTOSTART_SCREENS: [SettingsScreen; 7] = [
    SettingsScreen::Vendor {
        package: "com.miui.securitycenter",
        activity: "com.miui.permcenter.autostart.AutoStartManagementActivity",
    },
    SettingsScreen::Vendor {
        package: "com.huawei.systemmanager",
        activity: "com.huawei.systemmanager.startupmgr.ui.StartupNormalAppListActivity",
    },
    SettingsScreen::Vendor {
        package: "com.huawei.systemmanager",
        activity: "com.huawei.systemmanager.optimize.process.ProtectActivity",
    },
    SettingsScreen::Vendor {
        package: "com.oppo.safe",
        activity: "com.oppo.safe.permission.startup.StartupAppListActivity",
    },
    SettingsScreen::Vendor {
        package: "com.coloros.safecenter",
        activity: "com.coloros.safecenter.permission.startup.StartupAppListActivity",
    },
    SettingsScreen::Vendor {
        package: "com.vivo.permissionmanager",
        activity: "com.vivo.permissionmanager.activity.BgStartUpManagerActivity",
    },
    SettingsScreen::Vendor {
        package: "com.samsung.android.lool",
        activity: "com.samsung.android.sm.ui.battery.BatteryActivity",
    },
];

/// Device facilities behind the power channel.
pub trait PowerSettings {
    /// "<manufacturer> <brand>"
    fn manufacturer(&self) -> String;
    /// Platform API level; 0 when unknown.
    fn sdk_level(&self) -> u32;
    fn is_ignoring_battery_optimizations(&self) -> bool;
    fn is_background_restricted(&self) -> bool;
    /// Try to open a screen. Returns whether it opened.
    fn try_open(&mut self, screen: SettingsScreen) -> bool;
}

/// `None` when the platform predates battery-optimization exemptions.
pub fn ignoring_battery_optimizations(power: &dyn PowerSettings) -> Option<bool> {
    (power.sdk_level() >= BATTERY_OPTIMIZATION_MIN_SDK)
        .then(|| power.is_ignoring_battery_optimizations())
}

/// `None` when the platform predates background restrictions.
pub fn background_restricted(power: &dyn PowerSettings) -> Option<bool> {
    (power.sdk_level() >= BACKGROUND_RESTRICTION_MIN_SDK)
        .then(|| power.is_background_restricted())
}

pub fn request_ignore_battery_optimizations(power: &mut dyn PowerSettings) -> bool {
    power.sdk_level() >= BATTERY_OPTIMIZATION_MIN_SDK
        && power.try_open(SettingsScreen::RequestIgnoreBatteryOptimizations)
}

/// The generic exemption list, falling back to the app details page.
pub fn open_battery_optimization_settings(power: &mut dyn PowerSettings) -> bool {
    power.try_open(SettingsScreen::BatteryOptimizationSettings)
        || power.try_open(SettingsScreen::AppDetails)
}

pub fn open_app_details_settings(power: &mut dyn PowerSettings) -> bool {
    power.try_open(SettingsScreen::AppDetails)
}

/// The first vendor autostart screen that opens, else the app details page.
pub fn open_autostart_settings(power: &mut dyn PowerSettings) -> bool {
    for screen in AUTOSTART_SCREENS {
        if power.try_open(screen) {
            tracing::debug!(?screen, "opened autostart settings");
            return true;
        }
    }
    power.try_open(SettingsScreen::AppDetails)
}

/// Power facilities of a host without vendor settings screens.
#[derive(Debug, Clone, Default)]
pub struct HostPower;

impl PowerSettings for HostPower {
    fn manufacturer(&self) -> String {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
            .trim()
            .to_string()
    }

    fn sdk_level(&self) -> u32 {
        0
    }

    fn is_ignoring_battery_optimizations(&self) -> bool {
        true
    }

    fn is_background_restricted(&self) -> bool {
        false
    }

    fn try_open(&mut self, _screen: SettingsScreen) -> bool {
        false
    }
}
