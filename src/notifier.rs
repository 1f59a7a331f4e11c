//! Notification delivery.
//!
//! Callers treat notifications as fire-and-forget: every implementation
//! handles its own failures so a missed notification never interrupts the
//! reminder loop.

use log::{info, warn};

/// Something that can show a notification to the user.
pub trait Notifier {
    /// Show a notification. Never fails from the caller's point of view.
    fn notify(&self, title: &str, subtitle: &str, message: &str, sound: bool);
}

/// Desktop notifications through the OS notification service.
#[cfg(feature = "desktop-notify")]
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

#[cfg(feature = "desktop-notify")]
impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[cfg(feature = "desktop-notify")]
impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(crate::common::APP_DIR_NAME)
    }
}

#[cfg(feature = "desktop-notify")]
impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, subtitle: &str, message: &str, sound: bool) {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .subtitle(subtitle)
            .body(message);
        if sound {
            notification.sound_name("default");
        }

        if let Err(e) = notification.show() {
            warn!("Failed to deliver notification '{}': {}", title, e);
        }
    }
}

/// Writes notifications to the log instead of the desktop.
///
/// Used when desktop notifications are compiled out or unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, subtitle: &str, message: &str, _sound: bool) {
        if subtitle.is_empty() {
            info!("{}: {}", title, message);
        } else {
            info!("{}: {} - {}", title, subtitle, message);
        }
    }
}

/// The best notifier available in this build.
pub fn default_notifier() -> Box<dyn Notifier> {
    #[cfg(feature = "desktop-notify")]
    {
        Box::new(DesktopNotifier::default())
    }

    #[cfg(not(feature = "desktop-notify"))]
    {
        Box::new(LogNotifier)
    }
}
