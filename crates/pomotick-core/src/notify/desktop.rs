use notify_rust::Notification;

use super::{Notifier, Permission};

/// OS notifications through the desktop notification service.
///
/// There is no permission prompt on the desktop; the `enabled` config flag
/// plays that role.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn notify(&self, title: &str, body: &str) {
        if !self.enabled {
            tracing::debug!("notifications disabled; skipping");
            return;
        }

        let title = title.to_string();
        let body = body.to_string();
        // show() talks to the notification daemon synchronously.
        let spawned = std::thread::Builder::new()
            .name("pomotick-notify".into())
            .spawn(move || {
                if let Err(e) = Notification::new()
                    .appname("pomotick")
                    .summary(&title)
                    .body(&body)
                    .show()
                {
                    tracing::warn!(error = %e, "failed to send notification");
                }
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to spawn notification thread");
        }
    }
}
