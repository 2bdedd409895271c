//! Notification backends for different platforms

use std::io::Write;
use std::process::Command;

use crate::NotifyError;

/// Seconds a kdialog popup stays on screen
const POPUP_SECONDS: &str = "5";

/// A notification to display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    /// Notification title
    pub title: String,
    /// Notification message/body
    pub message: String,
    /// Icon name or path (optional)
    pub icon: Option<String>,
    /// Whether to play a sound
    pub sound: bool,
}

impl Notification {
    /// Create a new notification with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: crate::DEFAULT_TITLE.to_string(),
            message: message.into(),
            sound: true,
            ..Default::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Disable sound
    pub fn silent(mut self) -> Self {
        self.sound = false;
        self
    }
}

/// Available notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// macOS terminal-notifier
    TerminalNotifier,
    /// macOS osascript
    Osascript,
    /// Linux notify-send
    NotifySend,
    /// KDE kdialog
    Kdialog,
    /// WSL PowerShell
    Wsl,
    /// Fallback terminal bell
    Bell,
}

impl Backend {
    /// Detect the best available backend for the current platform
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            if Self::command_exists("terminal-notifier") {
                return Self::TerminalNotifier;
            }
            return Self::Osascript;
        }

        #[cfg(target_os = "linux")]
        {
            if std::env::var("WSL_DISTRO_NAME").is_ok() {
                return Self::Wsl;
            }
            if Self::command_exists("notify-send") {
                return Self::NotifySend;
            }
            if Self::command_exists("kdialog") {
                return Self::Kdialog;
            }
            return Self::Bell;
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Self::Bell
        }
    }

    #[allow(dead_code)]
    fn command_exists(cmd: &str) -> bool {
        which::which(cmd).is_ok()
    }

    /// Get the name of this backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::TerminalNotifier => "terminal-notifier",
            Self::Osascript => "osascript",
            Self::NotifySend => "notify-send",
            Self::Kdialog => "kdialog",
            Self::Wsl => "wsl",
            Self::Bell => "bell",
        }
    }

    /// Build the external command for this backend, if it uses one
    pub fn command(&self, notification: &Notification) -> Option<Command> {
        match self {
            Self::TerminalNotifier => Some(Self::terminal_notifier(notification)),
            Self::Osascript => Some(Self::osascript(notification)),
            Self::NotifySend => Some(Self::notify_send(notification)),
            Self::Kdialog => Some(Self::kdialog(notification)),
            Self::Wsl => Some(Self::wsl(notification)),
            Self::Bell => None,
        }
    }

    /// Send a notification using this backend
    pub fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Some(mut cmd) = self.command(notification) else {
            return Self::ring_bell(notification);
        };

        let status = cmd.status().map_err(|source| NotifyError::Spawn {
            backend: self.name(),
            source,
        })?;

        if !status.success() {
            return Err(NotifyError::Failed {
                backend: self.name(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn terminal_notifier(notification: &Notification) -> Command {
        let mut cmd = Command::new("terminal-notifier");
        cmd.args([
            "-title",
            &notification.title,
            "-message",
            &notification.message,
            "-group",
            "pomo",
        ]);

        if let Some(icon) = &notification.icon {
            cmd.args(["-appIcon", icon]);
        }

        if notification.sound {
            cmd.args(["-sound", "default"]);
        }
        cmd
    }

    fn osascript(notification: &Notification) -> Command {
        let title = notification.title.replace('"', r#"\""#);
        let message = notification.message.replace('"', r#"\""#);

        let mut script = format!(r#"display notification "{}" with title "{}""#, message, title);
        if notification.sound {
            script.push_str(r#" sound name "default""#);
        }

        let mut cmd = Command::new("osascript");
        cmd.args(["-e", &script]);
        cmd
    }

    fn notify_send(notification: &Notification) -> Command {
        let mut cmd = Command::new("notify-send");
        cmd.args([&notification.title, &notification.message]);

        if let Some(icon) = &notification.icon {
            cmd.args(["--icon", icon]);
        }

        // libnotify has no sound flag; the freedesktop sound hint covers most daemons
        if notification.sound {
            cmd.args(["--hint", "string:sound-name:complete"]);
        }
        cmd
    }

    fn kdialog(notification: &Notification) -> Command {
        let mut cmd = Command::new("kdialog");
        cmd.args([
            "--passivepopup",
            &notification.message,
            POPUP_SECONDS,
            "--title",
            &notification.title,
        ]);
        if let Some(icon) = &notification.icon {
            cmd.args(["--icon", icon]);
        }
        cmd
    }

    fn wsl(notification: &Notification) -> Command {
        // Escape single quotes for PowerShell
        let title = notification.title.replace('\'', "''");
        let message = notification.message.replace('\'', "''");

        let ps_script = format!(
            r#"[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); $template.GetElementsByTagName('text')[0].AppendChild($template.CreateTextNode('{}')) | Out-Null; $template.GetElementsByTagName('text')[1].AppendChild($template.CreateTextNode('{}')) | Out-Null; [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('pomo').Show([Windows.UI.Notifications.ToastNotification]::new($template))"#,
            title, message
        );

        let mut cmd = Command::new("powershell.exe");
        cmd.args(["-Command", &ps_script]);
        cmd
    }

    fn ring_bell(notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(title = %notification.title, message = %notification.message, "no desktop notifier, ringing bell");
        if notification.sound {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(())
    }
}
