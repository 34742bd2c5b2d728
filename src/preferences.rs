use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::Language;
use crate::theme::ThemeMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeMode,
    /// Interface language. `None` means "use the configured default".
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub sidebar_collapsed: bool,
    /// Mirror toasts to desktop notifications.
    #[serde(default)]
    pub desktop_notifications: bool,
    /// Last email typed on the login form, kept only when "remember me" was ticked.
    #[serde(default)]
    pub remembered_email: Option<String>,
}

const MAX_EMAIL_LEN: usize = 254;

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            language: None,
            sidebar_collapsed: false,
            desktop_notifications: false,
            remembered_email: None,
        }
    }
}

impl Preferences {
    /// Config directory: Windows → AppData/Local/Mobilis/Dashboard/
    /// Linux → ~/.config/Mobilis/Dashboard/
    fn config_dir() -> PathBuf {
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Mobilis")
            .join("Dashboard")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("preferences.json")
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let mut prefs: Self = serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), "invalid preferences file, using defaults: {e}");
                    Self::default()
                });
                prefs.sanitize();
                prefs
            }
            Err(_) => Self::default(),
        }
    }

    fn sanitize(&mut self) {
        if let Some(email) = &self.remembered_email {
            let email = email.trim();
            self.remembered_email = if email.is_empty() || email.len() > MAX_EMAIL_LEN {
                None
            } else {
                Some(email.to_string())
            };
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!("failed to create config directory: {e}");
                return;
            }
            // Set restrictive permissions on config directory (Unix only)
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = fs::set_permissions(dir, fs::Permissions::from_mode(0o700));
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    tracing::warn!("failed to save preferences: {e}");
                    return;
                }
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
                }
                tracing::debug!(path = %path.display(), "preferences saved");
            }
            Err(e) => {
                tracing::warn!("failed to serialize preferences: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, ThemeMode::Light);
        assert!(prefs.language.is_none());
        assert!(!prefs.sidebar_collapsed);
        assert!(!prefs.desktop_notifications);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences {
            theme: ThemeMode::Dark,
            language: Some(Language::Ar),
            sidebar_collapsed: true,
            desktop_notifications: true,
            remembered_email: Some("op@mobilis.com".into()),
        };
        prefs.save_to(&path);
        assert_eq!(Preferences::load_from(&path), prefs);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_backwards_compat_missing_fields() {
        // Simulate an old config written before language and notifications existed
        let old_json = r#"{"theme":"dark"}"#;
        let prefs: Preferences = serde_json::from_str(old_json).unwrap();
        assert_eq!(prefs.theme, ThemeMode::Dark);
        assert!(prefs.language.is_none());
        assert!(!prefs.desktop_notifications);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Preferences::load_from(&path), Preferences::default());
    }

    #[test]
    fn test_sanitize_drops_blank_email() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"remembered_email":"   "}"#).unwrap();
        assert!(Preferences::load_from(&path).remembered_email.is_none());
    }
}
