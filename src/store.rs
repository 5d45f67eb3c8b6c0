//! Durable credential persistence.
//!
//! Three logical keys — access token, refresh token, and the cached user
//! profile — live in one JSON file under the user config dir. The file is
//! plaintext with 0600 permissions; credentials are per-device and not
//! encrypted at rest, which is a documented limitation rather than a goal.

use crate::error::StoreError;
use crate::types::UserProfile;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Logical keys held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKey {
    AccessToken,
    RefreshToken,
    UserProfile,
}

/// On-disk shape of the credential file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    /// Profile is stored pre-serialized so the store stays a plain
    /// string-to-string map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_profile: Option<String>,
}

impl StoreFile {
    fn slot(&mut self, key: CredentialKey) -> &mut Option<String> {
        match key {
            CredentialKey::AccessToken => &mut self.access_token,
            CredentialKey::RefreshToken => &mut self.refresh_token,
            CredentialKey::UserProfile => &mut self.user_profile,
        }
    }

    fn value(&self, key: CredentialKey) -> Option<&String> {
        match key {
            CredentialKey::AccessToken => self.access_token.as_ref(),
            CredentialKey::RefreshToken => self.refresh_token.as_ref(),
            CredentialKey::UserProfile => self.user_profile.as_ref(),
        }
    }
}

/// File-backed key-value store for session credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

/// Returns the default credential file path (`~/.config/wattline/credentials.json`).
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wattline").join("credentials.json"))
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one key. Fails soft: IO or parse problems read as absent and
    /// are logged, never surfaced to the caller.
    pub fn get(&self, key: CredentialKey) -> Option<String> {
        self.load_file().value(key).cloned()
    }

    /// Write one key.
    pub fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        let mut file = self.load_file();
        *file.slot(key) = Some(value.to_string());
        self.write_file(&file)
    }

    /// Remove one key. Removing an absent key is a no-op.
    pub fn remove(&self, key: CredentialKey) -> Result<(), StoreError> {
        let mut file = self.load_file();
        if file.slot(key).take().is_none() {
            return Ok(());
        }
        self.write_file(&file)
    }

    /// Serialize and persist the cached user profile.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let text = serde_json::to_string(profile)
            .map_err(|err| StoreError::Invalid(format!("failed to serialize profile: {err}")))?;
        self.set(CredentialKey::UserProfile, &text)
    }

    /// Deserialize the cached user profile.
    ///
    /// Malformed cached JSON returns `None` and logs a warning; session
    /// restore proceeds on the token alone.
    pub fn load_profile(&self) -> Option<UserProfile> {
        let text = self.get(CredentialKey::UserProfile)?;
        match serde_json::from_str(&text) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!("ignoring malformed cached profile: {err}");
                None
            }
        }
    }

    fn load_file(&self) -> StoreFile {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(file) => file,
                Err(err) => {
                    tracing::warn!(
                        "credential file `{}` is not valid JSON, reading as empty: {err}",
                        self.path.display()
                    );
                    StoreFile::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(err) => {
                tracing::warn!(
                    "failed to read credential file `{}`: {err}",
                    self.path.display()
                );
                StoreFile::default()
            }
        }
    }

    fn write_file(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            // Ensure config directory exists and is private.
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700));
            }
        }

        let text = serde_json::to_string_pretty(file)
            .map_err(|err| StoreError::Invalid(format!("failed to serialize store: {err}")))?;
        let mut options = std::fs::OpenOptions::new();
        options.create(true).truncate(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut handle = options.open(&self.path)?;
        handle.write_all(text.as_bytes())?;
        handle.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{sample_profile, temp_store_path};
    use crate::types::Role;

    #[test]
    fn missing_file_reads_as_empty() {
        let store = CredentialStore::new(temp_store_path());
        assert!(store.get(CredentialKey::AccessToken).is_none());
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn set_get_remove_round_trip() {
        let store = CredentialStore::new(temp_store_path());
        store.set(CredentialKey::AccessToken, "tok-a").unwrap();
        store.set(CredentialKey::RefreshToken, "tok-r").unwrap();
        assert_eq!(store.get(CredentialKey::AccessToken).as_deref(), Some("tok-a"));
        assert_eq!(store.get(CredentialKey::RefreshToken).as_deref(), Some("tok-r"));

        store.remove(CredentialKey::AccessToken).unwrap();
        assert!(store.get(CredentialKey::AccessToken).is_none());
        // Other keys are untouched by a single-key removal.
        assert_eq!(store.get(CredentialKey::RefreshToken).as_deref(), Some("tok-r"));
    }

    #[test]
    fn profile_round_trip() {
        let store = CredentialStore::new(temp_store_path());
        let profile = sample_profile(Role::AreaAdmin);
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile(), Some(profile));
    }

    #[test]
    fn malformed_cached_profile_reads_as_none() {
        let store = CredentialStore::new(temp_store_path());
        store.set(CredentialKey::UserProfile, "{not json").unwrap();
        assert!(store.load_profile().is_none());
        // The raw string is still readable for diagnostics.
        assert_eq!(store.get(CredentialKey::UserProfile).as_deref(), Some("{not json"));
    }

    #[test]
    fn corrupt_store_file_reads_as_empty() {
        let path = temp_store_path();
        std::fs::write(&path, "### not json ###").unwrap();
        let store = CredentialStore::new(path);
        assert!(store.get(CredentialKey::AccessToken).is_none());
        // Writing through a corrupt file replaces it with a clean one.
        store.set(CredentialKey::AccessToken, "tok").unwrap();
        assert_eq!(store.get(CredentialKey::AccessToken).as_deref(), Some("tok"));
    }

    #[cfg(unix)]
    #[test]
    fn credential_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let store = CredentialStore::new(temp_store_path());
        store.set(CredentialKey::AccessToken, "tok").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
