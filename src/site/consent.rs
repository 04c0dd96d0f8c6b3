//! Cookie-consent banner backed by a single stored preference flag.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Storage key of the consent flag.
pub const CONSENT_KEY: &str = "fs_consent";
/// How long the reset confirmation shows before the page reloads.
pub const RESET_RELOAD_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Accepted,
    Rejected,
}

impl Consent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consent::Accepted => "accepted",
            Consent::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(Consent::Accepted),
            "rejected" => Some(Consent::Rejected),
            _ => None,
        }
    }
}

/// String key/value storage in the manner of browser local storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object on disk; rewritten on every change. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", self.path.display()))
            }
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentStatus {
    pub text: String,
    pub class: &'static str,
}

#[derive(Debug)]
pub struct ConsentBanner<P> {
    store: P,
    visible: bool,
}

impl<P: PreferenceStore> ConsentBanner<P> {
    /// Shows the banner unless a valid choice is already stored.
    pub fn load(store: P) -> Result<Self> {
        let stored = store.get(CONSENT_KEY)?;
        let visible = stored.as_deref().and_then(Consent::parse).is_none();
        debug!(?stored, visible, "consent banner loaded");
        Ok(Self { store, visible })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn consent(&self) -> Result<Option<Consent>> {
        Ok(self.store.get(CONSENT_KEY)?.as_deref().and_then(Consent::parse))
    }

    pub fn accept(&mut self) -> Result<()> {
        self.choose(Consent::Accepted)
    }

    pub fn reject(&mut self) -> Result<()> {
        self.choose(Consent::Rejected)
    }

    /// Forgets the stored choice and shows the banner again.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(CONSENT_KEY)?;
        self.visible = true;
        info!("consent preferences reset");
        Ok(())
    }

    pub fn status(&self) -> Result<ConsentStatus> {
        let raw = self.store.get(CONSENT_KEY)?;
        let status = match raw.as_deref().and_then(Consent::parse) {
            Some(Consent::Accepted) => ConsentStatus {
                text: "✅ You have accepted all cookies".to_string(),
                class: "status-accepted",
            },
            Some(Consent::Rejected) => ConsentStatus {
                text: "⚠️ You have rejected non-essential cookies".to_string(),
                class: "status-rejected",
            },
            None => ConsentStatus {
                text: format!(
                    "ℹ️ No cookie preferences set (Current value: \"{}\")",
                    raw.as_deref().unwrap_or("null")
                ),
                class: "status-none",
            },
        };
        Ok(status)
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    fn choose(&mut self, consent: Consent) -> Result<()> {
        self.store.set(CONSENT_KEY, consent.as_str())?;
        self.visible = false;
        info!(consent = consent.as_str(), "consent recorded");
        Ok(())
    }
}

pub type PageConsent = ConsentBanner<Box<dyn PreferenceStore>>;

impl PageConsent {
    /// Opens the banner over the configured file, or over memory when no path
    /// is set. An unreadable or corrupt file is logged and replaced by an empty
    /// in-memory store, so the banner shows and the visitor can choose again.
    pub fn open(path: Option<&Path>) -> Self {
        let store: Box<dyn PreferenceStore> = match path {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::default()),
        };
        match ConsentBanner::load(store) {
            Ok(banner) => banner,
            Err(err) => {
                warn!(
                    error = %format!("{err:#}"),
                    "consent store unusable; keeping preferences in memory"
                );
                Self {
                    store: Box::new(MemoryStore::default()),
                    visible: true,
                }
            }
        }
    }
}

/// Label and state of the "reset preferences" button on the cookie policy page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetButton {
    confirmed: bool,
}

impl ResetButton {
    pub fn label(&self) -> &'static str {
        if self.confirmed {
            "✅ Preferences Reset!"
        } else {
            "Reset Cookie Preferences"
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        self.confirmed.then_some("#10b981")
    }

    pub fn is_disabled(&self) -> bool {
        self.confirmed
    }

    /// Clears the stored choice and shows the confirmation. Returns the delay
    /// after which the page reloads, or `None` while already confirmed.
    pub fn click<P: PreferenceStore>(
        &mut self,
        banner: &mut ConsentBanner<P>,
    ) -> Result<Option<Duration>> {
        if self.confirmed {
            return Ok(None);
        }
        banner.reset()?;
        self.confirmed = true;
        Ok(Some(RESET_RELOAD_DELAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_hides_after_choice_and_returns_on_reset() {
        let mut banner = ConsentBanner::load(MemoryStore::default()).unwrap();
        assert!(banner.is_visible());
        assert_eq!(banner.status().unwrap().class, "status-none");
        assert_eq!(
            banner.status().unwrap().text,
            "ℹ️ No cookie preferences set (Current value: \"null\")"
        );

        banner.reject().unwrap();
        assert!(!banner.is_visible());
        assert_eq!(banner.consent().unwrap(), Some(Consent::Rejected));
        assert_eq!(banner.status().unwrap().class, "status-rejected");

        banner.reset().unwrap();
        assert!(banner.is_visible());
        assert_eq!(banner.consent().unwrap(), None);
    }

    #[test]
    fn unknown_stored_value_keeps_banner_visible() {
        let mut store = MemoryStore::default();
        store.set(CONSENT_KEY, "maybe").unwrap();
        let banner = ConsentBanner::load(store).unwrap();
        assert!(banner.is_visible());
        assert_eq!(
            banner.status().unwrap().text,
            "ℹ️ No cookie preferences set (Current value: \"maybe\")"
        );
    }

    #[test]
    fn status_text_carries_icon_per_choice() {
        let mut banner = ConsentBanner::load(MemoryStore::default()).unwrap();
        banner.accept().unwrap();
        assert_eq!(banner.status().unwrap().text, "✅ You have accepted all cookies");
        banner.reject().unwrap();
        assert_eq!(
            banner.status().unwrap().text,
            "⚠️ You have rejected non-essential cookies"
        );
    }

    #[test]
    fn reset_button_confirms_once_then_waits_for_reload() {
        let mut banner = ConsentBanner::load(MemoryStore::default()).unwrap();
        banner.accept().unwrap();
        let mut button = ResetButton::default();
        assert!(!button.is_disabled());

        assert_eq!(button.click(&mut banner).unwrap(), Some(RESET_RELOAD_DELAY));
        assert_eq!(button.label(), "✅ Preferences Reset!");
        assert_eq!(button.color(), Some("#10b981"));
        assert!(button.is_disabled());
        assert!(banner.is_visible());
        assert_eq!(banner.consent().unwrap(), None);

        banner.reject().unwrap();
        assert_eq!(button.click(&mut banner).unwrap(), None);
        assert_eq!(banner.consent().unwrap(), Some(Consent::Rejected));
    }
}
