use crate::db::models::OrgDetails;
use crate::error::ReceiptError;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::info;

/// Read the organization profile from `path`; `None` until setup has run.
pub fn load_from_file(path: &Path) -> Result<Option<OrgDetails>, ReceiptError> {
    if !path.exists() {
        info!(path = %path.display(), "organization profile not found; setup required");
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let profile: OrgDetails = serde_json::from_str(&contents)?;
    Ok(Some(profile))
}

/// Write the profile next to its final location, then rename over it.
fn write_to_file(path: &Path, profile: &OrgDetails) -> Result<(), ReceiptError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(profile)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// In-memory copy of the one-time organization profile, backed by a JSON file.
#[derive(Clone)]
pub struct OrgProfileStore {
    path: Arc<PathBuf>,
    current: Arc<RwLock<Option<OrgDetails>>>,
}

impl OrgProfileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ReceiptError> {
        let path = path.into();
        let current = load_from_file(&path)?;
        if let Some(profile) = current.as_ref() {
            info!(path = %path.display(), org = %profile.org_name, "loaded organization profile");
        }
        Ok(Self {
            path: Arc::new(path),
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub async fn get(&self) -> Option<OrgDetails> {
        self.current.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Persist the profile. Only the first call succeeds.
    ///
    /// The write lock is held across the file write, so racing callers see
    /// either nothing or the finished profile.
    pub async fn setup(&self, profile: OrgDetails) -> Result<(), ReceiptError> {
        let mut current = self.current.write().await;
        if current.is_some() {
            return Err(ReceiptError::AlreadyConfigured);
        }
        let path = Arc::clone(&self.path);
        let to_write = profile.clone();
        tokio::task::spawn_blocking(move || write_to_file(&path, &to_write))
            .await
            .map_err(|e| ReceiptError::Io(std::io::Error::other(e)))??;
        info!(path = %self.path.display(), org = %profile.org_name, "organization profile saved");
        *current = Some(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_hospital() -> OrgDetails {
        OrgDetails {
            org_name: "City Hospital".to_string(),
            org_address: Some("1 Ring Road".to_string()),
            org_phone: None,
            org_email: Some("front@city.test".to_string()),
        }
    }

    #[tokio::test]
    async fn absent_until_setup_then_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("org.json");

        let store = OrgProfileStore::open(&path).unwrap();
        assert!(!store.is_configured().await);

        store.setup(city_hospital()).await.unwrap();
        assert_eq!(store.get().await, Some(city_hospital()));

        let reopened = OrgProfileStore::open(&path).unwrap();
        assert_eq!(reopened.get().await, Some(city_hospital()));
    }

    #[tokio::test]
    async fn second_setup_is_rejected_and_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org.json");
        let store = OrgProfileStore::open(&path).unwrap();
        store.setup(city_hospital()).await.unwrap();

        let mut other = city_hospital();
        other.org_name = "Elsewhere".to_string();
        let err = store.setup(other).await.unwrap_err();
        assert!(matches!(err, ReceiptError::AlreadyConfigured));

        assert_eq!(load_from_file(&path).unwrap(), Some(city_hospital()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_setups_store_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org.json");
        let store = OrgProfileStore::open(&path).unwrap();

        let mut other = city_hospital();
        other.org_name = "Elsewhere".to_string();
        let first = tokio::spawn({
            let store = store.clone();
            async move { store.setup(city_hospital()).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            let other = other.clone();
            async move { store.setup(other).await }
        });
        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(ReceiptError::AlreadyConfigured)))
        );
        let stored = store.get().await.unwrap();
        assert!(stored == city_hospital() || stored == other);
        assert_eq!(load_from_file(&path).unwrap(), Some(stored));
    }

    #[test]
    fn corrupt_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_from_file(&path), Err(ReceiptError::Json(_))));
    }
}
