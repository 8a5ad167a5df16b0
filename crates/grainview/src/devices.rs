//! Device registry.
//!
//! An in-memory list of field devices with add/update/remove and search.
//! When no device list is available, the registry is derived from the
//! sample collection: one device per distinct device id.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::storage::Storage;

/// Local store key of the saved registry.
pub const DEVICES_KEY: &str = "devices";

/// Operational status of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Reporting normally.
    #[default]
    Active,
    /// Taken out of service.
    Inactive,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// A registered field device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Registry key.
    pub id: String,
    /// Device identifier as reported in samples.
    pub device_id: String,
    /// Where the device is deployed.
    pub location: String,
    /// Administrative region of the deployment.
    pub state: String,
    /// Operational status.
    #[serde(default)]
    pub status: DeviceStatus,
}

/// Form data for creating or editing a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDraft {
    /// Device identifier.
    pub device_id: String,
    /// Deployment location.
    pub location: String,
    /// Administrative region.
    pub state: String,
    /// Operational status.
    pub status: DeviceStatus,
}

impl DeviceDraft {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("device id", &self.device_id),
            ("location", &self.location),
            ("state", &self.state),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_device(format!("{name} is required")));
            }
        }
        Ok(())
    }

    fn into_device(self, id: String) -> Device {
        Device {
            id,
            device_id: self.device_id,
            location: self.location,
            state: self.state,
            status: self.status,
        }
    }
}

/// Where a registry was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    /// Previously saved in the local store.
    LocalStore,
    /// A device list file.
    File,
    /// Derived from the sample collection.
    Samples,
}

/// In-memory device registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Create a registry from an existing device list.
    #[must_use]
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Derive one active device per distinct device id, in first-seen order.
    ///
    /// Location and state are taken from the first sample of each device.
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut seen = HashSet::new();
        let devices = samples
            .iter()
            .filter(|s| seen.insert(s.device_id.as_str()))
            .map(|s| Device {
                id: s.device_id.clone(),
                device_id: s.device_id.clone(),
                location: s.location.clone(),
                state: s.state.clone(),
                status: DeviceStatus::Active,
            })
            .collect();
        Self { devices }
    }

    /// Read a device list from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let devices: Vec<Device> = serde_json::from_str(&raw)?;
        Ok(Self { devices })
    }

    /// Bootstrap a registry.
    ///
    /// Tries, in order: the registry saved in the local store, the device
    /// list file, and finally derivation from `samples`.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be read.
    pub fn bootstrap(
        store: &Storage,
        devices_file: Option<&Path>,
        samples: &[Sample],
    ) -> Result<(Self, RegistrySource)> {
        if let Some(devices) = store.get_json::<Vec<Device>>(DEVICES_KEY)? {
            debug!("Loaded {} devices from the local store", devices.len());
            return Ok((Self::new(devices), RegistrySource::LocalStore));
        }

        if let Some(path) = devices_file {
            match Self::from_file(path) {
                Ok(registry) => {
                    debug!("Loaded {} devices from {}", registry.len(), path.display());
                    return Ok((registry, RegistrySource::File));
                }
                Err(e) => {
                    info!(
                        "Device list {} unavailable ({}), deriving from samples",
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok((Self::from_samples(samples), RegistrySource::Samples))
    }

    /// Save the registry to the local store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(&self, store: &Storage) -> Result<()> {
        store.set_json(DEVICES_KEY, &self.devices)
    }

    /// All devices, in registry order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device by registry id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Register a new device and return it.
    ///
    /// The id is the current time in milliseconds, bumped until unused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if the draft is incomplete.
    pub fn add(&mut self, draft: DeviceDraft) -> Result<&Device> {
        draft.validate()?;

        let mut stamp = Utc::now().timestamp_millis();
        while self.get(&stamp.to_string()).is_some() {
            stamp += 1;
        }

        let device = draft.into_device(stamp.to_string());
        info!("Added device {} ({})", device.device_id, device.id);
        self.devices.push(device);
        self.devices
            .last()
            .ok_or_else(|| Error::internal("device list empty after insert"))
    }

    /// Replace a device's fields, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if the draft is incomplete and
    /// [`Error::DeviceNotFound`] if no device has this id.
    pub fn update(&mut self, id: &str, draft: DeviceDraft) -> Result<&Device> {
        draft.validate()?;

        let slot = self
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::device_not_found(id))?;
        *slot = draft.into_device(id.to_string());
        info!("Updated device {}", id);
        Ok(&*slot)
    }

    /// Remove a device and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no device has this id.
    pub fn remove(&mut self, id: &str) -> Result<Device> {
        let index = self
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::device_not_found(id))?;
        let device = self.devices.remove(index);
        info!("Removed device {}", id);
        Ok(device)
    }

    /// Devices whose id, location, or state contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Device> {
        let needle = query.to_lowercase();
        self.devices
            .iter()
            .filter(|d| {
                d.device_id.to_lowercase().contains(&needle)
                    || d.location.to_lowercase().contains(&needle)
                    || d.state.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::{goa_and_chennai, sample};

    fn draft(device_id: &str) -> DeviceDraft {
        DeviceDraft {
            device_id: device_id.to_string(),
            location: "Puri Beach".to_string(),
            state: "Odisha".to_string(),
            status: DeviceStatus::Active,
        }
    }

    #[test]
    fn test_from_samples_dedups_in_first_seen_order() {
        let mut samples = goa_and_chennai();
        let mut repeat = sample(3, "Other Place", "D1", "Sandy", 0.2, "2024-02-01T00:00:00Z");
        repeat.state = "Kerala".to_string();
        samples.push(repeat);

        let registry = DeviceRegistry::from_samples(&samples);
        assert_eq!(registry.len(), 2);

        let first = &registry.devices()[0];
        assert_eq!(first.id, "D1");
        assert_eq!(first.device_id, "D1");
        assert_eq!(first.location, "Goa Beach");
        assert_eq!(first.state, "Goa");
        assert_eq!(first.status, DeviceStatus::Active);
        assert_eq!(registry.devices()[1].device_id, "D2");
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut registry = DeviceRegistry::default();
        let a = registry.add(draft("GS-100")).unwrap().id.clone();
        let b = registry.add(draft("GS-101")).unwrap().id.clone();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&b).unwrap().device_id, "GS-101");
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut registry = DeviceRegistry::default();
        let mut bad = draft("GS-1");
        bad.location = "   ".to_string();

        let err = registry.add(bad).unwrap_err();
        assert!(err.to_string().contains("location is required"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_keeps_id() {
        let mut registry = DeviceRegistry::from_samples(&goa_and_chennai());
        let mut edit = draft("D1-renamed");
        edit.status = DeviceStatus::Inactive;

        let updated = registry.update("D1", edit).unwrap();
        assert_eq!(updated.id, "D1");
        assert_eq!(updated.device_id, "D1-renamed");
        assert_eq!(updated.status, DeviceStatus::Inactive);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_update_unknown() {
        let mut registry = DeviceRegistry::default();
        let err = registry.update("nope", draft("x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove() {
        let mut registry = DeviceRegistry::from_samples(&goa_and_chennai());
        let removed = registry.remove("D2").unwrap();
        assert_eq!(removed.device_id, "D2");
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("D2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_search() {
        let registry = DeviceRegistry::from_samples(&goa_and_chennai());
        assert_eq!(registry.search("").len(), 2);
        assert_eq!(registry.search("tamil")[0].device_id, "D2");
        assert_eq!(registry.search("GOA BEACH")[0].device_id, "D1");
        assert_eq!(registry.search("d1").len(), 1);
        assert!(registry.search("kerala").is_empty());
    }

    #[test]
    fn test_device_json_shape() {
        let device = Device {
            id: "1".to_string(),
            device_id: "GS-1".to_string(),
            location: "Puri".to_string(),
            state: "Odisha".to_string(),
            status: DeviceStatus::Inactive,
        };
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["deviceId"], "GS-1");
        assert_eq!(json["status"], "inactive");

        let parsed: Device =
            serde_json::from_str(r#"{"id":"2","deviceId":"GS-2","location":"x","state":"y"}"#)
                .unwrap();
        assert_eq!(parsed.status, DeviceStatus::Active);
    }

    #[test]
    fn test_bootstrap_falls_back_to_samples() {
        let store = Storage::open_in_memory().unwrap();
        let samples = goa_and_chennai();

        let (registry, source) =
            DeviceRegistry::bootstrap(&store, Some(Path::new("/nonexistent/devices.json")), &samples)
                .unwrap();
        assert_eq!(source, RegistrySource::Samples);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_bootstrap_prefers_file_then_store() {
        let store = Storage::open_in_memory().unwrap();
        let path = std::env::temp_dir().join(format!("grainview_devices_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"id":"9","deviceId":"GS-9","location":"Digha","state":"West Bengal","status":"active"}]"#,
        )
        .unwrap();

        let (registry, source) =
            DeviceRegistry::bootstrap(&store, Some(path.as_path()), &goa_and_chennai()).unwrap();
        assert_eq!(source, RegistrySource::File);
        assert_eq!(registry.devices()[0].device_id, "GS-9");

        let mut saved = registry.clone();
        saved.add(draft("GS-10")).unwrap();
        saved.save(&store).unwrap();

        let (registry, source) =
            DeviceRegistry::bootstrap(&store, Some(path.as_path()), &goa_and_chennai()).unwrap();
        assert_eq!(source, RegistrySource::LocalStore);
        assert_eq!(registry.len(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(DeviceStatus::Active.to_string(), "active");
        assert_eq!(DeviceStatus::Inactive.to_string(), "inactive");
    }
}
