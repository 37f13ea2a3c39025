use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result, msg};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

/// Human-readable text for each state, kept apart from the enum itself.
const STATE_DESCRIPTIONS: [(DeviceState, &str); 3] = [
    (DeviceState::Available, "Device is ready to use"),
    (DeviceState::InUse, "Device is currently being used"),
    (DeviceState::Inactive, "Device is not available"),
];

#[derive(Debug, Clone, Serialize)]
pub struct StateDescription {
    pub state: DeviceState,
    pub description: &'static str,
}

/// All states with their descriptions, in declaration order.
pub fn state_descriptions() -> Vec<StateDescription> {
    STATE_DESCRIPTIONS
        .iter()
        .map(|&(state, description)| StateDescription { state, description })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    /// Set by the store on insert, never updated
    pub creation_time: DateTime<Utc>,
}

/// Body of a create request. State and creation time are always server-assigned,
/// so any such keys in the payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub name: String,
    pub brand: String,
}

impl CreateDevice {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest(msg::NAME_EMPTY.into()));
        }
        if self.brand.trim().is_empty() {
            return Err(AppError::BadRequest(msg::BRAND_EMPTY.into()));
        }
        Ok(())
    }
}

/// Deserialize a field that may be absent, null, or set:
/// - key absent → None
/// - key present with null → Some(None)
/// - key present with value → Some(Some(value))
fn deserialize_optional_nullable<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    // Only reached when the key is present
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(Some(value))
}

/// Body of a partial update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDevice {
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub state: Option<Option<DeviceState>>,
}

impl UpdateDevice {
    /// Convert the request into a change-set. None of the device fields is
    /// nullable, so an explicit null is rejected rather than read as "no change".
    pub fn into_change_set(self) -> Result<ChangeSet> {
        let name = match self.name {
            None => None,
            Some(None) => return Err(AppError::BadRequest(msg::NAME_NULL.into())),
            Some(Some(name)) if name.trim().is_empty() => {
                return Err(AppError::BadRequest(msg::NAME_EMPTY.into()));
            }
            Some(Some(name)) => Some(name),
        };
        let brand = match self.brand {
            None => None,
            Some(None) => return Err(AppError::BadRequest(msg::BRAND_NULL.into())),
            Some(Some(brand)) if brand.trim().is_empty() => {
                return Err(AppError::BadRequest(msg::BRAND_EMPTY.into()));
            }
            Some(Some(brand)) => Some(brand),
        };
        let state = match self.state {
            None => None,
            Some(None) => return Err(AppError::BadRequest(msg::STATE_NULL.into())),
            Some(Some(state)) => Some(state),
        };
        Ok(ChangeSet { name, brand, state })
    }
}

/// Fields a partial update explicitly supplies. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

impl ChangeSet {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Listing filter. Only one dimension applies per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFilter {
    All,
    Brand(String),
    State(DeviceState),
}

impl DeviceFilter {
    /// Build a filter from optional query parameters. Brand takes precedence:
    /// when both are given the state filter is dropped.
    pub fn from_params(brand: Option<String>, state: Option<DeviceState>) -> Self {
        match (brand, state) {
            (Some(brand), _) => DeviceFilter::Brand(brand),
            (None, Some(state)) => DeviceFilter::State(state),
            (None, None) => DeviceFilter::All,
        }
    }
}
