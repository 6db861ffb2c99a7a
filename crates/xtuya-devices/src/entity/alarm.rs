//! Alarm control panel entity.
//!
//! The device reports its mode as one of a fixed set of raw tokens. They
//! are translated to platform-level [`AlarmState`]s on read, and platform
//! [`AlarmAction`]s are translated back to a raw token on write.

use serde::{Deserialize, Serialize};

use crate::descriptors::AlarmDescription;
use crate::device::SharedDevice;
use crate::dp::{DpCommand, DpType};
use crate::entity::{Entity, ModeEntity, TuyaEntity};
use crate::error::{DeviceError, Result};
use crate::manager::SharedDeviceManager;
use crate::type_data::EnumTypeData;

/// Raw mode token as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMode {
    Arm,
    Disarmed,
    Home,
    Sos,
}

impl AlarmMode {
    pub const ALL: [AlarmMode; 4] = [Self::Arm, Self::Disarmed, Self::Home, Self::Sos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Disarmed => "disarmed",
            Self::Home => "home",
            Self::Sos => "sos",
        }
    }

    /// Parse a raw token. Matching is exact.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == token)
    }

    pub fn state(self) -> AlarmState {
        match self {
            Self::Disarmed => AlarmState::Disarmed,
            Self::Arm => AlarmState::ArmedAway,
            Self::Home => AlarmState::ArmedHome,
            Self::Sos => AlarmState::Triggered,
        }
    }
}

impl std::fmt::Display for AlarmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-level alarm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    Disarmed,
    ArmedHome,
    ArmedAway,
    Triggered,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::ArmedHome => "armed_home",
            Self::ArmedAway => "armed_away",
            Self::Triggered => "triggered",
        }
    }
}

impl std::fmt::Display for AlarmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AlarmState> for &'static str {
    fn from(state: AlarmState) -> Self {
        state.as_str()
    }
}

/// Transition requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmAction {
    Disarm,
    ArmHome,
    ArmAway,
    Trigger,
}

impl AlarmAction {
    /// Feature flag a panel must advertise for this action; disarm needs none.
    pub fn required_feature(&self) -> AlarmFeatures {
        match self {
            Self::Disarm => AlarmFeatures::empty(),
            Self::ArmHome => AlarmFeatures::ARM_HOME,
            Self::ArmAway => AlarmFeatures::ARM_AWAY,
            Self::Trigger => AlarmFeatures::TRIGGER,
        }
    }
}

bitflags::bitflags! {
    /// Actions an alarm panel advertises beyond disarm.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AlarmFeatures: u8 {
        const ARM_HOME = 1 << 0;
        const ARM_AWAY = 1 << 1;
        const TRIGGER = 1 << 2;
    }
}

/// Translate a raw device token; `None` for tokens outside the vocabulary.
pub fn to_platform_state(token: &str) -> Option<AlarmState> {
    AlarmMode::from_token(token).map(AlarmMode::state)
}

/// Raw mode token that performs `action`.
pub fn to_device_command(action: AlarmAction) -> AlarmMode {
    match action {
        AlarmAction::Disarm => AlarmMode::Disarmed,
        AlarmAction::ArmHome => AlarmMode::Home,
        AlarmAction::ArmAway => AlarmMode::Arm,
        AlarmAction::Trigger => AlarmMode::Sos,
    }
}

/// Features implied by the modes a device declares.
pub fn supported_features(modes: &EnumTypeData) -> AlarmFeatures {
    let mut features = AlarmFeatures::empty();
    if modes.contains(AlarmMode::Home.as_str()) {
        features |= AlarmFeatures::ARM_HOME;
    }
    if modes.contains(AlarmMode::Arm.as_str()) {
        features |= AlarmFeatures::ARM_AWAY;
    }
    if modes.contains(AlarmMode::Sos.as_str()) {
        features |= AlarmFeatures::TRIGGER;
    }
    features
}

#[derive(Debug, Clone)]
pub struct AlarmEntity {
    base: TuyaEntity,
    description: AlarmDescription,
    modes: Option<EnumTypeData>,
    supported_features: AlarmFeatures,
}

impl AlarmEntity {
    pub fn new(
        device: SharedDevice,
        manager: SharedDeviceManager,
        description: AlarmDescription,
    ) -> Self {
        let modes = device.read().find_enum(&description.key, true);
        let base = TuyaEntity::new(device, manager, &description.key);
        let supported_features = match &modes {
            Some(modes) => supported_features(modes),
            None => {
                tracing::debug!(
                    unique_id = base.unique_id(),
                    "no enum type data, state will be unknown"
                );
                AlarmFeatures::empty()
            }
        };

        Self {
            base,
            description,
            modes,
            supported_features,
        }
    }

    pub fn description(&self) -> &AlarmDescription {
        &self.description
    }

    pub fn supported_features(&self) -> AlarmFeatures {
        self.supported_features
    }

    /// Declared raw modes, if the device provides them.
    pub fn modes(&self) -> Option<&EnumTypeData> {
        self.modes.as_ref()
    }

    /// Arming never asks for a code.
    pub fn code_arm_required(&self) -> bool {
        false
    }

    pub fn alarm_disarm(&self) -> Result<()> {
        self.apply_action(AlarmAction::Disarm)
    }

    pub fn alarm_arm_home(&self) -> Result<()> {
        self.apply_action(AlarmAction::ArmHome)
    }

    pub fn alarm_arm_away(&self) -> Result<()> {
        self.apply_action(AlarmAction::ArmAway)
    }

    pub fn alarm_trigger(&self) -> Result<()> {
        self.apply_action(AlarmAction::Trigger)
    }

    pub fn device_id(&self) -> &str {
        self.base.device_id()
    }
}

impl Entity for AlarmEntity {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn key(&self) -> &str {
        &self.description.key
    }

    fn available(&self) -> bool {
        self.base.available()
    }
}

impl ModeEntity for AlarmEntity {
    type State = AlarmState;
    type Action = AlarmAction;

    fn current_state(&self) -> Option<AlarmState> {
        self.modes.as_ref()?;
        let raw = self.base.status(&self.description.key)?;
        let Some(token) = raw.as_str() else {
            tracing::trace!(unique_id = self.base.unique_id(), "non-string mode value");
            return None;
        };
        let state = to_platform_state(token);
        if state.is_none() {
            tracing::debug!(unique_id = self.base.unique_id(), token, "unrecognized alarm mode");
        }
        state
    }

    fn apply_action(&self, action: AlarmAction) -> Result<()> {
        if self.modes.is_none() {
            return Err(DeviceError::TypeResolution {
                code: self.description.key.clone(),
                expected: DpType::Enum,
            });
        }
        let mode = to_device_command(action);
        self.base.send_command(vec![DpCommand::new(
            self.description.key.clone(),
            mode.as_str(),
        )])
    }
}
