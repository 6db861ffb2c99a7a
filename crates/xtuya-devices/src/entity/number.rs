//! Number entity over a scaled-integer data point.

use crate::descriptors::{EntityCategory, NumberDescription, NumberMode};
use crate::device::SharedDevice;
use crate::dp::DpCommand;
use crate::entity::{Entity, NumericEntity, TuyaEntity};
use crate::error::{DeviceError, Result};
use crate::manager::SharedDeviceManager;
use crate::type_data::IntegerTypeData;
use crate::units::{unit_of_measurement, NumberDeviceClass};

#[derive(Debug, Clone)]
pub struct NumberEntity {
    base: TuyaEntity,
    description: NumberDescription,
    number: Option<IntegerTypeData>,
    device_class: Option<NumberDeviceClass>,
    native_unit: Option<String>,
    /// Multiplier from the device's unit to `native_unit`.
    unit_factor: f64,
}

impl NumberEntity {
    pub fn new(
        device: SharedDevice,
        manager: SharedDeviceManager,
        description: NumberDescription,
    ) -> Self {
        let number = device.read().find_integer(&description.key, true);
        let base = TuyaEntity::new(device, manager, &description.key);

        let mut native_unit = description
            .native_unit
            .clone()
            .or_else(|| number.as_ref().and_then(|n| n.unit.clone()));
        let mut device_class = description.device_class.clone();
        let mut unit_factor = 1.0;

        // An explicit unit and the integration's own classes are trusted as
        // is. Otherwise the device's unit must be one the class accepts, or
        // the class is dropped.
        let reconcile = description.native_unit.is_none()
            && device_class
                .as_ref()
                .is_some_and(|class| !class.is_integration_specific());
        if let Some(class) = device_class.as_ref().filter(|_| reconcile) {
            match native_unit
                .as_deref()
                .and_then(|unit| unit_of_measurement(class, unit))
            {
                Some(uom) => {
                    native_unit = Some(uom.target_unit().to_string());
                    unit_factor = uom.conversion_factor;
                }
                None => {
                    tracing::debug!(
                        unique_id = base.unique_id(),
                        device_class = ?class,
                        unit = ?native_unit,
                        "unit not valid for device class, dropping class"
                    );
                    device_class = None;
                }
            }
        }

        if number.is_none() {
            tracing::debug!(
                unique_id = base.unique_id(),
                "no integer type data, value will be unknown"
            );
        }

        Self {
            base,
            description,
            number,
            device_class,
            native_unit,
            unit_factor,
        }
    }

    pub fn description(&self) -> &NumberDescription {
        &self.description
    }

    pub fn type_data(&self) -> Option<&IntegerTypeData> {
        self.number.as_ref()
    }

    pub fn native_min_value(&self) -> Option<f64> {
        self.number.as_ref().map(|n| n.min_scaled() * self.unit_factor)
    }

    pub fn native_max_value(&self) -> Option<f64> {
        self.number.as_ref().map(|n| n.max_scaled() * self.unit_factor)
    }

    pub fn native_step(&self) -> Option<f64> {
        self.number.as_ref().map(|n| n.step_scaled() * self.unit_factor)
    }

    pub fn native_unit(&self) -> Option<&str> {
        self.native_unit.as_deref()
    }

    pub fn device_class(&self) -> Option<&NumberDeviceClass> {
        self.device_class.as_ref()
    }

    pub fn entity_category(&self) -> Option<EntityCategory> {
        self.description.entity_category
    }

    pub fn mode(&self) -> NumberMode {
        self.description.mode
    }

    pub fn device_id(&self) -> &str {
        self.base.device_id()
    }
}

impl Entity for NumberEntity {
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

impl NumericEntity for NumberEntity {
    fn current_value(&self) -> Option<f64> {
        let number = self.number.as_ref()?;
        let raw = self.base.status(&self.description.key)?;
        match raw.as_i64() {
            Some(raw) => Some(number.scale_value(raw) * self.unit_factor),
            None => {
                tracing::trace!(
                    unique_id = self.base.unique_id(),
                    kind = raw.type_name(),
                    "non-integer status value"
                );
                None
            }
        }
    }

    fn apply_value(&self, value: f64) -> Result<()> {
        let number = self
            .number
            .as_ref()
            .ok_or_else(|| DeviceError::NoTypeData(self.description.key.clone()))?;
        if value.is_nan() {
            return Err(DeviceError::InvalidValue(format!(
                "{}: NaN is not a valid value",
                self.description.key
            )));
        }

        let raw = number.scale_value_back(value / self.unit_factor);
        self.base
            .send_command(vec![DpCommand::new(self.description.key.clone(), raw)])
    }
}
