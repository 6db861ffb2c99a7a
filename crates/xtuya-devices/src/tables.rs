//! Built-in descriptor tables.
//!
//! Mostly the integer DPs of each category's default instruction set end up
//! as numbers. Alarm panels have no built-in descriptors; they are supplied
//! entirely by extension sources.

use crate::descriptors::{AlarmDescription, DescriptorTable, NumberDescription, NumberMode};
use crate::units::NumberDeviceClass;

/// DP codes referenced by the built-in tables.
pub mod dpcode {
    pub const ALARM_TIME: &str = "alarm_time";
    pub const AUTO_LOCK_TIME: &str = "auto_lock_time";
    pub const BREATHDISTANCE_MAX: &str = "breathdistance_max";
    pub const BREATHDISTANCE_MIN: &str = "breathdistance_min";
    pub const BREATHSENSITIVITY: &str = "breathsensitivity";
    pub const BRIGHT_VALUE: &str = "bright_value";
    pub const CHARGE_CUR_SET: &str = "charge_cur_set";
    pub const COUNTDOWN: &str = "countdown";
    pub const COUNTDOWN_1: &str = "countdown_1";
    pub const COUNTDOWN_2: &str = "countdown_2";
    pub const COUNTDOWN_3: &str = "countdown_3";
    pub const COUNTDOWN_4: &str = "countdown_4";
    pub const COUNTDOWN_5: &str = "countdown_5";
    pub const COUNTDOWN_6: &str = "countdown_6";
    pub const COUNTDOWN_7: &str = "countdown_7";
    pub const COUNTDOWN_8: &str = "countdown_8";
    pub const DELAY_CLEAN_TIME: &str = "delay_clean_time";
    pub const DEO_END_TIME: &str = "deo_end_time";
    pub const DEO_START_TIME: &str = "deo_start_time";
    pub const HUMIDITY_CALIBRATION: &str = "humidity_calibration";
    pub const INSTALLATION_HEIGHT: &str = "installation_height";
    pub const LIQUID_DEPTH_MAX: &str = "liquid_depth_max";
    pub const MASTER_MODE: &str = "master_mode";
    pub const MAX_SET: &str = "max_set";
    pub const MINI_SET: &str = "mini_set";
    pub const MOVEDISTANCE_MAX: &str = "movedistance_max";
    pub const MOVEDISTANCE_MIN: &str = "movedistance_min";
    pub const MOVESENSITIVITY: &str = "movesensitivity";
    pub const PIR_DELAY: &str = "pir_delay";
    pub const PRESENCE_DELAY: &str = "presence_delay";
    pub const QUIET_TIME_END: &str = "quiet_time_end";
    pub const QUIET_TIME_START: &str = "quiet_time_start";
    pub const RECIPE: &str = "recipe";
    pub const SETTIME: &str = "settime";
    pub const SLEEP_END_TIME: &str = "sleep_end_time";
    pub const SLEEP_START_TIME: &str = "sleep_start_time";
    pub const STANDBY_BRIGHT: &str = "standby_bright";
    pub const STANDBY_TIME: &str = "standby_time";
    pub const TEMP_CALIBRATION: &str = "temp_calibration";
    pub const TEMP_SET_1: &str = "temp_set_1";
    pub const TEMPSC: &str = "tempsc";
    pub const TEMPSET: &str = "tempset";
    pub const TIMER_ON: &str = "timer_on";
    pub const UV_END_TIME: &str = "uv_end_time";
    pub const UV_START_TIME: &str = "uv_start_time";
    pub const VOLUME_SET: &str = "volume_set";
}

use dpcode::*;

fn countdowns() -> Vec<NumberDescription> {
    [
        COUNTDOWN_1,
        COUNTDOWN_2,
        COUNTDOWN_3,
        COUNTDOWN_4,
        COUNTDOWN_5,
        COUNTDOWN_6,
        COUNTDOWN_7,
        COUNTDOWN_8,
    ]
    .into_iter()
    .map(|code| NumberDescription::config(code, code))
    .collect()
}

fn boxed(code: &str) -> NumberDescription {
    NumberDescription::config(code, code).with_mode(NumberMode::Box)
}

fn slider(code: &str) -> NumberDescription {
    NumberDescription::config(code, code).with_mode(NumberMode::Slider)
}

fn plain(code: &str) -> NumberDescription {
    NumberDescription::config(code, code)
}

/// Number descriptions per category.
pub fn number_descriptors() -> DescriptorTable<NumberDescription> {
    DescriptorTable::new()
        .with_category(
            "bh",
            [NumberDescription::config(TEMP_SET_1, "warm_temperature")
                .with_device_class(NumberDeviceClass::Temperature)],
        )
        .with_category("dbl", [NumberDescription::config(VOLUME_SET, "volume")])
        .with_category(
            "gyd",
            [
                plain(COUNTDOWN),
                plain(PIR_DELAY),
                plain(STANDBY_TIME),
                plain(STANDBY_BRIGHT),
            ],
        )
        .with_category("jtmspro", [plain(AUTO_LOCK_TIME)])
        .with_category(
            "kg",
            [
                boxed(PRESENCE_DELAY),
                plain(MOVESENSITIVITY),
                boxed(MOVEDISTANCE_MAX),
                boxed(MOVEDISTANCE_MIN),
                plain(BREATHSENSITIVITY),
                boxed(BREATHDISTANCE_MAX),
                boxed(BREATHDISTANCE_MIN),
            ]
            .into_iter()
            .chain(countdowns()),
        )
        .with_category("mk", [plain(AUTO_LOCK_TIME), plain(ALARM_TIME)])
        .with_category(
            "msp",
            [
                plain(DELAY_CLEAN_TIME),
                plain(QUIET_TIME_END),
                plain(QUIET_TIME_START),
                plain(SLEEP_START_TIME),
                plain(SLEEP_END_TIME),
                plain(UV_START_TIME),
                plain(UV_END_TIME),
                plain(DEO_START_TIME),
                plain(DEO_END_TIME),
            ],
        )
        .with_category(
            "mzj",
            [
                NumberDescription::config(TEMPSET, "temp_set").with_mode(NumberMode::Slider),
                plain(RECIPE),
                NumberDescription::config(SETTIME, "set_time"),
                slider(TEMPSC),
            ],
        )
        .with_category("qccdz", [plain(CHARGE_CUR_SET), plain(TIMER_ON)])
        .with_category(
            "wnykq",
            [
                plain(BRIGHT_VALUE),
                slider(HUMIDITY_CALIBRATION),
                slider(TEMP_CALIBRATION),
            ],
        )
        .with_category(
            "ywcgq",
            [
                slider(MAX_SET),
                slider(MINI_SET),
                slider(INSTALLATION_HEIGHT),
                slider(LIQUID_DEPTH_MAX),
            ],
        )
}

/// Alarm control panel descriptions per category; empty by default.
pub fn alarm_descriptors() -> DescriptorTable<AlarmDescription> {
    DescriptorTable::new()
}
