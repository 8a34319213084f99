#![allow(dead_code)]

use skylink::{FieldValue, Fields, RawField, RawMessage, SchemaDefinition};

fn field(name: &str, kind: &str) -> RawField {
    RawField::new(name, kind)
}

/// A handful of well-known messages with published seeds
pub fn common_subset() -> SchemaDefinition {
    SchemaDefinition {
        enums: vec![],
        messages: vec![
            RawMessage::new(
                0,
                "HEARTBEAT",
                vec![
                    field("type", "uint8_t"),
                    field("autopilot", "uint8_t"),
                    field("base_mode", "uint8_t"),
                    field("custom_mode", "uint32_t"),
                    field("system_status", "uint8_t"),
                    field("mavlink_version", "uint8_t_mavlink_version"),
                ],
            ),
            RawMessage::new(
                22,
                "PARAM_VALUE",
                vec![
                    field("param_id", "char[16]"),
                    field("param_value", "float"),
                    field("param_count", "uint16_t"),
                    field("param_index", "uint16_t"),
                    field("param_type", "uint8_t"),
                ],
            ),
            RawMessage::new(
                25,
                "GPS_STATUS",
                vec![
                    field("satellites_visible", "uint8_t"),
                    field("satellite_prn", "uint8_t[20]"),
                    field("satellite_used", "uint8_t[20]"),
                    field("satellite_elevation", "uint8_t[20]"),
                    field("satellite_azimuth", "uint8_t[20]"),
                    field("satellite_snr", "uint8_t[20]"),
                ],
            ),
            RawMessage::new(
                30,
                "ATTITUDE",
                vec![
                    field("time_boot_ms", "uint32_t"),
                    field("roll", "float"),
                    field("pitch", "float"),
                    field("yaw", "float"),
                    field("rollspeed", "float"),
                    field("pitchspeed", "float"),
                    field("yawspeed", "float"),
                ],
            ),
            RawMessage::new(
                74,
                "VFR_HUD",
                vec![
                    field("airspeed", "float"),
                    field("groundspeed", "float"),
                    field("heading", "int16_t"),
                    field("throttle", "uint16_t"),
                    field("alt", "float"),
                    field("climb", "float"),
                ],
            ),
        ],
    }
}

pub fn fields<const N: usize>(values: [(&str, FieldValue); N]) -> Fields {
    values
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}

pub fn heartbeat(custom_mode: u32) -> Fields {
    fields([
        ("type", 2u8.into()),
        ("autopilot", 3u8.into()),
        ("base_mode", 0x51u8.into()),
        ("custom_mode", custom_mode.into()),
        ("system_status", 4u8.into()),
        ("mavlink_version", 3u8.into()),
    ])
}

pub fn attitude(time_boot_ms: u32, roll: f32) -> Fields {
    fields([
        ("time_boot_ms", time_boot_ms.into()),
        ("roll", roll.into()),
        ("pitch", (-roll).into()),
        ("yaw", 1.5f32.into()),
        ("rollspeed", 0.0f32.into()),
        ("pitchspeed", 0.25f32.into()),
        ("yawspeed", (-0.125f32).into()),
    ])
}

pub fn param_value(id: &str, value: f32, index: u16) -> Fields {
    fields([
        ("param_id", id.into()),
        ("param_value", value.into()),
        ("param_count", 400u16.into()),
        ("param_index", index.into()),
        ("param_type", 9u8.into()),
    ])
}

pub fn vfr_hud(heading: i16, alt: f32) -> Fields {
    fields([
        ("airspeed", 12.5f32.into()),
        ("groundspeed", 11.75f32.into()),
        ("heading", heading.into()),
        ("throttle", 48u16.into()),
        ("alt", alt.into()),
        ("climb", (-0.5f32).into()),
    ])
}

pub fn gps_status(visible: u8) -> Fields {
    let prn: Vec<u8> = (1..=20).collect();
    let used: Vec<u8> = (0..20).map(|i| u8::from(i < visible)).collect();
    fields([
        ("satellites_visible", visible.into()),
        ("satellite_prn", prn.into()),
        ("satellite_used", used.into()),
        ("satellite_elevation", vec![45u8; 20].into()),
        ("satellite_azimuth", vec![180u8; 20].into()),
        ("satellite_snr", vec![30u8; 20].into()),
    ])
}
