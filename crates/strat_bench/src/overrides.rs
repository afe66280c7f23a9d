use anyhow::{bail, Result};
use std::collections::HashMap;
use strat_core::Constants;

const VALID_KEYS: &[&str] = &["max_strategy_stints", "base_lap_time_s", "pit_stop_time_s"];

pub fn apply_overrides(
    constants: &mut Constants,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "max_strategy_stints" => constants.max_strategy_stints = as_u32(key, value)?,
            "base_lap_time_s" => constants.base_lap_time_s = as_f64(key, value)?,
            "pit_stop_time_s" => constants.pit_stop_time_s = as_f64(key, value)?,
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
    }
    Ok(())
}

fn as_f64(key: &str, value: &serde_json::Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| anyhow::anyhow!("override '{key}': expected a number, got {value}"))
}

fn as_u32(key: &str, value: &serde_json::Value) -> Result<u32> {
    let val = value.as_u64().ok_or_else(|| {
        anyhow::anyhow!("override '{key}': expected a positive integer, got {value}")
    })?;
    u32::try_from(val)
        .map_err(|_| anyhow::anyhow!("override '{key}': value {val} exceeds u32 range"))
}
