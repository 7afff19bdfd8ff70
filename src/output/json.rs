//! JSON output renderer.
//!
//! One pretty-printed object per command, for scripts and provisioning pipelines.

use crate::output::{OutputRenderer, Report};

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, report: &Report) -> String {
        let output = match report {
            Report::Provisioned(p) => serde_json::json!({
                "device_id": p.device_id,
                "device_key": p.device_key,
                "fresh": p.fresh,
                "key_file": p.key_location,
            }),
            Report::Computed {
                device_id,
                trace,
                show_trace,
            } => {
                let mut value = serde_json::json!({
                    "device_id": device_id,
                    "device_key": trace.key,
                });
                if *show_trace {
                    value["trace"] = serde_json::json!({
                        "h1": trace.h1,
                        "h2": trace.h2,
                        "h3": trace.h3,
                    });
                }
                value
            }
            Report::Verified(v) => serde_json::to_value(v).unwrap_or_default(),
            Report::Stored {
                key_location,
                device_key,
            } => serde_json::json!({
                "device_key": device_key,
                "key_file": key_location,
            }),
            Report::Config {
                config,
                id_path,
                key_path,
            } => serde_json::json!({
                "id_file": id_path.display().to_string(),
                "key_file": key_path.display().to_string(),
                "log_level": config.log.level,
            }),
        };

        let mut rendered =
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string());
        rendered.push('\n');
        rendered
    }
}
