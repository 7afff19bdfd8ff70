//! Terminal renderer: labelled lines for human inspection.

use colored::Colorize;

use crate::output::{OutputRenderer, Report};

/// Terminal output renderer with colored labels.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, report: &Report) -> String {
        let mut output = String::new();

        match report {
            Report::Provisioned(p) => {
                line(&mut output, "Device ID:", &p.device_id);
                line(&mut output, "Device Key:", &p.device_key.as_str().bold().to_string());
                let label = if p.fresh { "Key saved to:" } else { "Key file:" };
                line(&mut output, label, &p.key_location);
            }
            Report::Computed {
                device_id,
                trace,
                show_trace,
            } => {
                line(&mut output, "Device ID:", device_id);
                if *show_trace {
                    line(&mut output, "h1:", &trace.h1.dimmed().to_string());
                    line(&mut output, "h2:", &trace.h2.dimmed().to_string());
                    line(&mut output, "h3:", &trace.h3.dimmed().to_string());
                }
                line(&mut output, "Device Key:", &trace.key.as_str().bold().to_string());
            }
            Report::Verified(v) => {
                line(&mut output, "Device ID:", &v.device_id);
                line(&mut output, "Key file:", &v.key_location);
                if v.matches {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "✔".green().bold(),
                        "Stored key matches the device identifier.".green()
                    ));
                } else {
                    line(&mut output, "Expected:", v.expected.as_str());
                    line(&mut output, "Stored:", v.stored.as_str());
                    output.push_str(&format!(
                        "  {} {}\n",
                        "✖".red().bold(),
                        "Stored key does not match the device identifier.".red()
                    ));
                }
            }
            Report::Stored {
                key_location,
                device_key,
            } => {
                line(&mut output, "Key file:", key_location);
                line(&mut output, "Device Key:", &device_key.as_str().bold().to_string());
            }
            Report::Config {
                config,
                id_path,
                key_path,
            } => {
                line(&mut output, "ID file:", &id_path.display().to_string());
                line(&mut output, "Key file:", &key_path.display().to_string());
                line(&mut output, "Log level:", &config.log.level);
            }
        }

        output
    }
}

/// Append a `label value` line with the label padded to a common width.
fn line(output: &mut String, label: &str, value: &str) {
    output.push_str(&format!("{}{}\n", format!("{label:<14}").cyan(), value));
}
