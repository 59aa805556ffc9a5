//! Export settings.

use serde::{Deserialize, Serialize};

/// How a marker's time attribute is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// The stored millisecond value followed by `s` (`1500` → `1500s`).
    #[default]
    Raw,
    /// Decimal seconds (`1500` → `1.5s`).
    Seconds,
}

impl TimeFormat {
    pub fn format(self, ms: u64) -> String {
        match self {
            TimeFormat::Raw => format!("{ms}s"),
            TimeFormat::Seconds => {
                let (secs, frac) = (ms / 1000, ms % 1000);
                if frac == 0 {
                    format!("{secs}s")
                } else {
                    let frac = format!("{frac:03}");
                    format!("{secs}.{}s", frac.trim_end_matches('0'))
                }
            }
        }
    }
}

/// Names used when splicing markers into the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Element that carries word identifiers (`*` matches any element).
    pub word_element: String,
    pub id_attribute: String,
    pub marker_element: String,
    pub time_attribute: String,
    pub time_format: TimeFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            word_element: "w".into(),
            id_attribute: "id".into(),
            marker_element: "anchor".into(),
            time_attribute: "time".into(),
            time_format: TimeFormat::Raw,
        }
    }
}

/// Where the authoritative source document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats() {
        assert_eq!(TimeFormat::Raw.format(1500), "1500s");
        assert_eq!(TimeFormat::Raw.format(0), "0s");
        assert_eq!(TimeFormat::Seconds.format(1500), "1.5s");
        assert_eq!(TimeFormat::Seconds.format(2000), "2s");
        assert_eq!(TimeFormat::Seconds.format(1234), "1.234s");
        assert_eq!(TimeFormat::Seconds.format(40), "0.04s");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"marker_element":"sync","time_format":"seconds"}"#).unwrap();
        assert_eq!(config.marker_element, "sync");
        assert_eq!(config.time_format, TimeFormat::Seconds);
        assert_eq!(config.word_element, "w");
    }
}
