//! Lowering configuration

use serde::Deserialize;

/// Knobs for script lowering
///
/// Read from the `[lowering]` table of a TOML configuration file; missing
/// keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoweringOptions {
    /// Declare a property for `_` destructuring entries
    pub declare_placeholder_properties: bool,
    /// Make receivers of earlier scripts of the session visible
    pub share_earlier_script_receivers: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            declare_placeholder_properties: true,
            share_earlier_script_receivers: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OptionsFile {
    #[serde(default)]
    lowering: LoweringOptions,
}

impl LoweringOptions {
    /// Parse the `[lowering]` table of a TOML document
    ///
    /// # Errors
    ///
    /// Malformed TOML, unknown keys or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let file: OptionsFile = toml::from_str(text)?;
        Ok(file.lowering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_table_missing() {
        let options = LoweringOptions::from_toml_str("").unwrap();
        assert_eq!(options, LoweringOptions::default());
        assert!(options.declare_placeholder_properties);
    }

    #[test]
    fn test_partial_table() {
        let options = LoweringOptions::from_toml_str(
            "[lowering]\ndeclare_placeholder_properties = false\n",
        )
        .unwrap();
        assert!(!options.declare_placeholder_properties);
        assert!(options.share_earlier_script_receivers);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(LoweringOptions::from_toml_str("[lowering]\ncache = true\n").is_err());
    }
}
