use regex::Regex;

use annotate_vcf_utils::error::ConfigError;

use crate::model::Config;

impl Config {
    /// Reject values that would only fail later, deep inside a snpEff run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_heap(&self.tools.java_heap) {
            return Err(ConfigError::InvalidValue {
                key: "java_heap".to_string(),
                value: self.tools.java_heap.clone(),
            });
        }

        if Regex::new(&self.tools.java_version_pattern).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "java_version_pattern".to_string(),
                value: self.tools.java_version_pattern.clone(),
            });
        }

        if self.engine.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        if self.annotation.coding_table.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "coding_table".to_string(),
                value: self.annotation.coding_table.clone(),
            });
        }

        Ok(())
    }
}

/// `-Xmx` sizes: a positive integer with an optional k/m/g unit.
fn is_valid_heap(heap: &str) -> bool {
    let digits = heap
        .strip_suffix(['k', 'K', 'm', 'M', 'g', 'G'])
        .unwrap_or(heap);
    !digits.is_empty() && !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit())
}
