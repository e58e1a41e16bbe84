use std::collections::BTreeMap;

use crate::model::Config;

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                config.insert(key.to_string(), (value, self.source_of(key).to_string()));
            }
        };

        add(
            "snpeff",
            self.tools.snpeff.as_ref().map(|p| p.display().to_string()),
        );
        add(
            "java",
            self.tools.java.as_ref().map(|p| p.display().to_string()),
        );
        add(
            "java_fallbacks",
            Some(
                self.tools
                    .java_fallbacks
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        );
        add(
            "java_version_pattern",
            Some(self.tools.java_version_pattern.clone()),
        );
        add("java_heap", Some(self.tools.java_heap.clone()));
        add("coding_table", Some(self.annotation.coding_table.clone()));
        add(
            "workspace_dir",
            self.workspace
                .parent_dir
                .as_ref()
                .map(|p| p.display().to_string()),
        );
        add("keep_workspace", Some(self.workspace.keep.to_string()));
        add(
            "timeout_secs",
            self.engine.timeout_secs.map(|t| t.to_string()),
        );
        add("verbose", Some(self.verbose.to_string()));

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigSource;

    #[test]
    fn test_effective_config_reports_sources() {
        let mut config = Config::default();
        config.engine.timeout_secs = Some(120);
        config
            .source_attribution
            .insert("timeout_secs".to_string(), ConfigSource::Cli);

        let effective = config.effective_config();

        assert_eq!(
            effective.get("timeout_secs"),
            Some(&("120".to_string(), "cli".to_string()))
        );
        assert_eq!(effective.get("java_heap").unwrap().1, "default");
        // Unset optional values are omitted
        assert!(!effective.contains_key("snpeff"));
    }
}
