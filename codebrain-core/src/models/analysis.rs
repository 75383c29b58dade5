use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured output of a completed code analysis task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// File path to the ordered list of UI impacts found in it.
    #[serde(default)]
    pub ui_impacts: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub compatibility_requirements: CompatibilityRequirements,

    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompatibilityRequirements {
    #[serde(default)]
    pub system_versions: Vec<String>,
    #[serde(default)]
    pub screen_resolutions: Vec<String>,
    #[serde(default)]
    pub orientations: Vec<String>,
    #[serde(default)]
    pub device_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompatibilityCategory {
    SystemVersions,
    ScreenResolutions,
    Orientations,
    DeviceTypes,
}

impl CompatibilityCategory {
    pub fn all() -> &'static [CompatibilityCategory] {
        &[
            CompatibilityCategory::SystemVersions,
            CompatibilityCategory::ScreenResolutions,
            CompatibilityCategory::Orientations,
            CompatibilityCategory::DeviceTypes,
        ]
    }

    /// Field name on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            CompatibilityCategory::SystemVersions => "system_versions",
            CompatibilityCategory::ScreenResolutions => "screen_resolutions",
            CompatibilityCategory::Orientations => "orientations",
            CompatibilityCategory::DeviceTypes => "device_types",
        }
    }

    /// Human title derived from the key: `screen_resolutions` -> `Screen Resolutions`.
    pub fn title(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CompatibilityRequirements {
    pub fn get(&self, category: CompatibilityCategory) -> &[String] {
        match category {
            CompatibilityCategory::SystemVersions => &self.system_versions,
            CompatibilityCategory::ScreenResolutions => &self.screen_resolutions,
            CompatibilityCategory::Orientations => &self.orientations,
            CompatibilityCategory::DeviceTypes => &self.device_types,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompatibilityCategory, &[String])> {
        CompatibilityCategory::all()
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_titles() {
        assert_eq!(CompatibilityCategory::SystemVersions.title(), "System Versions");
        assert_eq!(
            CompatibilityCategory::ScreenResolutions.title(),
            "Screen Resolutions"
        );
        assert_eq!(CompatibilityCategory::Orientations.title(), "Orientations");
        assert_eq!(CompatibilityCategory::DeviceTypes.title(), "Device Types");
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let results: AnalysisResults = serde_json::from_value(serde_json::json!({
            "ui_impacts": {},
            "compatibility_requirements": {"orientations": ["landscape"]},
            "status": "completed"
        }))
        .unwrap();

        assert!(results.compatibility_requirements.system_versions.is_empty());
        assert_eq!(
            results
                .compatibility_requirements
                .get(CompatibilityCategory::Orientations)
                .to_vec(),
            vec!["landscape".to_string()]
        );
        assert!(!results.compatibility_requirements.is_empty());
    }

    #[test]
    fn test_requirements_iterate_in_declared_order() {
        let keys: Vec<_> = CompatibilityRequirements::default()
            .iter()
            .map(|(category, _)| category.key())
            .collect();
        assert_eq!(
            keys,
            vec![
                "system_versions",
                "screen_resolutions",
                "orientations",
                "device_types"
            ]
        );
    }
}
