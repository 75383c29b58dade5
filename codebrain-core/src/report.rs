//! Display projection of [`AnalysisResults`].
//!
//! [`AnalysisReport`] decides what a front end shows: the verdict banner, the per-file
//! impact entries and the grouped compatibility requirements, each with a placeholder
//! when there is nothing to list. It never mutates the results or touches the network.

use crate::models::{AnalysisResults, CompatibilityCategory};

pub const VERDICT_IMPACTS: &str = "UI changes detected - compatibility testing recommended";
pub const VERDICT_NO_IMPACTS: &str = "No significant UI impacts detected";
pub const NO_UI_CHANGES: &str = "No UI changes detected in the code.";
pub const NO_REQUIREMENTS: &str = "No specific compatibility testing requirements identified.";

pub const IMPACTS_HEADING: &str = "UI Impacts";
pub const REQUIREMENTS_HEADING: &str = "Compatibility Requirements";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactEntry<'a> {
    pub path: &'a str,
    pub impacts: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImpactSection<'a> {
    Entries(Vec<ImpactEntry<'a>>),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementGroup<'a> {
    pub category: CompatibilityCategory,
    pub title: String,
    pub items: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSection<'a> {
    Groups(Vec<RequirementGroup<'a>>),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport<'a> {
    pub has_ui_impacts: bool,
    pub has_compatibility_requirements: bool,
    pub impacts: ImpactSection<'a>,
    pub requirements: RequirementSection<'a>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(results: &'a AnalysisResults) -> Self {
        let has_ui_impacts = !results.ui_impacts.is_empty();
        let has_compatibility_requirements = !results.compatibility_requirements.is_empty();

        let impacts = if has_ui_impacts {
            ImpactSection::Entries(
                results
                    .ui_impacts
                    .iter()
                    .map(|(path, impacts)| ImpactEntry {
                        path: path.as_str(),
                        impacts: impacts.as_slice(),
                    })
                    .collect(),
            )
        } else {
            ImpactSection::Placeholder(NO_UI_CHANGES)
        };

        let requirements = if has_compatibility_requirements {
            RequirementSection::Groups(
                results
                    .compatibility_requirements
                    .iter()
                    .filter(|(_, items)| !items.is_empty())
                    .map(|(category, items)| RequirementGroup {
                        category,
                        title: category.title(),
                        items,
                    })
                    .collect(),
            )
        } else {
            RequirementSection::Placeholder(NO_REQUIREMENTS)
        };

        Self {
            has_ui_impacts,
            has_compatibility_requirements,
            impacts,
            requirements,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.has_ui_impacts {
            VERDICT_IMPACTS
        } else {
            VERDICT_NO_IMPACTS
        }
    }

    /// Plain-text rendering, one line per item.
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.verdict().to_string(), String::new()];

        lines.push(IMPACTS_HEADING.to_string());
        match &self.impacts {
            ImpactSection::Entries(entries) => {
                for entry in entries {
                    lines.push(format!("  {}", entry.path));
                    for impact in entry.impacts {
                        lines.push(format!("    - {}", impact));
                    }
                }
            }
            ImpactSection::Placeholder(text) => lines.push(format!("  {}", text)),
        }

        lines.push(String::new());
        lines.push(REQUIREMENTS_HEADING.to_string());
        match &self.requirements {
            RequirementSection::Groups(groups) => {
                for group in groups {
                    lines.push(format!("  {}", group.title));
                    for item in group.items {
                        lines.push(format!("    - {}", item));
                    }
                }
            }
            RequirementSection::Placeholder(text) => lines.push(format!("  {}", text)),
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(value: serde_json::Value) -> AnalysisResults {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_analysis_renders_placeholders() {
        let results = results(json!({
            "ui_impacts": {},
            "compatibility_requirements": {},
            "status": "completed"
        }));
        let report = AnalysisReport::new(&results);

        assert!(!report.has_ui_impacts);
        assert!(!report.has_compatibility_requirements);
        assert_eq!(report.verdict(), VERDICT_NO_IMPACTS);
        assert_eq!(report.impacts, ImpactSection::Placeholder(NO_UI_CHANGES));
        assert_eq!(
            report.requirements,
            RequirementSection::Placeholder(NO_REQUIREMENTS)
        );

        let text = report.to_text();
        assert!(text.contains(NO_UI_CHANGES));
        assert!(text.contains(NO_REQUIREMENTS));
    }

    #[test]
    fn test_single_impact_renders_one_entry() {
        let results = results(json!({
            "ui_impacts": {"src/Foo.tsx": ["changed layout"]},
            "compatibility_requirements": {},
            "status": "completed"
        }));
        let report = AnalysisReport::new(&results);

        assert_eq!(report.verdict(), VERDICT_IMPACTS);
        match &report.impacts {
            ImpactSection::Entries(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, "src/Foo.tsx");
                assert_eq!(entries[0].impacts.to_vec(), vec!["changed layout".to_string()]);
            }
            other => panic!("expected entries, got {:?}", other),
        }
        assert!(!report.to_text().contains(NO_UI_CHANGES));
    }

    #[test]
    fn test_requirement_groups_skip_empty_categories() {
        let results = results(json!({
            "ui_impacts": {},
            "compatibility_requirements": {
                "system_versions": ["iOS 16+"],
                "screen_resolutions": [],
                "device_types": ["tablet", "phone"]
            },
            "status": "completed"
        }));
        let report = AnalysisReport::new(&results);

        assert!(report.has_compatibility_requirements);
        let RequirementSection::Groups(groups) = &report.requirements else {
            panic!("expected groups");
        };
        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["System Versions", "Device Types"]);
        assert_eq!(groups[1].items.len(), 2);

        // Requirements alone do not flip the verdict.
        assert_eq!(report.verdict(), VERDICT_NO_IMPACTS);
    }
}
