//! Onboarding answers.

use serde::{Deserialize, Serialize};

/// Everything the onboarding chat collects. `is_complete` gates routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingData {
    pub company_description: String,
    pub team_size: String,
    pub team_roles: Vec<String>,
    pub quarterly_goals: Vec<String>,
    pub systems: Vec<String>,
    pub docs_links: Vec<String>,
    pub pain_points: Vec<String>,
    pub is_complete: bool,
}

/// Partial update merged into [`OnboardingData`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingPatch {
    pub company_description: Option<String>,
    pub team_size: Option<String>,
    pub team_roles: Option<Vec<String>>,
    pub quarterly_goals: Option<Vec<String>>,
    pub systems: Option<Vec<String>>,
    pub docs_links: Option<Vec<String>>,
    pub pain_points: Option<Vec<String>>,
    pub is_complete: Option<bool>,
}

impl OnboardingData {
    pub fn apply(&mut self, patch: OnboardingPatch) {
        if let Some(v) = patch.company_description {
            self.company_description = v;
        }
        if let Some(v) = patch.team_size {
            self.team_size = v;
        }
        if let Some(v) = patch.team_roles {
            self.team_roles = v;
        }
        if let Some(v) = patch.quarterly_goals {
            self.quarterly_goals = v;
        }
        if let Some(v) = patch.systems {
            self.systems = v;
        }
        if let Some(v) = patch.docs_links {
            self.docs_links = v;
        }
        if let Some(v) = patch.pain_points {
            self.pain_points = v;
        }
        if let Some(v) = patch.is_complete {
            self.is_complete = v;
        }
    }
}

/// Split a free-text answer on commas, trimming and dropping empty items.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut data = OnboardingData {
            company_description: "Acme".into(),
            systems: vec!["SFDC".into()],
            ..Default::default()
        };
        data.apply(OnboardingPatch {
            quarterly_goals: Some(vec!["NDR 120%".into()]),
            ..Default::default()
        });
        assert_eq!(data.company_description, "Acme");
        assert_eq!(data.systems, vec!["SFDC"]);
        assert_eq!(data.quarterly_goals, vec!["NDR 120%"]);
        assert!(!data.is_complete);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" HubSpot, Gainsight ,,Tableau, "),
            vec!["HubSpot", "Gainsight", "Tableau"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_camel_case_fields() {
        let json = serde_json::to_value(OnboardingData::default()).unwrap();
        assert!(json.get("companyDescription").is_some());
        assert!(json.get("isComplete").is_some());
    }
}
