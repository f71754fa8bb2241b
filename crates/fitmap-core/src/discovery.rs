//! Search keywords and the declarative classification rule table.
//!
//! Each rule sets one attribute flag when any of its needles occurs in any
//! of its fields (search keyword, place name, provider category). Matching is
//! case-insensitive substring containment.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::facility::{FacilityAttributes, OpenState};
use crate::ConfigError;

/// Keywords searched on every aggregation run, in request order.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "헬스장",
    "피트니스",
    "요가",
    "필라테스",
    "수영장",
    "실내체육관",
    "공원",
    "산책로",
    "둘레길",
    "야외운동기구",
    "운동장",
];

const WALKING_NEEDLES: &[&str] = &["공원", "산책로", "길", "코스", "산책"];
const INDOOR_NEEDLES: &[&str] = &[
    "헬스", "피트니스", "요가", "필라테스", "수영", "실내", "gym", "fitness", "yoga", "pilates",
    "pool", "indoor",
];
const OUTDOOR_NEEDLES: &[&str] = &["공원", "야외", "산책로"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Keyword,
    Name,
    Category,
}

/// Attribute flag a rule can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAttribute {
    Free,
    Indoor,
    Course,
    Outdoor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRule {
    pub attribute: RuleAttribute,
    pub fields: Vec<MatchField>,
    pub needles: Vec<String>,
}

impl AttributeRule {
    fn new(attribute: RuleAttribute, fields: &[MatchField], needles: &[&str]) -> Self {
        Self {
            attribute,
            fields: fields.to_vec(),
            needles: needles.iter().map(|n| (*n).to_string()).collect(),
        }
    }

    /// Whether any needle occurs in any of this rule's fields.
    #[must_use]
    pub fn matches(&self, keyword: &str, name: &str, category: &str) -> bool {
        self.fields.iter().any(|field| {
            let haystack = match field {
                MatchField::Keyword => keyword,
                MatchField::Name => name,
                MatchField::Category => category,
            }
            .to_lowercase();
            self.needles
                .iter()
                .any(|needle| haystack.contains(&needle.to_lowercase()))
        })
    }
}

/// The built-in rule table.
#[must_use]
pub fn default_rules() -> Vec<AttributeRule> {
    use MatchField::{Category, Keyword, Name};

    vec![
        AttributeRule::new(
            RuleAttribute::Free,
            &[Keyword, Name, Category],
            WALKING_NEEDLES,
        ),
        AttributeRule::new(RuleAttribute::Indoor, &[Keyword], INDOOR_NEEDLES),
        AttributeRule::new(RuleAttribute::Course, &[Keyword, Name], WALKING_NEEDLES),
        AttributeRule::new(RuleAttribute::Outdoor, &[Keyword], OUTDOOR_NEEDLES),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryFile {
    pub keywords: Vec<String>,
    #[serde(default = "default_rules")]
    pub rules: Vec<AttributeRule>,
}

impl Default for DiscoveryFile {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            rules: default_rules(),
        }
    }
}

impl DiscoveryFile {
    /// Derive attribute flags for a place surfaced by `keyword`.
    ///
    /// Rules are evaluated independently; a flag is set if any rule for it
    /// matches. Opening hours are never known, so `open_now` is always
    /// [`OpenState::AssumedOpen`].
    #[must_use]
    pub fn classify(&self, keyword: &str, name: &str, category: &str) -> FacilityAttributes {
        let mut attributes = FacilityAttributes {
            open_now: OpenState::AssumedOpen,
            ..FacilityAttributes::default()
        };

        for rule in &self.rules {
            if !rule.matches(keyword, name, category) {
                continue;
            }
            match rule.attribute {
                RuleAttribute::Free => attributes.is_free = true,
                RuleAttribute::Indoor => attributes.is_indoor = true,
                RuleAttribute::Course => attributes.is_course = true,
                RuleAttribute::Outdoor => attributes.is_outdoor = true,
            }
        }

        attributes
    }
}

/// Load and validate a discovery file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_discovery(path: &Path) -> Result<DiscoveryFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DiscoveryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let discovery = parse_discovery(&content)?;
    tracing::debug!(
        path = %path.display(),
        keywords = discovery.keywords.len(),
        rules = discovery.rules.len(),
        "loaded discovery file"
    );
    Ok(discovery)
}

fn parse_discovery(content: &str) -> Result<DiscoveryFile, ConfigError> {
    let mut discovery: DiscoveryFile = serde_yaml::from_str(content)?;
    for keyword in &mut discovery.keywords {
        *keyword = keyword.trim().to_string();
    }
    validate_discovery(&discovery)?;
    Ok(discovery)
}

fn validate_discovery(discovery: &DiscoveryFile) -> Result<(), ConfigError> {
    if discovery.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one search keyword is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for keyword in &discovery.keywords {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Validation(
                "search keywords must be non-empty".to_string(),
            ));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate search keyword: '{keyword}'"
            )));
        }
    }

    for rule in &discovery.rules {
        if rule.fields.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule for {:?} must match at least one field",
                rule.attribute
            )));
        }
        if rule.needles.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule for {:?} must have at least one needle",
                rule.attribute
            )));
        }
        // A blank needle is contained in every string.
        if rule.needles.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "rule for {:?} has a blank needle",
                rule.attribute
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keyword_list_has_eleven_entries() {
        let discovery = DiscoveryFile::default();
        assert_eq!(discovery.keywords.len(), 11);
        assert!(validate_discovery(&discovery).is_ok());
    }

    #[test]
    fn park_keyword_is_free_course_and_outdoor() {
        let attrs = DiscoveryFile::default().classify("공원", "남산공원", "여행 > 공원");
        assert!(attrs.is_free);
        assert!(attrs.is_course);
        assert!(attrs.is_outdoor);
        assert!(!attrs.is_indoor);
        assert_eq!(attrs.open_now, OpenState::AssumedOpen);
    }

    #[test]
    fn gym_keyword_is_indoor_only() {
        let attrs = DiscoveryFile::default().classify(
            "헬스장",
            "스포애니 시청점",
            "스포츠,레저 > 스포츠시설 > 헬스클럽",
        );
        assert!(attrs.is_indoor);
        assert!(!attrs.is_free);
        assert!(!attrs.is_course);
        assert!(!attrs.is_outdoor);
    }

    #[test]
    fn category_match_sets_free_but_not_course() {
        // Only the category mentions a park; the course rule ignores categories.
        let attrs =
            DiscoveryFile::default().classify("운동장", "시민 운동장", "여행 > 공원 > 도시근린공원");
        assert!(attrs.is_free);
        assert!(!attrs.is_course);
    }

    #[test]
    fn indoor_matching_is_case_insensitive() {
        let attrs = DiscoveryFile::default().classify("Pilates Studio", "", "");
        assert!(attrs.is_indoor);
    }

    #[test]
    fn parses_keywords_with_default_rules() {
        let yaml = "keywords:\n  - 헬스장\n  - 공원\n";
        let discovery = parse_discovery(yaml).expect("valid discovery file");
        assert_eq!(discovery.keywords, vec!["헬스장", "공원"]);
        assert_eq!(discovery.rules, default_rules());
    }

    #[test]
    fn parses_custom_rules() {
        let yaml = r"
keywords: [클라이밍]
rules:
  - attribute: indoor
    fields: [keyword, name]
    needles: [클라이밍]
";
        let discovery = parse_discovery(yaml).expect("valid discovery file");
        assert_eq!(discovery.rules.len(), 1);
        assert!(discovery.classify("클라이밍", "", "").is_indoor);
        assert!(!discovery.classify("클라이밍", "", "").is_free);
    }

    #[test]
    fn rejects_empty_keyword_list() {
        let err = parse_discovery("keywords: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn rejects_duplicate_keywords() {
        let err = parse_discovery("keywords: [요가, 요가]\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
            "got {err:?}"
        );
    }

    #[test]
    fn rejects_rule_without_needles() {
        let yaml = r"
keywords: [요가]
rules:
  - attribute: free
    fields: [name]
    needles: ['  ']
";
        let err = parse_discovery(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn rejects_blank_needle_among_real_ones() {
        let yaml = r"
keywords: [헬스장]
rules:
  - attribute: free
    fields: [keyword, name]
    needles: [공원, '']
";
        let err = parse_discovery(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn rejects_rule_with_empty_needle_list() {
        let yaml = r"
keywords: [요가]
rules:
  - attribute: free
    fields: [name]
    needles: []
";
        let err = parse_discovery(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn keywords_are_trimmed_when_parsed() {
        let yaml = r"
keywords: [' 요가 ', 공원]
rules: []
";
        let discovery = parse_discovery(yaml).expect("valid discovery file");
        assert_eq!(discovery.keywords, vec!["요가", "공원"]);
    }

    #[test]
    fn shipped_discovery_file_matches_builtin_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(Path::parent)
            .expect("crate lives two levels below the workspace root")
            .join("config")
            .join("discovery.yaml");
        let discovery = load_discovery(&path).expect("failed to load config/discovery.yaml");
        assert_eq!(discovery, DiscoveryFile::default());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = parse_discovery("keywords: {").unwrap_err();
        assert!(matches!(err, ConfigError::DiscoveryFileParse(_)), "got {err:?}");
    }
}
