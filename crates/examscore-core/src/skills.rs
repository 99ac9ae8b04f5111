//! Skill-to-category mapping and skill-gap inference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{JobDescription, QuestionCategory};

/// Default proficiency a job requires for every skill, as a percentage.
pub const DEFAULT_REQUIRED_LEVEL: u32 = 70;

/// Maps a skill to a category when it contains any of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategoryRule {
    pub keywords: Vec<String>,
    pub category: QuestionCategory,
}

impl SkillCategoryRule {
    pub fn new(keywords: &[&str], category: QuestionCategory) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category,
        }
    }

    fn matches(&self, skill_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| skill_lower.contains(k.to_lowercase().as_str()))
    }
}

/// Ordered keyword rules; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategoryTable {
    rules: Vec<SkillCategoryRule>,
    #[serde(default)]
    fallback: QuestionCategory,
}

impl Default for SkillCategoryTable {
    fn default() -> Self {
        Self {
            rules: vec![
                SkillCategoryRule::new(&["javascript", "react", "node"], QuestionCategory::Technical),
                SkillCategoryRule::new(&["sql", "database"], QuestionCategory::Technical),
                SkillCategoryRule::new(&["css", "html"], QuestionCategory::Technical),
                SkillCategoryRule::new(&["problem", "logic"], QuestionCategory::Aptitude),
            ],
            fallback: QuestionCategory::General,
        }
    }
}

impl SkillCategoryTable {
    pub fn new(rules: Vec<SkillCategoryRule>) -> Self {
        Self {
            rules,
            fallback: QuestionCategory::General,
        }
    }

    /// The default table with `extra` rules consulted first.
    pub fn with_overrides(extra: Vec<SkillCategoryRule>) -> Self {
        let mut table = Self::default();
        let mut rules = extra;
        rules.append(&mut table.rules);
        table.rules = rules;
        table
    }

    pub fn rules(&self) -> &[SkillCategoryRule] {
        &self.rules
    }

    /// Category a skill is assessed under.
    pub fn categorize(&self, skill: &str) -> QuestionCategory {
        let lower = skill.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }
}

/// Severity of a skill gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapLevel {
    Critical,
    Important,
    NiceToHave,
}

impl GapLevel {
    fn for_level(current: u32) -> Self {
        if current < 50 {
            GapLevel::Critical
        } else if current < 70 {
            GapLevel::Important
        } else {
            GapLevel::NiceToHave
        }
    }
}

impl std::fmt::Display for GapLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapLevel::Critical => write!(f, "critical"),
            GapLevel::Important => write!(f, "important"),
            GapLevel::NiceToHave => write!(f, "nice_to_have"),
        }
    }
}

/// Shortfall between a candidate's level and a job's requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub level: GapLevel,
    pub current_level: u32,
    pub required_level: u32,
    pub gap: u32,
    pub recommendations: Vec<String>,
}

/// Find the job's required skills whose category performance falls short.
///
/// A skill mapped to a category with no performance data counts as 0%.
pub fn identify_skill_gaps(
    category_performance: &BTreeMap<QuestionCategory, u32>,
    job: &JobDescription,
    table: &SkillCategoryTable,
    required_level: u32,
) -> Vec<SkillGap> {
    job.required_skills
        .iter()
        .filter_map(|skill| {
            let category = table.categorize(skill);
            let current = category_performance.get(&category).copied().unwrap_or(0);
            (current < required_level).then(|| SkillGap {
                skill: skill.clone(),
                level: GapLevel::for_level(current),
                current_level: current,
                required_level,
                gap: required_level - current,
                recommendations: skill_recommendations(skill, current),
            })
        })
        .collect()
}

/// Study recommendations for a skill at the given level.
pub fn skill_recommendations(skill: &str, current_level: u32) -> Vec<String> {
    if current_level < 30 {
        vec![
            format!("Start with basic {skill} concepts and fundamentals"),
            "Practice with beginner-level exercises and tutorials".to_string(),
        ]
    } else if current_level < 60 {
        vec![
            format!("Focus on intermediate {skill} concepts"),
            "Work on practical projects to apply knowledge".to_string(),
        ]
    } else {
        vec![
            format!("Refine advanced {skill} techniques"),
            "Study best practices and optimization strategies".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(skills: &[&str]) -> JobDescription {
        JobDescription {
            id: "j1".into(),
            job_description_id: None,
            title: "Web Developer".into(),
            department: "Engineering".into(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn perf(entries: &[(QuestionCategory, u32)]) -> BTreeMap<QuestionCategory, u32> {
        entries.iter().copied().collect()
    }

    #[test]
    fn default_table_categorizes() {
        let table = SkillCategoryTable::default();
        assert_eq!(table.categorize("JavaScript (ES6)"), QuestionCategory::Technical);
        assert_eq!(table.categorize("Node.js"), QuestionCategory::Technical);
        assert_eq!(table.categorize("PostgreSQL"), QuestionCategory::Technical);
        assert_eq!(table.categorize("HTML5"), QuestionCategory::Technical);
        assert_eq!(table.categorize("Problem solving"), QuestionCategory::Aptitude);
        assert_eq!(table.categorize("Communication"), QuestionCategory::General);
    }

    #[test]
    fn overrides_take_precedence() {
        let table = SkillCategoryTable::with_overrides(vec![SkillCategoryRule::new(
            &["logical reasoning"],
            QuestionCategory::Technical,
        )]);
        assert_eq!(table.categorize("Logical reasoning"), QuestionCategory::Technical);
        assert_eq!(table.categorize("Logic puzzles"), QuestionCategory::Aptitude);
    }

    #[test]
    fn gap_requires_strictly_lower_level() {
        let table = SkillCategoryTable::default();
        let at_level = identify_skill_gaps(
            &perf(&[(QuestionCategory::Technical, 70)]),
            &job(&["React"]),
            &table,
            DEFAULT_REQUIRED_LEVEL,
        );
        assert!(at_level.is_empty());

        let below = identify_skill_gaps(
            &perf(&[(QuestionCategory::Technical, 69)]),
            &job(&["React"]),
            &table,
            DEFAULT_REQUIRED_LEVEL,
        );
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].level, GapLevel::Important);
        assert_eq!(below[0].gap, 1);
        assert_eq!(below[0].recommendations[0], "Refine advanced React techniques");
    }

    #[test]
    fn missing_category_counts_as_zero() {
        let gaps = identify_skill_gaps(
            &perf(&[(QuestionCategory::Technical, 90)]),
            &job(&["Teamwork", "SQL"]),
            &SkillCategoryTable::default(),
            DEFAULT_REQUIRED_LEVEL,
        );
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].skill, "Teamwork");
        assert_eq!(gaps[0].current_level, 0);
        assert_eq!(gaps[0].level, GapLevel::Critical);
        assert_eq!(gaps[0].gap, 70);
        assert!(gaps[0].recommendations[0].starts_with("Start with basic Teamwork"));
    }

    #[test]
    fn nice_to_have_above_seventy() {
        let gaps = identify_skill_gaps(
            &perf(&[(QuestionCategory::Aptitude, 75)]),
            &job(&["Logic"]),
            &SkillCategoryTable::default(),
            90,
        );
        assert_eq!(gaps[0].level, GapLevel::NiceToHave);
        assert_eq!(gaps[0].gap, 15);
    }

    #[test]
    fn recommendation_bands() {
        assert!(skill_recommendations("CSS", 29)[0].starts_with("Start with basic"));
        assert!(skill_recommendations("CSS", 30)[0].starts_with("Focus on intermediate"));
        assert!(skill_recommendations("CSS", 59)[0].starts_with("Focus on intermediate"));
        assert!(skill_recommendations("CSS", 60)[0].starts_with("Refine advanced"));
    }

    #[test]
    fn table_parses_from_toml() {
        let toml_str = r#"
[[rules]]
keywords = ["rust", "go"]
category = "technical"
"#;
        let table: SkillCategoryTable = toml::from_str(toml_str).unwrap();
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.categorize("Rust"), QuestionCategory::Technical);
        assert_eq!(table.categorize("JavaScript"), QuestionCategory::General);
    }
}
