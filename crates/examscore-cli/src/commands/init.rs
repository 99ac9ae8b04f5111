//! The `examscore init` command.

use std::path::Path;

use anyhow::Result;

const STARTER_FILES: &[(&str, &str)] = &[
    ("examscore.toml", SAMPLE_CONFIG),
    ("question-banks/example.toml", EXAMPLE_BANK),
    ("question-banks/example-answers.json", EXAMPLE_ANSWERS),
    ("data/exam-data.json", EXAMPLE_DATA),
];

pub fn execute() -> Result<()> {
    for (path, content) in STARTER_FILES {
        let path = Path::new(path);
        if path.exists() {
            println!("{} already exists, skipping.", path.display());
            continue;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }

    println!("\nNext steps:");
    println!("  1. Point [store] in examscore.toml at your exam data export");
    println!("  2. Run: examscore validate --questions question-banks/example.toml");
    println!(
        "  3. Run: examscore evaluate --questions question-banks/example.toml --answers question-banks/example-answers.json"
    );
    println!("  4. Run: examscore report --session all --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examscore configuration

parallelism = 4
output_dir = "./examscore-reports"

[store]
type = "json"
path = "data/exam-data.json"

[evaluation]
case_sensitive = false
allow_partial_credit = false
enable_fuzzy_matching = false
fuzzy_threshold = 0.9

[report]
required_level = 70
strength_threshold = 80
weakness_threshold = 50
hire_threshold = 70.0
interview_threshold = 50.0
pass_threshold = 60.0

# Extra skill rules are checked before the built-in ones.
[[skills]]
keywords = ["estimation", "numeracy"]
category = "aptitude"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Screening"
description = "A short backend screening exam to get started"

[[questions]]
id = "q1"
text = "What is the time complexity of binary search on a sorted array?"
category = "technical"
difficulty = "easy"
points = 2
correct_answer = "B"
options = [
    { option = "A", text = "O(n)" },
    { option = "B", text = "O(log n)" },
    { option = "C", text = "O(n log n)" },
    { option = "D", text = "O(1)" },
]

[[questions]]
id = "q2"
text = "Which join returns only rows with matching keys in both tables?"
category = "technical"
difficulty = "medium"
points = 2
correct_answer = "C"
explanation = "An inner join drops rows without a match on either side."
options = [
    { option = "A", text = "LEFT JOIN" },
    { option = "B", text = "RIGHT JOIN" },
    { option = "C", text = "INNER JOIN" },
    { option = "D", text = "CROSS JOIN" },
]

[[questions]]
id = "q3"
text = "What comes next in the sequence 2, 6, 12, 20, ...?"
category = "aptitude"
difficulty = "medium"
points = 3
correct_answer = "B"
options = [
    { option = "A", text = "28" },
    { option = "B", text = "30" },
    { option = "C", text = "32" },
    { option = "D", text = "36" },
]

[[questions]]
id = "q4"
text = "Three workers build a wall in 6 hours. How long do six workers take?"
category = "aptitude"
difficulty = "hard"
points = 3
correct_answer = "B"
options = [
    { option = "A", text = "2 hours" },
    { option = "B", text = "3 hours" },
    { option = "C", text = "4 hours" },
    { option = "D", text = "12 hours" },
]

[[questions]]
id = "t1"
text = "Describe how you would rate-limit a public HTTP API."
type = "text"
category = "technical"
difficulty = "hard"
points = 5
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "session_id": "walkthrough",
  "duration_minutes": 30,
  "answers": {
    "q1": " b ",
    "q2": "inner join",
    "q3": "32",
    "q4": "3 hours",
    "t1": "A token bucket per API key, stored in Redis."
  },
  "time_taken_seconds": { "q1": 12, "q2": 25, "q3": 40, "q4": 31 }
}
"#;

const EXAMPLE_DATA: &str = r#"{
  "sessions": [
    {
      "id": "session-001",
      "candidate_id": "cand-001",
      "job_description_id": "job-001",
      "exam_token": "tok-001",
      "status": "completed",
      "duration_minutes": 30,
      "total_questions": 5,
      "started_at": "2024-05-02T09:00:00Z",
      "completed_at": "2024-05-02T09:24:00Z"
    },
    {
      "id": "session-002",
      "candidate_id": "cand-002",
      "job_description_id": "job-001",
      "exam_token": "tok-002",
      "status": "completed",
      "duration_minutes": 30,
      "total_questions": 5,
      "started_at": "2024-05-03T14:00:00Z",
      "completed_at": "2024-05-03T14:29:00Z"
    }
  ],
  "questions": [
    { "id": "q1", "question_text": "What is the time complexity of binary search on a sorted array?",
      "question_type": "mcq", "question_category": "technical", "difficulty_level": "easy", "points": 2,
      "correct_answer": "B",
      "mcq_options": [ { "option": "A", "text": "O(n)" }, { "option": "B", "text": "O(log n)" } ] },
    { "id": "q2", "question_text": "Which join returns only rows with matching keys in both tables?",
      "question_type": "mcq", "question_category": "technical", "difficulty_level": "medium", "points": 2,
      "correct_answer": "C",
      "mcq_options": [ { "option": "A", "text": "LEFT JOIN" }, { "option": "C", "text": "INNER JOIN" } ] },
    { "id": "q3", "question_text": "What comes next in the sequence 2, 6, 12, 20, ...?",
      "question_type": "mcq", "question_category": "aptitude", "difficulty_level": "medium", "points": 3,
      "correct_answer": "B",
      "mcq_options": [ { "option": "A", "text": "28" }, { "option": "B", "text": "30" } ] },
    { "id": "q4", "question_text": "Three workers build a wall in 6 hours. How long do six workers take?",
      "question_type": "mcq", "question_category": "aptitude", "difficulty_level": "hard", "points": 3,
      "correct_answer": "B",
      "mcq_options": [ { "option": "A", "text": "2 hours" }, { "option": "B", "text": "3 hours" } ] },
    { "id": "t1", "question_text": "Describe how you would rate-limit a public HTTP API.",
      "question_type": "text", "question_category": "technical", "difficulty_level": "hard", "points": 5 }
  ],
  "responses": [
    { "id": "r-001-q1", "question_id": "q1", "exam_session_id": "session-001", "answer_text": "B",
      "time_taken_seconds": 20, "is_correct": true, "points_earned": 2 },
    { "id": "r-001-q2", "question_id": "q2", "exam_session_id": "session-001", "answer_text": "INNER JOIN",
      "time_taken_seconds": 35, "is_correct": true, "points_earned": 2 },
    { "id": "r-001-q3", "question_id": "q3", "exam_session_id": "session-001", "answer_text": "B",
      "time_taken_seconds": 60, "is_correct": true, "points_earned": 3 },
    { "id": "r-001-q4", "question_id": "q4", "exam_session_id": "session-001", "answer_text": "A",
      "time_taken_seconds": 45, "is_correct": false, "points_earned": 0 },
    { "id": "r-001-t1", "question_id": "t1", "exam_session_id": "session-001",
      "answer_text": "Token bucket per API key, with limits kept in a shared cache.",
      "time_taken_seconds": 300, "is_correct": false, "points_earned": 4,
      "evaluation_details": { "ai_evaluation": { "ai_confidence": 0.85,
        "feedback": { "overall": "Solid design, misses burst handling.",
                      "strengths": ["Clear algorithm choice"], "weaknesses": ["No burst handling"],
                      "suggestions": ["Discuss sliding windows"] } } } },
    { "id": "r-002-q1", "question_id": "q1", "exam_session_id": "session-002", "answer_text": "A",
      "time_taken_seconds": 15, "is_correct": false, "points_earned": 0 },
    { "id": "r-002-q2", "question_id": "q2", "exam_session_id": "session-002", "answer_text": "C",
      "time_taken_seconds": 50, "is_correct": true, "points_earned": 2 },
    { "id": "r-002-q3", "question_id": "q3", "exam_session_id": "session-002", "answer_text": "A",
      "time_taken_seconds": 70, "is_correct": false, "points_earned": 0 },
    { "id": "r-002-q4", "question_id": "q4", "exam_session_id": "session-002", "answer_text": "",
      "time_taken_seconds": 5, "is_correct": false, "points_earned": 0 },
    { "id": "r-002-t1", "question_id": "t1", "exam_session_id": "session-002",
      "answer_text": "Return 429 when busy.",
      "time_taken_seconds": 120, "is_correct": false, "points_earned": 1,
      "evaluation_details": { "ai_evaluation": { "ai_confidence": 0.6 } } }
  ],
  "results": [
    { "id": "res-001", "exam_session_id": "session-001", "candidate_id": "cand-001",
      "total_score": 11, "max_score": 15, "percentage": 73.33,
      "correct_answers": 3, "wrong_answers": 2, "skipped_questions": 0,
      "technical_score": 8, "aptitude_score": 3, "time_taken_minutes": 24,
      "evaluation_status": "passed",
      "hiring_recommendations": {
        "hiring_decision": { "recommendation": "hire", "confidence": 0.8,
                             "reasoning": "Strong fundamentals and a sound system design answer." },
        "interview_focus": ["rate limiting under burst load"] } },
    { "id": "res-002", "exam_session_id": "session-002", "candidate_id": "cand-002",
      "total_score": 3, "max_score": 15, "percentage": 20.0,
      "correct_answers": 1, "wrong_answers": 4, "skipped_questions": 0,
      "technical_score": 3, "aptitude_score": 0, "time_taken_minutes": 29,
      "evaluation_status": "failed" }
  ],
  "candidates": [
    { "id": "cand-001", "name": "Grace Hopper", "email": "grace@example.com" },
    { "id": "cand-002", "name": "Alan Turing", "email": "alan@example.com", "phone": "+44 20 7946 0000" }
  ],
  "job_descriptions": [
    { "id": "job-001", "title": "Backend Engineer", "department": "Engineering",
      "required_skills": ["SQL", "Problem solving", "Communication"] }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use examscore_core::parser::{parse_question_bank_str, validate_question_bank};

    #[test]
    fn example_bank_is_valid() {
        let bank = parse_question_bank_str(EXAMPLE_BANK, Path::new("example.toml")).unwrap();
        assert_eq!(bank.questions.len(), 5);
        assert_eq!(bank.total_points(), 15);
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn sample_data_parses() {
        let dataset = examscore_store::Dataset::from_json_str(EXAMPLE_DATA).unwrap();
        assert_eq!(dataset.sessions.len(), 2);
        assert!(dataset.responses.iter().all(|r| r.question.is_some()));
    }

    #[test]
    fn sample_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examscore.toml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();
        let config = examscore_store::config::load_config_from(Some(&path)).unwrap();
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.skills.len(), 1);
        assert_eq!(config.report.pass_threshold, 60.0);
    }

    #[test]
    fn sample_answers_are_a_sheet() {
        let value: serde_json::Value = serde_json::from_str(EXAMPLE_ANSWERS).unwrap();
        assert_eq!(value["answers"].as_object().unwrap().len(), 5);
    }
}
