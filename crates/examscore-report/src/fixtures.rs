use examscore_core::model::{
    AiEvaluation, Candidate, Difficulty, EvaluationDetails, EvaluationStatus, ExamResult,
    ExamSession, Feedback, JobDescription, McqOption, Question, QuestionCategory, QuestionType,
    Response, SessionStatus,
};
use examscore_core::report::{build_report, Report, ReportConfig, SessionRecords};
use examscore_core::skills::SkillCategoryTable;

fn question(id: &str, kind: QuestionType, category: QuestionCategory, points: u32) -> Question {
    Question {
        id: id.into(),
        question_text: format!("Is <b>{id}</b> & co. escaped?"),
        question_type: kind,
        question_category: category,
        difficulty_level: Difficulty::Hard,
        points,
        correct_answer: Some("B".into()),
        mcq_options: vec![McqOption {
            option: "B".into(),
            text: "Yes".into(),
        }],
        answer_explanation: None,
    }
}

fn response(q: Question, earned: u32, correct: bool) -> Response {
    Response {
        id: format!("r-{}", q.id),
        question_id: q.id.clone(),
        exam_session_id: "s1".into(),
        answer_text: Some("B".into()),
        time_taken_seconds: Some(25),
        is_correct: correct,
        points_earned: earned,
        evaluation_details: None,
        question: Some(q),
        submitted_at: None,
    }
}

pub(crate) fn sample_report() -> Report {
    let mut text = response(
        question("t1", QuestionType::Text, QuestionCategory::Technical, 5),
        2,
        false,
    );
    text.evaluation_details = Some(EvaluationDetails {
        ai_evaluation: Some(AiEvaluation {
            ai_confidence: Some(0.8),
            feedback: Some(Feedback {
                overall: "Covers the basics".into(),
                ..Default::default()
            }),
        }),
        ..Default::default()
    });

    let records = SessionRecords {
        session: ExamSession {
            id: "s1".into(),
            candidate_id: "c1".into(),
            job_description_id: "j1".into(),
            exam_token: "tok".into(),
            status: SessionStatus::Completed,
            duration_minutes: 30,
            total_questions: 3,
            started_at: None,
            completed_at: None,
            adaptive_questions_added: 0,
            max_adaptive_questions: 0,
        },
        responses: vec![
            response(
                question("q1", QuestionType::Mcq, QuestionCategory::Technical, 2),
                2,
                true,
            ),
            response(
                question("q2", QuestionType::Mcq, QuestionCategory::Aptitude, 3),
                0,
                false,
            ),
            text,
        ],
        result: ExamResult {
            id: "res1".into(),
            exam_session_id: "s1".into(),
            candidate_id: "c1".into(),
            total_score: 4,
            max_score: 10,
            percentage: 40.0,
            correct_answers: 1,
            wrong_answers: 2,
            skipped_questions: 0,
            technical_score: 4,
            aptitude_score: 0,
            time_taken_minutes: Some(12),
            evaluation_status: EvaluationStatus::Failed,
            ai_evaluation: None,
            text_evaluation_summary: None,
            hiring_recommendations: None,
            created_at: None,
        },
        candidate: Candidate {
            id: "c1".into(),
            candidate_id: None,
            name: "Ada <Lovelace>".into(),
            email: "ada@example.com".into(),
            phone: None,
        },
        job_description: JobDescription {
            id: "j1".into(),
            job_description_id: None,
            title: "Backend Engineer".into(),
            department: "Engineering".into(),
            required_skills: vec!["SQL".into(), "Problem solving".into()],
        },
    };

    let mut report = build_report(records, &ReportConfig::default(), &SkillCategoryTable::default());
    report.id = uuid::Uuid::nil();
    report
}
