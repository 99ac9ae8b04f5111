pub mod evaluate;
pub mod init;
pub mod report;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use examscore_core::model::QuestionBank;
use examscore_core::parser;

/// Load a single bank file, or every bank under a directory.
pub(crate) fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        parser::load_bank_directory(path)
    } else {
        Ok(vec![parser::parse_question_bank(path)?])
    }
}
