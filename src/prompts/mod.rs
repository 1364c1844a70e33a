//! Prompt Builder
//!
//! Turns a request's parameters into the instruction text sent to a model.
//! Every template pins an output format (numbered lines, no markdown, line
//! caps) that a matching function in [`crate::parser`] depends on, so a
//! template and its parser change together.
//!
//! Free-text fields are interpolated verbatim. Blank required fields are
//! rejected by the request handlers before a prompt is ever built.

mod chat;
mod formula;
mod medbill;
mod username;

pub use chat::ChatMode;
pub use formula::{FormulaPrompts, FormulaQuery, build_formula_prompts};
pub use medbill::DISCLAIMER;
pub use username::{Gender, UsernameQuery};

/// Subject id that switches formula prompts to formulas-only output.
pub const MATHEMATICS_SUBJECT: &str = "mathematics";

/// Which template to render, with its substitution values.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptSpec {
    ImportantFormulas(FormulaQuery),
    AllFormulas(FormulaQuery),
    Usernames(UsernameQuery),
    BillAnalysis { bill_content: String },
    BillImageExtraction,
    ChatSystem(ChatMode),
}

impl PromptSpec {
    /// Template identifier.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ImportantFormulas(_) => "important-formulas",
            Self::AllFormulas(_) => "all-formulas",
            Self::Usernames(_) => "username-list",
            Self::BillAnalysis { .. } => "bill-analysis",
            Self::BillImageExtraction => "bill-image-extraction",
            Self::ChatSystem(_) => "chat-system",
        }
    }
}

/// Render a single prompt.
pub fn build(spec: &PromptSpec) -> String {
    match spec {
        PromptSpec::ImportantFormulas(query) => formula::important_prompt(query),
        PromptSpec::AllFormulas(query) => formula::all_prompt(query),
        PromptSpec::Usernames(query) => username::prompt(query),
        PromptSpec::BillAnalysis { bill_content } => medbill::analysis_prompt(bill_content),
        PromptSpec::BillImageExtraction => medbill::IMAGE_EXTRACTION_PROMPT.to_string(),
        PromptSpec::ChatSystem(mode) => mode.system_prompt().to_string(),
    }
}
