//! Formula templates: the "important" list (with explanations, except for
//! mathematics) and the comprehensive "all formulas" list.

use super::{MATHEMATICS_SUBJECT, PromptSpec, build};

/// Parameters of a formula request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaQuery {
    pub topic: String,
    /// Subject id, e.g. `mathematics` or `physics`
    pub subject: String,
    /// Exam id, e.g. `jee`
    pub exam: String,
    /// Display name of the subject
    pub subject_name: String,
    /// Display name of the exam level
    pub exam_name: String,
}

impl FormulaQuery {
    pub fn is_mathematics(&self) -> bool {
        self.subject.trim().eq_ignore_ascii_case(MATHEMATICS_SUBJECT)
    }
}

/// The two prompts the formula route issues together, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaPrompts {
    pub important: String,
    pub all: String,
}

impl FormulaPrompts {
    pub fn into_vec(self) -> Vec<String> {
        vec![self.important, self.all]
    }
}

pub fn build_formula_prompts(query: &FormulaQuery) -> FormulaPrompts {
    FormulaPrompts {
        important: build(&PromptSpec::ImportantFormulas(query.clone())),
        all: build(&PromptSpec::AllFormulas(query.clone())),
    }
}

fn header(role: &str, query: &FormulaQuery) -> String {
    format!(
        "You are FormulaGPT, {role}.\n\nSubject: {}\nExam Level: {}\nTopic: {}\n",
        query.subject_name, query.exam_name, query.topic
    )
}

pub(super) fn important_prompt(query: &FormulaQuery) -> String {
    if query.is_mathematics() {
        return format!(
            r#"{}
Give the MOST IMPORTANT mathematics formulas for this topic.

CRITICAL: For Mathematics, give ONLY formulas, NO explanations, NO variable descriptions.

FORMAT:
1. Formula only (one line)
2. Formula only (one line)
3. Formula only (one line)

EXAMPLE:
1. (a + b)² = a² + 2ab + b²
2. (a - b)² = a² - 2ab + b²
3. a² - b² = (a + b)(a - b)

RULES:
1. Give 10-15 MOST IMPORTANT formulas only
2. Each formula on ONE line only
3. NO explanations, NO "where", NO variable descriptions
4. Number each formula (1. 2. 3.)
5. ONLY pure formulas
6. NO markdown formatting

Generate formulas now:
"#,
            header("an expert mathematics formula provider", query)
        );
    }

    format!(
        r#"{}
Your job is to give the MOST IMPORTANT formulas with clear explanations.

FORMAT - MUST FOLLOW EXACTLY:
For each formula, provide TWO lines:
Line 1: The numbered formula itself (clean, no explanations)
Line 2: where [explain each variable clearly]

EXAMPLE:
1. v = u + at
where v is final velocity, u is initial velocity, a is acceleration, t is time

2. s = ut + 0.5at²
where s is displacement, u is initial velocity, t is time, a is acceleration

RULES:
1. Give 8-12 MOST IMPORTANT formulas only
2. Each formula must have TWO lines: formula then explanation
3. Use "where" to start the explanation line
4. Number each formula (1. 2. 3.)
5. Keep explanations simple and student-friendly
6. NO markdown, NO bullets, NO fancy formatting
7. Focus on exam-critical formulas only

Generate the most important formulas now:
"#,
        header(
            "an expert academic formula provider for JEE, NEET, board exams, and general math and science",
            query
        )
    )
}

pub(super) fn all_prompt(query: &FormulaQuery) -> String {
    format!(
        r#"{}
Give ALL possible formulas for this topic (comprehensive list).

RULES:
1. List ALL formulas related to this topic (15-25 formulas)
2. Each formula on ONE line only
3. NO explanations, NO variable descriptions
4. Number each formula (1. 2. 3.)
5. Include basic, intermediate, and advanced formulas
6. Include derived formulas and special cases
7. NO markdown formatting

EXAMPLE FORMAT:
1. v = u + at
2. s = ut + 0.5at²
3. v² = u² + 2as

Generate ALL formulas now:
"#,
        header("an expert academic formula provider", query)
    )
}
