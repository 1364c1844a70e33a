use serde::Deserialize;

/// System prompt flavour of the chat route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Eli5,
    #[default]
    #[serde(other)]
    Simple,
}

const SIMPLE_SYSTEM_PROMPT: &str = "You are SimpGPT.
Explain topics in simple clear language.
Always answer in short numbered lines.
Do not use emojis or markdown.";

const ELI5_SYSTEM_PROMPT: &str = "You explain any topic like speaking to a 5 year old child.
Use very simple words.
Always reply in short numbered lines.
No emojis. No markdown.";

impl ChatMode {
    pub const fn system_prompt(&self) -> &'static str {
        match self {
            Self::Simple => SIMPLE_SYSTEM_PROMPT,
            Self::Eli5 => ELI5_SYSTEM_PROMPT,
        }
    }
}
