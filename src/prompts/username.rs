//! Username template.

use serde::Deserialize;

/// Style hint applied to generated usernames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Neutral,
}

impl Gender {
    fn style_line(&self) -> &'static str {
        match self {
            Self::Male => "- Lean towards a masculine vibe (strong, bold, edgy words)",
            Self::Female => "- Lean towards a feminine vibe (soft, elegant, dreamy words)",
            Self::Neutral => "- Keep the vibe gender-neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameQuery {
    pub keyword: String,
    /// Platform id, e.g. `instagram`. Blank means general use.
    pub platform: String,
    pub platform_rules: String,
    pub gender: Gender,
    pub count: usize,
}

impl UsernameQuery {
    fn platform_label(&self) -> &str {
        let platform = self.platform.trim();
        if platform.is_empty() {
            "general use"
        } else {
            platform
        }
    }
}

fn platform_style(platform: &str) -> &'static str {
    match platform.trim().to_ascii_lowercase().as_str() {
        "instagram" => {
            "- Use dots and underscores strategically\n- Keep it aesthetic and memorable\n- Mix of clean and stylized names"
        }
        "twitter" | "x" => {
            "- Concise and professional\n- Avoid special characters\n- Easy to type and remember"
        }
        "tiktok" => {
            "- Fun and trendy\n- Numbers work well (like 404, 777)\n- Creative combinations"
        }
        "youtube" => "- Brandable and searchable\n- Clean and simple\n- Easy to pronounce",
        "twitch" => "- Gaming-focused terms\n- Edgy and memorable\n- Underscores allowed",
        "discord" => "- Casual and friendly\n- Creative freedom\n- Can use most characters",
        "linkedin" => "- Professional tone\n- Real name variations\n- Clean and simple",
        _ => "- Versatile and easy to remember\n- Works across most platforms",
    }
}

pub(super) fn prompt(query: &UsernameQuery) -> String {
    let platform = query.platform_label();
    format!(
        r#"Generate {count} creative, modern, aesthetic, unique usernames for {platform}.

Platform: {platform}
Platform Rules: {rules}

Base keyword: "{keyword}"

Style Requirements based on platform:
{style}
{gender}

General Mix (include variety):
- Clean simple names
- Aesthetic minimal names
- Names with strategic symbols (dots, underscores)
- Names with stylistic variations
- At least one unique creative combination

Rules:
- Must look human-creative and trendy
- NOT random character spam
- Platform-appropriate
- Return ONLY the usernames
- Exactly {count} lines, one username per line
- Number each line (1. 2. 3.)
- No explanations
- No markdown
"#,
        count = query.count,
        platform = platform,
        rules = query.platform_rules,
        keyword = query.keyword,
        style = platform_style(platform),
        gender = query.gender.style_line(),
    )
}
