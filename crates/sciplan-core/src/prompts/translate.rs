//! Translation prompt used by the video tab when a curriculum element is not
//! in the static term table.

use crate::render::render_template;

pub const TRANSLATION_PROMPT: &str = r#"다음 텍스트를 {{targetLanguage}}로 번역해주세요. 과학 교육과 관련된 내용이므로 교육적 맥락을 고려해서 번역해주세요.

원문: "{{text}}"

번역된 텍스트만 답변해주세요.
"#;

/// Bind the translation prompt. `target_language` is the human-readable
/// language name inserted into the instruction (e.g. `영어`).
pub fn translation_prompt(text: &str, target_language: &str) -> String {
    render_template(
        TRANSLATION_PROMPT,
        &[("text", text), ("targetLanguage", target_language)],
    )
}
