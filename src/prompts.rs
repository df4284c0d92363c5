//! Prompts for the vision-LLM OCR engine.
//!
//! Kept apart from [`crate::pipeline::vision`] so the wording can change
//! without touching retry or timeout handling, and so tests can inspect it.

use crate::language::OcrLanguages;

/// System prompt for transcribing a page image to plain text.
pub const OCR_SYSTEM_PROMPT: &str = r#"You are a precise OCR engine. Transcribe ALL text visible in the image.

Rules:
1. Output plain text only. No Markdown, no code fences, no commentary.
2. Preserve the reading order a human would use. Urdu is read right to left.
3. Keep line breaks between paragraphs; join lines broken only by the layout.
4. Do not translate, summarise, or correct wording.
5. If the image contains no text, output nothing."#;

/// User-turn text naming the expected languages.
pub fn language_hint(languages: &OcrLanguages) -> String {
    format!(
        "The text on this page is in: {}. Transcribe it in its original script.",
        languages
    )
}
