//! Narration script — the text handed to the speech service.

use crate::catalog::Language;
use crate::guidance::GuidanceResult;

/// Spoken lead-in between the summary and the checklist items.
fn next_steps_lead_in(language: Language) -> &'static str {
    match language {
        Language::En => "Here are your next steps:",
        Language::Es => "Estos son tus próximos pasos:",
        Language::Zh => "以下是您的后续步骤：",
        Language::Fr => "Voici vos prochaines étapes :",
        Language::Ar => "إليك خطواتك التالية:",
    }
}

/// Build the full text to synthesize: the summary, a blank line, the
/// localized lead-in, then the checklist items joined with sentence breaks.
pub fn narration_script(result: &GuidanceResult, language: Language) -> String {
    format!(
        "{}\n\n{} {}",
        result.summary_text,
        next_steps_lead_in(language),
        result.checklist_items.join(". ")
    )
}
