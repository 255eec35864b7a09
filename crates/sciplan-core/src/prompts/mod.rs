//! Prompt templates for the generation relay.
//!
//! Templates are `{{name}}` mustache strings rendered through
//! [`crate::render::render_template`]; each has a build helper that binds the
//! caller's data.

mod experiment;
mod template;
mod translate;

pub use experiment::{
    experiment_design_prompt, experiment_revision_prompt, EXPERIMENT_DESIGN_PROMPT,
    EXPERIMENT_REVISION_PROMPT,
};
pub use template::{
    student_report_template_prompt, template_revision_prompt, STUDENT_REPORT_TEMPLATE_PROMPT,
    TEMPLATE_REVISION_PROMPT,
};
pub use translate::{translation_prompt, TRANSLATION_PROMPT};
