//! Shared data types: curriculum selection, form data, generated content, videos.
//!
//! The store owns one instance of each slot; tab controllers only read clones.
//! Field names serialize in camelCase to match the relay wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One chat turn sent to the generation relay. Only the last `user` turn is
/// forwarded to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The school-level/grade-band/subject/unit/content-element tuple driving
/// prompt construction and video search.
///
/// Invariant: changing a shallower field clears every deeper field. Use the
/// `select_*` methods rather than writing fields directly when cascading
/// semantics matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSelection {
    pub school_level: Option<String>,
    pub grade_group: Option<String>,
    pub subject: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub selected_elements: Vec<String>,
}

impl CurriculumSelection {
    /// Set the school level and clear grade band, subject, unit, and elements.
    pub fn select_school_level(&mut self, school_level: impl Into<String>) {
        self.school_level = Some(school_level.into());
        self.grade_group = None;
        self.subject = None;
        self.unit = None;
        self.selected_elements.clear();
    }

    /// Set the grade band and clear subject, unit, and elements.
    pub fn select_grade_group(&mut self, grade_group: impl Into<String>) {
        self.grade_group = Some(grade_group.into());
        self.subject = None;
        self.unit = None;
        self.selected_elements.clear();
    }

    /// Set the subject and clear unit and elements.
    pub fn select_subject(&mut self, subject: impl Into<String>) {
        self.subject = Some(subject.into());
        self.unit = None;
        self.selected_elements.clear();
    }

    /// Set the unit and clear elements.
    pub fn select_unit(&mut self, unit: impl Into<String>) {
        self.unit = Some(unit.into());
        self.selected_elements.clear();
    }

    /// Toggle a content element. Removing keeps the insertion order of the
    /// remaining elements; toggling twice restores the original list.
    pub fn toggle_element(&mut self, element: &str) {
        if let Some(pos) = self.selected_elements.iter().position(|e| e == element) {
            self.selected_elements.remove(pos);
        } else {
            self.selected_elements.push(element.to_string());
        }
    }

    /// True when school level, grade band, subject, and unit are all chosen.
    /// Content elements are not required; the video tab falls back to a
    /// generic query when none are selected.
    pub fn is_complete(&self) -> bool {
        fn set(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.trim().is_empty())
        }
        set(&self.school_level) && set(&self.grade_group) && set(&self.subject) && set(&self.unit)
    }
}

/// Teacher-entered free text, independent of the curriculum selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub experiment_topic: String,
    #[serde(default)]
    pub teacher_intent: String,
    /// Derived from an uploaded reference document; empty when none was given.
    #[serde(default)]
    pub reference_content: String,
}

/// Curriculum selection and form fields merged at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    pub school_level: String,
    pub grade_group: String,
    pub subject: String,
    pub unit: String,
    #[serde(default)]
    pub selected_elements: Vec<String>,
    #[serde(default)]
    pub experiment_topic: String,
    #[serde(default)]
    pub teacher_intent: String,
    #[serde(default)]
    pub reference_content: String,
}

impl SubmissionForm {
    /// Reject submissions with an incomplete curriculum or no content elements.
    /// These never reach the relay.
    pub fn validate(&self) -> CoreResult<()> {
        if self.school_level.trim().is_empty()
            || self.grade_group.trim().is_empty()
            || self.subject.trim().is_empty()
            || self.unit.trim().is_empty()
        {
            return Err(CoreError::Validation(
                "교육과정 정보를 모두 선택해주세요.".to_string(),
            ));
        }
        if self.selected_elements.is_empty() {
            return Err(CoreError::Validation(
                "내용 요소를 하나 이상 선택해주세요.".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill empty topic and intent fields from the selected content elements.
    pub fn normalized(mut self) -> Self {
        let joined = self.selected_elements.join(", ");
        if self.experiment_topic.trim().is_empty() {
            self.experiment_topic = format!("{joined} 관련 실험");
        }
        if self.teacher_intent.trim().is_empty() {
            self.teacher_intent = format!("{joined}에 대한 이해를 높이기 위한 실험");
        }
        self
    }

    /// Curriculum half of the merged form.
    pub fn curriculum(&self) -> CurriculumSelection {
        CurriculumSelection {
            school_level: Some(self.school_level.clone()),
            grade_group: Some(self.grade_group.clone()),
            subject: Some(self.subject.clone()),
            unit: Some(self.unit.clone()),
            selected_elements: self.selected_elements.clone(),
        }
    }

    /// Free-text half of the merged form.
    pub fn form_data(&self) -> FormData {
        FormData {
            experiment_topic: self.experiment_topic.clone(),
            teacher_intent: self.teacher_intent.clone(),
            reference_content: self.reference_content.clone(),
        }
    }
}

/// A recommended video, sourced from the search call plus the per-video
/// detail fetch (duration and view count).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    /// ISO-8601 duration as delivered by the provider (`PT4M13S`).
    pub duration: String,
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}

/// Provider-generated text slots plus the accumulated video list.
/// Experiment and template are versioned singletons; each revision overwrites
/// the previous value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub experiment: Option<String>,
    pub template: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}
