//! Central application store: state slots plus a synchronous event bus.
//!
//! The store is the single writer of shared state. Setters replace (or append
//! to) one slot and notify subscribers synchronously, in registration order,
//! before returning to the caller. A failing subscriber is logged and skipped
//! so it cannot block the rest of the fan-out.
//!
//! The store is an explicitly constructed value passed by `Arc`; the event bus
//! is injectable for callers that want to share one bus across components.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::CoreResult;
use crate::shared::{CurriculumSelection, FormData, GeneratedContent, SubmissionForm, Video};

/// Named store notifications. Event names mirror the wire-facing identifiers
/// used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    CurriculumChanged,
    FormDataChanged,
    FormSubmitted,
    ExperimentGenerated,
    ExperimentChanged,
    TemplateGenerated,
    TemplateChanged,
    VideosUpdated,
    DataReset,
    NewExperimentStarted,
}

impl StoreEvent {
    pub fn name(self) -> &'static str {
        match self {
            StoreEvent::CurriculumChanged => "curriculum-changed",
            StoreEvent::FormDataChanged => "form-data-changed",
            StoreEvent::FormSubmitted => "form-submitted",
            StoreEvent::ExperimentGenerated => "experiment-generated",
            StoreEvent::ExperimentChanged => "experiment-changed",
            StoreEvent::TemplateGenerated => "template-generated",
            StoreEvent::TemplateChanged => "template-changed",
            StoreEvent::VideosUpdated => "videos-updated",
            StoreEvent::DataReset => "data-reset",
            StoreEvent::NewExperimentStarted => "new-experiment-started",
        }
    }
}

/// Data delivered to subscribers alongside an event.
#[derive(Debug, Clone)]
pub enum EventPayload {
    Curriculum(CurriculumSelection),
    Form(FormData),
    Submission(SubmissionForm),
    Text(String),
    Videos(Vec<Video>),
    Empty,
}

type Handler = Box<dyn Fn(&EventPayload) -> CoreResult<()> + Send + Sync>;

/// Synchronous publish/subscribe bus keyed by [`StoreEvent`].
///
/// Handlers run in registration order. Handler failures are logged at warn
/// level and never propagated to the emitter.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<StoreEvent, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, event: StoreEvent, handler: F)
    where
        F: Fn(&EventPayload) -> CoreResult<()> + Send + Sync + 'static,
    {
        let mut subs = match self.subscribers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subs.entry(event).or_default().push(Box::new(handler));
    }

    pub fn emit(&self, event: StoreEvent, payload: &EventPayload) {
        let subs = match self.subscribers.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(handlers) = subs.get(&event) else {
            return;
        };
        for (index, handler) in handlers.iter().enumerate() {
            if let Err(err) = handler(payload) {
                tracing::warn!(
                    event = event.name(),
                    subscriber = index,
                    %err,
                    "store subscriber failed"
                );
            }
        }
    }
}

#[derive(Debug, Default)]
struct AppState {
    curriculum: CurriculumSelection,
    form_data: FormData,
    content: GeneratedContent,
}

/// The application data store. Single writer of shared state; tab controllers
/// keep only their local UI flags.
pub struct AppStore {
    state: Mutex<AppState>,
    bus: EventBus,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    /// Construct the store around an externally owned event bus.
    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            state: Mutex::new(AppState::default()),
            bus,
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe<F>(&self, event: StoreEvent, handler: F)
    where
        F: Fn(&EventPayload) -> CoreResult<()> + Send + Sync + 'static,
    {
        self.bus.subscribe(event, handler);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AppState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn set_curriculum(&self, curriculum: CurriculumSelection) {
        self.lock().curriculum = curriculum.clone();
        self.bus.emit(
            StoreEvent::CurriculumChanged,
            &EventPayload::Curriculum(curriculum),
        );
    }

    pub fn curriculum(&self) -> CurriculumSelection {
        self.lock().curriculum.clone()
    }

    pub fn set_form_data(&self, form_data: FormData) {
        self.lock().form_data = form_data.clone();
        self.bus
            .emit(StoreEvent::FormDataChanged, &EventPayload::Form(form_data));
    }

    pub fn form_data(&self) -> FormData {
        self.lock().form_data.clone()
    }

    /// Curriculum and form fields merged into one submission snapshot.
    pub fn complete_form_data(&self) -> SubmissionForm {
        let state = self.lock();
        SubmissionForm {
            school_level: state.curriculum.school_level.clone().unwrap_or_default(),
            grade_group: state.curriculum.grade_group.clone().unwrap_or_default(),
            subject: state.curriculum.subject.clone().unwrap_or_default(),
            unit: state.curriculum.unit.clone().unwrap_or_default(),
            selected_elements: state.curriculum.selected_elements.clone(),
            experiment_topic: state.form_data.experiment_topic.clone(),
            teacher_intent: state.form_data.teacher_intent.clone(),
            reference_content: state.form_data.reference_content.clone(),
        }
    }

    /// Store a generated experiment. Emits `experiment-generated` then
    /// `experiment-changed`; subscribers may key on either.
    pub fn set_experiment(&self, experiment: String) {
        self.lock().content.experiment = Some(experiment.clone());
        let payload = EventPayload::Text(experiment);
        self.bus.emit(StoreEvent::ExperimentGenerated, &payload);
        self.bus.emit(StoreEvent::ExperimentChanged, &payload);
    }

    pub fn experiment(&self) -> Option<String> {
        self.lock().content.experiment.clone()
    }

    /// Store a generated student template. Emits `template-generated` then
    /// `template-changed`.
    pub fn set_template(&self, template: String) {
        self.lock().content.template = Some(template.clone());
        let payload = EventPayload::Text(template);
        self.bus.emit(StoreEvent::TemplateGenerated, &payload);
        self.bus.emit(StoreEvent::TemplateChanged, &payload);
    }

    pub fn template(&self) -> Option<String> {
        self.lock().content.template.clone()
    }

    /// Replace or extend the video list, notifying subscribers with the full
    /// accumulated list.
    pub fn set_videos(&self, videos: Vec<Video>, append: bool) {
        let snapshot = {
            let mut state = self.lock();
            if append {
                state.content.videos.extend(videos);
            } else {
                state.content.videos = videos;
            }
            state.content.videos.clone()
        };
        self.bus
            .emit(StoreEvent::VideosUpdated, &EventPayload::Videos(snapshot));
    }

    pub fn videos(&self) -> Vec<Video> {
        self.lock().content.videos.clone()
    }

    /// Restore the pristine state and notify `data-reset` subscribers.
    pub fn reset(&self) {
        *self.lock() = AppState::default();
        self.bus.emit(StoreEvent::DataReset, &EventPayload::Empty);
    }

    /// Clear generated content only; curriculum and form fields survive.
    pub fn start_new_experiment(&self) {
        self.lock().content = GeneratedContent::default();
        self.bus
            .emit(StoreEvent::NewExperimentStarted, &EventPayload::Empty);
    }

    /// Update curriculum and form slots through the regular setters (emitting
    /// their events), then emit `form-submitted` with the full form.
    pub fn submit_form(&self, form: SubmissionForm) {
        self.set_curriculum(form.curriculum());
        self.set_form_data(form.form_data());
        self.bus
            .emit(StoreEvent::FormSubmitted, &EventPayload::Submission(form));
    }
}
