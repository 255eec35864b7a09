//! Experiment-design tab: drives the initial generation from a submitted form
//! and teacher-requested revisions of the stored design.

use std::sync::{Arc, Mutex};

use crate::api::RelayApi;
use crate::curriculum::{catalog, format_prerequisites};
use crate::error::{CoreError, CoreResult};
use crate::export::{self, WordDocument};
use crate::prompts::{experiment_design_prompt, experiment_revision_prompt};
use crate::shared::{ChatMessage, SubmissionForm};
use crate::store::AppStore;
use crate::tabs::{LoadingGate, TabController, TabKind};

pub struct ExperimentTab {
    store: Arc<AppStore>,
    relay: Arc<dyn RelayApi>,
    loading: LoadingGate,
    last_error: Mutex<Option<String>>,
}

impl ExperimentTab {
    pub fn new(store: Arc<AppStore>, relay: Arc<dyn RelayApi>) -> Self {
        Self {
            store,
            relay,
            loading: LoadingGate::new(),
            last_error: Mutex::new(None),
        }
    }

    /// Generate an experiment design from a validated, normalized submission
    /// and store it. Downstream subscribers (template backup, display) react
    /// to the store event.
    pub async fn handle_form_submit(&self, form: &SubmissionForm) -> CoreResult<()> {
        let result = self.generate_design(form).await;
        self.record(&result);
        result
    }

    async fn generate_design(&self, form: &SubmissionForm) -> CoreResult<()> {
        let _loading = self.loading.begin("실험을 설계하는 중입니다...");

        let prerequisites = catalog().prerequisites(&form.school_level, &form.grade_group);
        let prompt = experiment_design_prompt(form, &format_prerequisites(&prerequisites));
        let result = self.relay.generate(&[ChatMessage::user(prompt)]).await?;

        self.store.set_experiment(result);
        Ok(())
    }

    /// Apply a teacher revision to the stored design. Empty revision text and
    /// a missing design are rejected before any network call.
    pub async fn handle_revision(&self, revision_request: &str) -> CoreResult<()> {
        let revision_request = revision_request.trim();
        if revision_request.is_empty() {
            return Err(CoreError::Validation(
                "수정 요청 내용을 입력해주세요.".to_string(),
            ));
        }
        let Some(current) = self.store.experiment() else {
            return Err(CoreError::Validation("수정할 실험이 없습니다.".to_string()));
        };

        let result = self.revise_design(&current, revision_request).await;
        self.record(&result);
        result
    }

    async fn revise_design(&self, current: &str, revision_request: &str) -> CoreResult<()> {
        let _loading = self.loading.begin("실험을 수정하는 중입니다...");

        let prompt = experiment_revision_prompt(current, revision_request);
        let result = self.relay.generate(&[ChatMessage::user(prompt)]).await?;

        self.store.set_experiment(result);
        Ok(())
    }

    /// Export the stored design as a word-processor document.
    pub fn export(&self) -> CoreResult<WordDocument> {
        let Some(experiment) = self.store.experiment() else {
            return Err(CoreError::Validation("내보낼 실험이 없습니다.".to_string()));
        };
        let base = export::experiment_file_base(chrono::Local::now().date_naive());
        Ok(export::export_word_document(&experiment, &base))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    fn record(&self, result: &CoreResult<()>) {
        if let Ok(mut slot) = self.last_error.lock() {
            match result {
                Ok(()) => *slot = None,
                Err(err) => {
                    tracing::error!(%err, "experiment generation failed");
                    *slot = Some(err.to_string());
                }
            }
        }
    }
}

impl TabController for ExperimentTab {
    fn kind(&self) -> TabKind {
        TabKind::Experiment
    }

    fn render(&self) -> Option<String> {
        self.store
            .experiment()
            .map(|text| export::markdown_to_html(&text))
    }
}
