//! Student-template tab: auto-generates a report template whenever an
//! experiment is generated, and applies teacher revisions to it.

use std::sync::{Arc, Mutex};

use crate::api::RelayApi;
use crate::error::{CoreError, CoreResult};
use crate::export::{self, WordDocument};
use crate::prompts::{student_report_template_prompt, template_revision_prompt};
use crate::shared::ChatMessage;
use crate::store::AppStore;
use crate::tabs::{LoadingGate, TabController, TabKind};

pub struct TemplateTab {
    store: Arc<AppStore>,
    relay: Arc<dyn RelayApi>,
    loading: LoadingGate,
    last_error: Mutex<Option<String>>,
}

impl TemplateTab {
    pub fn new(store: Arc<AppStore>, relay: Arc<dyn RelayApi>) -> Self {
        Self {
            store,
            relay,
            loading: LoadingGate::new(),
            last_error: Mutex::new(None),
        }
    }

    /// Generate the student report template for a freshly generated experiment
    /// design. Failures here are the caller's to log; they must never undo the
    /// experiment flow.
    pub async fn handle_experiment_generated(&self, experiment: &str) -> CoreResult<()> {
        let result = self.generate_template(experiment).await;
        self.record(&result);
        result
    }

    async fn generate_template(&self, experiment: &str) -> CoreResult<()> {
        let _loading = self.loading.begin("학생용 템플릿을 생성하는 중입니다...");

        let prompt = student_report_template_prompt(experiment);
        let result = self.relay.generate(&[ChatMessage::user(prompt)]).await?;

        self.store.set_template(result);
        Ok(())
    }

    /// Apply a teacher revision to the stored template. Requires both the
    /// template and the experiment it was derived from.
    pub async fn handle_revision(&self, revision_request: &str) -> CoreResult<()> {
        let revision_request = revision_request.trim();
        if revision_request.is_empty() {
            return Err(CoreError::Validation(
                "수정 요청 내용을 입력해주세요.".to_string(),
            ));
        }
        let Some(template) = self.store.template() else {
            return Err(CoreError::Validation(
                "수정할 템플릿이 없습니다.".to_string(),
            ));
        };
        let Some(experiment) = self.store.experiment() else {
            return Err(CoreError::Validation("참조할 실험이 없습니다.".to_string()));
        };

        let result = self
            .revise_template(&experiment, &template, revision_request)
            .await;
        self.record(&result);
        result
    }

    async fn revise_template(
        &self,
        experiment: &str,
        template: &str,
        revision_request: &str,
    ) -> CoreResult<()> {
        let _loading = self.loading.begin("템플릿을 수정하는 중입니다...");

        let prompt = template_revision_prompt(experiment, template, revision_request);
        let result = self.relay.generate(&[ChatMessage::user(prompt)]).await?;

        self.store.set_template(result);
        Ok(())
    }

    /// Export the stored template as a word-processor document.
    pub fn export(&self) -> CoreResult<WordDocument> {
        let Some(template) = self.store.template() else {
            return Err(CoreError::Validation(
                "내보낼 템플릿이 없습니다.".to_string(),
            ));
        };
        let base = export::template_file_base(chrono::Local::now().date_naive());
        Ok(export::export_word_document(&template, &base))
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
                    tracing::error!(%err, "template generation failed");
                    *slot = Some(err.to_string());
                }
            }
        }
    }
}

impl TabController for TemplateTab {
    fn kind(&self) -> TabKind {
        TabKind::Template
    }

    fn render(&self) -> Option<String> {
        self.store
            .template()
            .map(|text| export::markdown_to_html(&text))
    }
}
