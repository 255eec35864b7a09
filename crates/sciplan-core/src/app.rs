//! Application wiring: store construction, tab registry, and the signal loop
//! that turns synchronous store events into asynchronous generation work.
//!
//! Store subscribers must return quickly, so cross-tab chains (experiment →
//! template backup, completed curriculum → video search) enqueue a signal
//! that the run loop dispatches to the owning controller. A failing chain is
//! logged by the dispatcher and never touches another tab's state.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::RelayApi;
use crate::error::{CoreError, CoreResult};
use crate::export::WordDocument;
use crate::shared::{CurriculumSelection, SubmissionForm};
use crate::store::{AppStore, EventPayload, StoreEvent};
use crate::tabs::{ExperimentTab, TabController, TabKind, TemplateTab, VideoTab};

/// Work queued by store subscribers for asynchronous dispatch.
#[derive(Debug, Clone)]
enum AppSignal {
    FormSubmitted(SubmissionForm),
    ExperimentGenerated(String),
    CurriculumCompleted(CurriculumSelection),
}

pub struct App {
    store: Arc<AppStore>,
    experiment: Arc<ExperimentTab>,
    template: Arc<TemplateTab>,
    video: Arc<VideoTab>,
    signals: tokio::sync::Mutex<UnboundedReceiver<AppSignal>>,
    active: Mutex<TabKind>,
}

impl App {
    pub fn new(relay: Arc<dyn RelayApi>) -> Self {
        Self::with_store(AppStore::shared(), relay)
    }

    /// Wire the tabs around an existing store. This is the mount step: all
    /// subscriptions are registered here, once.
    pub fn with_store(store: Arc<AppStore>, relay: Arc<dyn RelayApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // form submission drives experiment generation
        let sender = tx.clone();
        store.subscribe(StoreEvent::FormSubmitted, move |payload| {
            if let EventPayload::Submission(form) = payload {
                send(&sender, AppSignal::FormSubmitted(form.clone()))?;
            }
            Ok(())
        });

        // a generated experiment triggers the template backup
        let sender = tx.clone();
        store.subscribe(StoreEvent::ExperimentGenerated, move |payload| {
            if let EventPayload::Text(experiment) = payload {
                send(&sender, AppSignal::ExperimentGenerated(experiment.clone()))?;
            }
            Ok(())
        });

        // a completed curriculum selection triggers the video search
        let sender = tx;
        store.subscribe(StoreEvent::CurriculumChanged, move |payload| {
            if let EventPayload::Curriculum(curriculum) = payload {
                if curriculum.is_complete() {
                    send(&sender, AppSignal::CurriculumCompleted(curriculum.clone()))?;
                }
            }
            Ok(())
        });

        let experiment = Arc::new(ExperimentTab::new(Arc::clone(&store), Arc::clone(&relay)));
        let template = Arc::new(TemplateTab::new(Arc::clone(&store), Arc::clone(&relay)));
        let video = Arc::new(VideoTab::new(Arc::clone(&store), relay));

        Self {
            store,
            experiment,
            template,
            video,
            signals: tokio::sync::Mutex::new(rx),
            active: Mutex::new(TabKind::Experiment),
        }
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    pub fn experiment_tab(&self) -> &Arc<ExperimentTab> {
        &self.experiment
    }

    pub fn template_tab(&self) -> &Arc<TemplateTab> {
        &self.template
    }

    pub fn video_tab(&self) -> &Arc<VideoTab> {
        &self.video
    }

    /// Statically registered capability lookup over the closed tab set.
    pub fn tab(&self, kind: TabKind) -> &dyn TabController {
        match kind {
            TabKind::Experiment => self.experiment.as_ref(),
            TabKind::Template => self.template.as_ref(),
            TabKind::Video => self.video.as_ref(),
        }
    }

    pub fn tab_by_name(&self, name: &str) -> Option<&dyn TabController> {
        TabKind::from_name(name).map(|kind| self.tab(kind))
    }

    /// Switch the content region to another tab and return its restorable
    /// content, if any. The outgoing tab gets a deactivation callback.
    pub fn activate(&self, kind: TabKind) -> Option<String> {
        if let Ok(mut active) = self.active.lock() {
            if *active != kind {
                self.tab(*active).on_deactivate();
                *active = kind;
            }
        }
        self.tab(kind).render()
    }

    pub fn active_tab(&self) -> TabKind {
        self.active.lock().map(|a| *a).unwrap_or(TabKind::Experiment)
    }

    /// Normalize and validate a submission, then hand it to the store. The
    /// generation chain runs through the signal loop.
    pub fn submit(&self, form: SubmissionForm) -> CoreResult<()> {
        let form = form.normalized();
        form.validate()?;
        self.store.submit_form(form);
        Ok(())
    }

    pub async fn revise_experiment(&self, revision_request: &str) -> CoreResult<()> {
        self.experiment.handle_revision(revision_request).await
    }

    pub async fn revise_template(&self, revision_request: &str) -> CoreResult<()> {
        self.template.handle_revision(revision_request).await
    }

    pub fn export_experiment(&self) -> CoreResult<WordDocument> {
        self.experiment.export()
    }

    pub fn export_template(&self) -> CoreResult<WordDocument> {
        self.template.export()
    }

    /// Dispatch queued signals until the queue is empty, following chains
    /// (a dispatched experiment enqueues the template backup).
    pub async fn drain_signals(&self) {
        loop {
            let signal = {
                let mut rx = self.signals.lock().await;
                match rx.try_recv() {
                    Ok(signal) => signal,
                    Err(_) => break,
                }
            };
            self.dispatch(signal).await;
        }
    }

    /// Run the signal loop until the channel closes. Long-running entry point
    /// for a live frontend.
    pub async fn run(&self) {
        loop {
            let signal = {
                let mut rx = self.signals.lock().await;
                rx.recv().await
            };
            match signal {
                Some(signal) => self.dispatch(signal).await,
                None => break,
            }
        }
    }

    async fn dispatch(&self, signal: AppSignal) {
        match signal {
            AppSignal::FormSubmitted(form) => {
                if let Err(err) = self.experiment.handle_form_submit(&form).await {
                    tracing::error!(%err, "experiment generation failed");
                }
            }
            AppSignal::ExperimentGenerated(experiment) => {
                // backup generation: a failure here must not roll back the
                // experiment flow
                if let Err(err) = self.template.handle_experiment_generated(&experiment).await {
                    tracing::warn!(%err, "template auto-generation failed");
                }
            }
            AppSignal::CurriculumCompleted(curriculum) => {
                if let Err(err) = self.video.handle_curriculum_change(&curriculum).await {
                    tracing::warn!(%err, "curriculum video search failed");
                }
            }
        }
    }
}

fn send(sender: &UnboundedSender<AppSignal>, signal: AppSignal) -> CoreResult<()> {
    sender
        .send(signal)
        .map_err(|err| CoreError::Subscriber(err.to_string()))
}
