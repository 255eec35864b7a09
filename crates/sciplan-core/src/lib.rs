//! SciPlan core: state store, tab orchestration, prompts, and document export
//! for the experiment-design assistant.
//!
//! The [`store::AppStore`] holds curriculum selection, form fields, and
//! generated content behind a synchronous event bus. Tab controllers
//! ([`tabs`]) subscribe through the [`app::App`] wiring and drive generation
//! requests against the relay ([`api`]). Finished content exports as a
//! word-processor document ([`export`]).

pub mod api;
pub mod app;
pub mod curriculum;
pub mod error;
pub mod export;
pub mod prompts;
pub mod render;
pub mod shared;
pub mod store;
pub mod tabs;

pub use api::{RelayApi, RelayClient, SearchHit, SearchPage, VideoDetails};
pub use app::App;
pub use error::{CoreError, CoreResult};
pub use shared::{
    ChatMessage, CurriculumSelection, FormData, GeneratedContent, SubmissionForm, Video,
};
pub use store::{AppStore, EventBus, EventPayload, StoreEvent};
pub use tabs::{TabController, TabKind};
