//! Upstream provider clients. Credentials are held server-side; each client
//! checks its key before issuing any upstream call.

mod gemini;
mod youtube;

pub use gemini::GeminiClient;
pub use youtube::YouTubeClient;
