//! Chat assistant: session state, streamed reply consumption, rendering.

mod config;
mod render;
mod session;

pub use config::ChatConfig;
pub use render::{render_message, RenderedToken};
pub use session::ChatSession;
