//! Editor domain: tabs + live buffer.

mod session;

pub use session::EditorSession;
