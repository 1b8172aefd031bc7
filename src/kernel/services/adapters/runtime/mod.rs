//! Async runtime adapter: drives port futures on a tokio runtime.

mod async_runtime;

pub use async_runtime::AsyncRuntime;
