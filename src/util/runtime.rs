//! Tokio runtime bridge for the synchronous shell.
//!
//! The shell's event loop is a plain thread; async collaborators (the content
//! transformer) are driven to completion through [`run_async`].

/// Errors from bridging into async code
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Failed to create tokio runtime: {0}")]
    Build(#[from] std::io::Error),
}

/// Run an async future to completion from synchronous code.
///
/// Inside a multi-threaded Tokio runtime this blocks in place on the current handle;
/// otherwise a temporary current-thread runtime is built for the call.
pub fn run_async<F, T>(future: F) -> Result<T, RuntimeError>
where
    F: std::future::Future<Output = T>,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
        Err(_) => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            Ok(rt.block_on(future))
        }
    }
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod tests;
