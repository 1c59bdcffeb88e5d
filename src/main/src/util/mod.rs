use crate::result::{MgmtResult, MgmtRuntimeErr};

#[cfg(test)]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[cfg(test)]
pub fn test_tracing_start() {
    let my_filter = tracing_subscriber::filter::filter_fn(|v| {
        if let Some(mp) = v.module_path() {
            if mp.contains("hyper") || mp.contains("reqwest") {
                return false;
            }
        }
        v.level() != &tracing::Level::TRACE
    });
    let my_layer = tracing_subscriber::fmt::layer().with_test_writer();
    let _ = tracing_subscriber::registry()
        .with(my_layer.with_filter(my_filter))
        .try_init();
}

pub struct JoinHandleWrapper {
    context: String,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl JoinHandleWrapper {
    pub fn new(context: impl Into<String>, handle: tokio::task::JoinHandle<()>) -> Self {
        Self {
            context: context.into(),
            handle: Some(handle),
        }
    }

    /// Waits for the task once, later calls return immediately.
    pub async fn join(&mut self) -> MgmtResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle.await.map_err(|err| {
            MgmtRuntimeErr::TokioJoin {
                err,
                context: self.context.clone(),
            }
            .into()
        })
    }
}
