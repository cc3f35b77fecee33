use crate::domain::model::DispatchOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Hands a finished narration to an external voice-call service.
///
/// Implementations never return an error: transport problems and rejected
/// calls are reported through [`DispatchOutcome::Failed`].
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn dispatch(&self, message: &str, to_number: &str) -> DispatchOutcome;
}
