use async_trait::async_trait;
use std::path::Path;

/// Notifies the OS-level media index about a newly written audio file so
/// other applications can discover it. Failure to notify is never fatal to a
/// download; the orchestrator logs it and moves on.
#[async_trait]
pub trait MediaIndexNotifier: Send + Sync {
    async fn scan_file(&self, path: &Path) -> Result<(), std::io::Error>;
}

/// For platforms without a shared media index.
pub struct NullMediaIndexNotifier;

#[async_trait]
impl MediaIndexNotifier for NullMediaIndexNotifier {
    async fn scan_file(&self, _path: &Path) -> Result<(), std::io::Error> {
        Ok(())
    }
}
