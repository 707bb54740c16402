use tracing::debug;

use super::types::TipNotice;
use super::{BackendClient, Result};

impl BackendClient {
    /// Tell the backend about a broadcast tip via `POST users/send-tip`.
    pub async fn send_tip_notice(&self, notice: &TipNotice) -> Result<()> {
        let url = self.endpoint("users/send-tip")?;
        self.post(url, notice).await?;
        debug!(tx_id = %notice.transaction_id, "tip notice accepted");
        Ok(())
    }
}
