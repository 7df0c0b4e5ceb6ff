//! Notion tool implementations

mod add_page_content;
mod create_page;
mod retrieve_page;
mod search;

pub use add_page_content::AddPageContentTool;
pub use create_page::CreatePageTool;
pub use retrieve_page::RetrievePageTool;
pub use search::SearchTool;

use crate::auth::NotionAuth;
use crate::client::{NotionApi, NotionClient};
use std::sync::Arc;
use totool_core::{Error, RuntimeContext};

pub(crate) fn http_api(auth: &NotionAuth) -> Arc<dyn NotionApi> {
    Arc::new(NotionClient::new(auth.clone()))
}

/// Run an API future, honouring the runtime's abort signal
pub(crate) async fn call<T>(
    context: &RuntimeContext,
    fut: impl Future<Output = crate::Result<T>>,
) -> totool_core::Result<crate::Result<T>> {
    context.until_cancelled(fut).await.ok_or(Error::Cancelled)
}
