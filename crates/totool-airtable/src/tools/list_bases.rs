use super::{call, http_api};
use crate::SERVICE;
use crate::auth::AirtableAuth;
use crate::client::{AirtableApi, Base};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use totool_core::schema::ObjectSchema;
use totool_core::{
    Authenticated, Error, Result, RuntimeContext, Tool, ToolConfig, ToolDefinition, to_output,
};

const NAME: &str = "list-bases";
const DESCRIPTION: &str = "List all Airtable bases accessible with the provided access token";

#[derive(Debug, Serialize)]
struct Output {
    bases: Vec<Base>,
}

/// Every base the token can see
pub struct ListBasesTool {
    definition: ToolDefinition,
    auth: AirtableAuth,
    api: Arc<dyn AirtableApi>,
}

impl ListBasesTool {
    pub fn new(auth: AirtableAuth, predefined_parameters: Option<Value>) -> Result<Self> {
        let api = http_api(&auth);
        Self::with_api(auth, predefined_parameters, api)
    }

    pub fn with_api(
        auth: AirtableAuth,
        predefined_parameters: Option<Value>,
        api: Arc<dyn AirtableApi>,
    ) -> Result<Self> {
        let definition = ToolDefinition::new(
            ToolConfig::new(NAME, DESCRIPTION, ObjectSchema::new(), SERVICE)
                .with_predefined_parameters(predefined_parameters),
        )?;
        Ok(Self {
            definition,
            auth,
            api,
        })
    }

    async fn all_bases(&self) -> crate::Result<Vec<Base>> {
        let mut bases = Vec::new();
        let mut offset = None;
        loop {
            let page = self.api.list_bases(offset).await?;
            bases.extend(page.bases);
            match page.offset {
                Some(next) => offset = Some(next),
                None => return Ok(bases),
            }
        }
    }
}

#[async_trait]
impl Tool for ListBasesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: Value, context: &RuntimeContext) -> Result<Value> {
        let bases = call(context, self.all_bases())
            .await?
            .map_err(|e| Error::Service(format!("Failed to list bases: {e}")))?;

        to_output(&Output { bases })
    }
}

impl Authenticated for ListBasesTool {
    type Credentials = AirtableAuth;

    fn auth(&self) -> &AirtableAuth {
        &self.auth
    }
}
