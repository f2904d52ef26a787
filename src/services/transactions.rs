//! Saving inward and outward entries.
//!
//! Derived figures are always recomputed here before a record leaves the
//! process, so whatever the form showed, the backend receives amounts that
//! agree with the line items.

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::models::{ApiResource, InwardTransaction, OutwardTransaction};
use crate::services::api_client::ApiClient;
use crate::validation::FormValidate;

pub struct TransactionService {
    api: ApiClient,
}

impl TransactionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Creates or, when the entry already has an id, updates it.
    async fn save<T>(&self, record: &T) -> Result<T, ServiceError>
    where
        T: ApiResource + FormValidate,
    {
        record.check()?;
        match record.id() {
            Some(id) => self.api.update(id, record).await,
            None => self.api.create(record).await,
        }
    }

    #[instrument(skip(self, inward), fields(invoice_no = %inward.invoice_no))]
    pub async fn submit_inward(
        &self,
        mut inward: InwardTransaction,
    ) -> Result<InwardTransaction, ServiceError> {
        let amount = inward.recalculate()?;
        let saved = self.save(&inward).await?;
        info!(%amount, "inward entry saved");
        Ok(saved)
    }

    #[instrument(skip(self, outward), fields(invoice_no = %outward.invoice_no))]
    pub async fn submit_outward(
        &self,
        mut outward: OutwardTransaction,
    ) -> Result<OutwardTransaction, ServiceError> {
        let total = outward.recalculate()?;
        let saved = self.save(&outward).await?;
        info!(%total, "outward entry saved");
        Ok(saved)
    }
}
