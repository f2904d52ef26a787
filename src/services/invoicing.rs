use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{CompanyDetails, InwardTransaction, OutwardTransaction};
use crate::services::api_client::ApiClient;
use crate::services::invoice_template::{render_invoice_html, InvoiceDocument, InvoiceSettings};
use crate::services::print::{remove_quietly, FileSystemPrinter, PrintService};

const DEFAULT_PRINT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a printed invoice ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutcome {
    pub printed: PathBuf,
    pub shared: Option<PathBuf>,
}

/// Fetches entries, renders them and drives printing/sharing.
pub struct InvoicingService {
    api: ApiClient,
    printer: Arc<dyn PrintService>,
    settings: InvoiceSettings,
    fallback_company: Option<CompanyDetails>,
    timeout: Duration,
}

impl InvoicingService {
    pub fn new(api: ApiClient, printer: Arc<dyn PrintService>, settings: InvoiceSettings) -> Self {
        Self {
            api,
            printer,
            settings,
            fallback_company: None,
            timeout: DEFAULT_PRINT_TIMEOUT,
        }
    }

    pub fn from_config(api: ApiClient, config: &AppConfig) -> Self {
        let printer = FileSystemPrinter::new(&config.output_dir, &config.documents_dir);
        let service = Self::new(api, Arc::new(printer), config.invoice.settings())
            .with_timeout(config.print_timeout());
        match config.invoice.company.clone() {
            Some(company) => service.with_fallback_company(company.into()),
            None => service,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback_company(mut self, company: CompanyDetails) -> Self {
        self.fallback_company = Some(company);
        self
    }

    pub fn settings(&self) -> &InvoiceSettings {
        &self.settings
    }

    /// Backend company record, or the configured fallback when the backend
    /// has none or cannot be reached.
    async fn company(&self) -> Result<CompanyDetails, ServiceError> {
        let err = match self.api.company_details().await {
            Ok(company) => return Ok(company),
            Err(err) => err,
        };
        if let Some(fallback) = &self.fallback_company {
            warn!(error = %err, "using configured company details");
            return Ok(fallback.clone());
        }
        if matches!(err, ServiceError::NotFound(_)) {
            warn!("no company details available; seller block will show N/A");
            return Ok(CompanyDetails::default());
        }
        Err(err)
    }

    #[instrument(skip(self))]
    pub async fn inward_document(&self, id: &str) -> Result<InvoiceDocument, ServiceError> {
        let (inward, company) = tokio::join!(self.api.get::<InwardTransaction>(id), self.company());
        InvoiceDocument::from_inward(&inward?, &company?, &self.settings)
    }

    #[instrument(skip(self))]
    pub async fn outward_document(&self, id: &str) -> Result<InvoiceDocument, ServiceError> {
        let (outward, company) =
            tokio::join!(self.api.get::<OutwardTransaction>(id), self.company());
        InvoiceDocument::from_outward(&outward?, &company?, &self.settings)
    }

    pub async fn print_inward(&self, id: &str, share: bool) -> Result<PrintOutcome, ServiceError> {
        let document = self.inward_document(id).await?;
        self.print_document(&document, share).await
    }

    pub async fn print_outward(&self, id: &str, share: bool) -> Result<PrintOutcome, ServiceError> {
        let document = self.outward_document(id).await?;
        self.print_document(&document, share).await
    }

    /// Renders and prints `document`, optionally sharing it. The whole
    /// operation shares one deadline; if sharing fails or runs out of time
    /// the printed file is removed again.
    #[instrument(skip(self, document), fields(invoice_no = %document.invoice_no))]
    pub async fn print_document(
        &self,
        document: &InvoiceDocument,
        share: bool,
    ) -> Result<PrintOutcome, ServiceError> {
        let deadline = Instant::now() + self.timeout;
        let html = render_invoice_html(document);

        let stem = document.file_stem();
        let printed = match timeout_at(deadline, self.printer.print_to_file(&html, &stem)).await {
            Ok(printed) => printed?,
            Err(_) => {
                self.printer.discard_partial(&stem).await;
                return Err(ServiceError::Timeout(format!(
                    "printing {} timed out",
                    document.invoice_no
                )));
            }
        };

        if !share {
            info!(path = %printed.display(), "invoice ready");
            return Ok(PrintOutcome {
                printed,
                shared: None,
            });
        }

        let shared = match timeout_at(deadline, self.printer.share(&printed)).await {
            Ok(Ok(shared)) => shared,
            Ok(Err(err)) => {
                remove_quietly(&printed).await;
                return Err(err);
            }
            Err(_) => {
                remove_quietly(&printed).await;
                return Err(ServiceError::Timeout(format!(
                    "sharing {} timed out",
                    document.invoice_no
                )));
            }
        };

        info!(path = %shared.display(), "invoice shared");
        Ok(PrintOutcome {
            printed,
            shared: Some(shared),
        })
    }
}
