//! Invoice HTML rendering.
//!
//! [`InvoiceDocument`] is the only input the renderer accepts; it can only be
//! built from a transaction that has an invoice number and party details, so
//! [`render_invoice_html`] never has to guess. Optional display fields fall
//! back to `N/A`. [`render_invoice_value`] is the untyped entry point used for
//! raw backend JSON and answers bad input with an error page.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::models::{
    display_date, CompanyDetails, Customer, InwardTransaction, LineItem, OutwardTransaction,
    PaymentType, Supplier, Transport,
};
use crate::services::calculation::{
    format_amount, gst_summary, DocumentTotals, GstRateSummary, LineAmounts,
};
use crate::services::words::{amount_in_words, NumberingSystem};

pub const INVALID_INVOICE_HTML: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><title>Invoice</title></head>\n<body><h1>Error: Invalid invoice data</h1></body>\n</html>";

const DEFAULT_DECLARATION: &str = "We declare that this invoice shows the actual price of the goods described and that all particulars are true and correct.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSettings {
    /// Replaces the per-kind heading when set.
    pub title: Option<String>,
    pub declaration: String,
    pub numbering: NumberingSystem,
    pub currency_symbol: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            title: None,
            declaration: DEFAULT_DECLARATION.to_string(),
            numbering: NumberingSystem::Indian,
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceKind {
    Inward,
    Outward,
}

impl InvoiceKind {
    pub fn title(&self) -> &'static str {
        match self {
            InvoiceKind::Inward => "Inward Invoice",
            InvoiceKind::Outward => "Tax Invoice",
        }
    }

    fn party_heading(&self) -> &'static str {
        match self {
            InvoiceKind::Inward => "Supplier Details",
            InvoiceKind::Outward => "Customer Details",
        }
    }
}

/// Counterparty block: the supplier of an inward entry or the customer of an
/// outward one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyBlock {
    pub name: String,
    pub mobile: String,
    pub gst_number: String,
    pub address: String,
}

impl From<&Supplier> for PartyBlock {
    fn from(supplier: &Supplier) -> Self {
        Self {
            name: supplier.supplier_name.clone(),
            mobile: supplier.supplier_mobile.clone(),
            gst_number: supplier.supplier_gst_no.clone(),
            address: supplier.supplier_address.clone(),
        }
    }
}

impl From<&Customer> for PartyBlock {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.customer_name.clone(),
            mobile: customer.customer_mobile.clone(),
            gst_number: customer.customer_gst_no.clone(),
            address: customer.customer_address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub kind: InvoiceKind,
    pub invoice_no: String,
    pub date: String,
    pub company: CompanyDetails,
    pub party: PartyBlock,
    pub source: String,
    pub destination: String,
    pub transport: Option<Transport>,
    pub items: Vec<LineItem>,
    pub payment_type: Option<PaymentType>,
    pub outstanding_payment: Option<Decimal>,
    pub totals: DocumentTotals,
    pub settings: InvoiceSettings,
}

fn require_invoice_no(invoice_no: &str) -> Result<String, ServiceError> {
    let trimmed = invoice_no.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::ValidationError(
            "invoice number is missing".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl InvoiceDocument {
    pub fn from_inward(
        inward: &InwardTransaction,
        company: &CompanyDetails,
        settings: &InvoiceSettings,
    ) -> Result<Self, ServiceError> {
        let invoice_no = require_invoice_no(&inward.invoice_no)?;
        let supplier = inward.supplier_details.as_ref().ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "inward entry {invoice_no} has no supplier details"
            ))
        })?;

        Ok(Self {
            kind: InvoiceKind::Inward,
            date: display_date(&inward.date),
            company: company.clone(),
            party: supplier.into(),
            source: inward.source.clone(),
            destination: inward.destination.clone(),
            transport: inward.transport_details.clone(),
            items: inward.product_details.clone(),
            payment_type: None,
            outstanding_payment: None,
            totals: DocumentTotals::from_items(&inward.product_details, inward.rental_cost())?,
            settings: settings.clone(),
            invoice_no,
        })
    }

    pub fn from_outward(
        outward: &OutwardTransaction,
        company: &CompanyDetails,
        settings: &InvoiceSettings,
    ) -> Result<Self, ServiceError> {
        let invoice_no = require_invoice_no(&outward.invoice_no)?;
        let customer = outward.customer_details.as_ref().ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "outward entry {invoice_no} has no customer details"
            ))
        })?;

        Ok(Self {
            kind: InvoiceKind::Outward,
            date: display_date(&outward.date),
            company: company.clone(),
            party: customer.into(),
            source: outward.source.clone(),
            destination: customer.customer_address.clone(),
            transport: outward.transport_details.clone(),
            items: outward.product_details.clone(),
            payment_type: Some(outward.payment_type.clone()),
            outstanding_payment: Some(outward.outstanding_payment),
            totals: DocumentTotals::from_items(&outward.product_details, outward.rental_cost())?,
            settings: settings.clone(),
            invoice_no,
        })
    }

    /// GST columns and the tax summary appear only when some line carries GST.
    pub fn has_gst(&self) -> bool {
        self.items.iter().any(LineItem::has_gst)
    }

    pub fn title(&self) -> &str {
        self.settings
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| self.kind.title())
    }

    pub fn amount_in_words(&self) -> String {
        amount_in_words(self.totals.grand_total, self.settings.numbering)
    }

    /// File name stem for the printed document, e.g. `tax-invoice-OUT-7`.
    pub fn file_stem(&self) -> String {
        let safe: String = self
            .invoice_no
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "{}-{}",
            self.kind.title().to_ascii_lowercase().replace(' ', "-"),
            safe
        )
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escaped text, or `N/A` when blank.
fn text_or_na(raw: &str) -> String {
    if raw.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape_html(raw.trim())
    }
}

fn money(symbol: &str, value: Decimal) -> String {
    format!("{}{}", escape_html(symbol), format_amount(value))
}

fn percent(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

fn company_block(doc: &InvoiceDocument) -> String {
    let company = &doc.company;
    format!(
        r#"<div class="company">
        <div class="company-name">{}</div>
        <div>{}</div>
        <div>GSTIN: {}</div>
        <div>Mobile: {} | Email: {}</div>
    </div>"#,
        text_or_na(&company.company_name),
        text_or_na(&company.address),
        text_or_na(&company.gst_number),
        text_or_na(&company.mobile),
        text_or_na(&company.email),
    )
}

fn party_block(doc: &InvoiceDocument) -> String {
    let party = &doc.party;
    let transport = doc.transport.clone().unwrap_or_default();
    let payment = match (&doc.payment_type, doc.outstanding_payment) {
        (Some(payment_type), Some(outstanding)) => format!(
            r#"
            <div>Payment Type: {}</div>
            <div>Outstanding: {}</div>"#,
            escape_html(&payment_type.to_string()),
            money(&doc.settings.currency_symbol, outstanding),
        ),
        _ => String::new(),
    };

    format!(
        r#"<table class="meta">
        <tr>
            <td>
                <h3>{}</h3>
                <div class="party-name">{}</div>
                <div>{}</div>
                <div>Mobile: {}</div>
                <div>GSTIN: {}</div>
            </td>
            <td>
                <div>Invoice No: {}</div>
                <div>Date: {}</div>
                <div>From: {}</div>
                <div>To: {}</div>{}
            </td>
            <td>
                <h3>Transport</h3>
                <div>Transporter: {}</div>
                <div>Vehicle No: {}</div>
                <div>Driver: {} ({})</div>
            </td>
        </tr>
    </table>"#,
        doc.kind.party_heading(),
        text_or_na(&party.name),
        text_or_na(&party.address),
        text_or_na(&party.mobile),
        text_or_na(&party.gst_number),
        text_or_na(&doc.invoice_no),
        text_or_na(&doc.date),
        text_or_na(&doc.source),
        text_or_na(&doc.destination),
        payment,
        text_or_na(&transport.transporter_name),
        text_or_na(&transport.vehicle_number),
        text_or_na(&transport.driver_name),
        text_or_na(&transport.driver_mobile),
    )
}

fn items_table(doc: &InvoiceDocument, lines: &[LineAmounts], with_gst: bool) -> String {
    let symbol = &doc.settings.currency_symbol;
    let gst_headers = if with_gst {
        "\n                <th>Taxable Value</th>\n                <th>GST %</th>\n                <th>GST Amount</th>\n                <th>Total</th>"
    } else {
        "\n                <th>Amount</th>"
    };

    let rows: String = doc
        .items
        .iter()
        .zip(lines)
        .enumerate()
        .map(|(index, (item, amounts))| {
            let tail = if with_gst {
                format!(
                    r#"<td class="right">{}</td><td class="right">{}</td><td class="right">{}</td><td class="right">{}</td>"#,
                    money(symbol, amounts.base_amount),
                    percent(item.gst_percentage),
                    money(symbol, amounts.gst_amount),
                    money(symbol, amounts.total_amount),
                )
            } else {
                format!(
                    r#"<td class="right">{}</td>"#,
                    money(symbol, amounts.base_amount)
                )
            };
            format!(
                "\n            <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td>{}</tr>",
                index + 1,
                text_or_na(item.display_name()),
                text_or_na(item.display_code()),
                item.quantity.normalize(),
                money(symbol, item.product_rate),
                tail,
            )
        })
        .collect();

    format!(
        r#"<table class="items">
        <thead>
            <tr>
                <th>Sr</th>
                <th>Product</th>
                <th>Code</th>
                <th>Qty</th>
                <th>Rate</th>{}
            </tr>
        </thead>
        <tbody>{}
        </tbody>
    </table>"#,
        gst_headers, rows
    )
}

fn gst_summary_table(symbol: &str, summary: &[GstRateSummary]) -> String {
    let rows: String = summary
        .iter()
        .map(|row| {
            format!(
                "\n            <tr><td>{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td></tr>",
                percent(row.rate),
                money(symbol, row.taxable_value),
                money(symbol, row.cgst),
                money(symbol, row.sgst),
                money(symbol, row.total_tax),
            )
        })
        .collect();

    format!(
        r#"<table class="gst-summary">
        <thead>
            <tr>
                <th>GST Rate</th>
                <th>Taxable Value</th>
                <th>CGST</th>
                <th>SGST</th>
                <th>Total Tax</th>
            </tr>
        </thead>
        <tbody>{}
        </tbody>
    </table>"#,
        rows
    )
}

fn totals_block(doc: &InvoiceDocument, with_gst: bool) -> String {
    let symbol = &doc.settings.currency_symbol;
    let totals = &doc.totals;
    let gst_row = if with_gst {
        format!(
            "\n        <tr><td>Total GST</td><td class=\"right\">{}</td></tr>",
            money(symbol, totals.total_gst)
        )
    } else {
        String::new()
    };

    format!(
        r#"<table class="totals">
        <tr><td>Taxable Value</td><td class="right">{}</td></tr>{}
        <tr><td>Transport Rental</td><td class="right">{}</td></tr>
        <tr class="grand-total"><td>Grand Total</td><td class="right">{}</td></tr>
    </table>"#,
        money(symbol, totals.taxable_value),
        gst_row,
        money(symbol, totals.rental_cost),
        money(symbol, totals.grand_total),
    )
}

fn bank_block(company: &CompanyDetails) -> String {
    match company.bank_details.as_ref().filter(|bank| !bank.is_empty()) {
        Some(bank) => format!(
            r#"<div class="words"><strong>Bank Details:</strong> {} | A/c {} | IFSC {} | {}</div>"#,
            text_or_na(&bank.bank_name),
            text_or_na(&bank.account_number),
            text_or_na(&bank.ifsc_code),
            text_or_na(&bank.branch),
        ),
        None => String::new(),
    }
}

/// Renders a self-contained HTML invoice. Pure; performs no I/O. Lines whose
/// amounts cannot be computed yield [`INVALID_INVOICE_HTML`].
pub fn render_invoice_html(doc: &InvoiceDocument) -> String {
    let with_gst = doc.has_gst();
    let computed = doc
        .items
        .iter()
        .map(LineItem::amounts)
        .collect::<Result<Vec<_>, _>>()
        .and_then(|lines| gst_summary(&doc.items).map(|summary| (lines, summary)));
    let (lines, summary) = match computed {
        Ok(computed) => computed,
        Err(err) => {
            tracing::warn!(invoice_no = %doc.invoice_no, error = %err, "refusing to render invoice");
            return INVALID_INVOICE_HTML.to_string();
        }
    };
    let summary = if with_gst {
        gst_summary_table(&doc.settings.currency_symbol, &summary)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title} {invoice_no}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 24px; color: #222; font-size: 13px; }}
        h1 {{ text-align: center; font-size: 20px; margin: 8px 0 16px; }}
        h3 {{ margin: 0 0 6px; font-size: 12px; text-transform: uppercase; color: #555; }}
        table {{ width: 100%; border-collapse: collapse; margin-bottom: 16px; }}
        th, td {{ border: 1px solid #999; padding: 6px; text-align: left; vertical-align: top; }}
        th {{ background: #f0f0f0; }}
        .right {{ text-align: right; }}
        .company {{ text-align: center; margin-bottom: 12px; }}
        .company-name {{ font-size: 22px; font-weight: bold; }}
        .party-name {{ font-weight: bold; }}
        .totals {{ width: 45%; margin-left: auto; }}
        .grand-total td {{ font-weight: bold; font-size: 15px; }}
        .words, .declaration {{ border: 1px solid #999; padding: 8px; margin-bottom: 16px; }}
        .signatures {{ display: flex; justify-content: space-between; margin-top: 48px; }}
        .signature {{ width: 40%; text-align: center; border-top: 1px solid #222; padding-top: 6px; }}
    </style>
</head>
<body>
    {company}
    <h1>{title}</h1>
    {party}
    {items}
    {summary}
    {totals}
    <div class="words"><strong>Amount in words:</strong> {words}</div>
    {bank}
    <div class="declaration"><strong>Declaration:</strong> {declaration}</div>
    <div class="signatures">
        <div class="signature">Receiver's Signature</div>
        <div class="signature">For {company_name}<br>Authorised Signatory</div>
    </div>
</body>
</html>"#,
        title = escape_html(doc.title()),
        invoice_no = escape_html(&doc.invoice_no),
        company = company_block(doc),
        party = party_block(doc),
        items = items_table(doc, &lines, with_gst),
        summary = summary,
        totals = totals_block(doc, with_gst),
        words = escape_html(&doc.amount_in_words()),
        bank = bank_block(&doc.company),
        declaration = text_or_na(&doc.settings.declaration),
        company_name = text_or_na(&doc.company.company_name),
    )
}

/// Renders raw backend JSON. Entries with `customerDetails` are outward,
/// everything else inward; an optional `companyDetails` key supplies the
/// seller block. Anything that cannot become an [`InvoiceDocument`] yields
/// [`INVALID_INVOICE_HTML`].
pub fn render_invoice_value(value: &Value, settings: &InvoiceSettings) -> String {
    let Some(object) = value.as_object() else {
        return INVALID_INVOICE_HTML.to_string();
    };

    let company = object
        .get("companyDetails")
        .and_then(|raw| serde_json::from_value::<CompanyDetails>(raw.clone()).ok())
        .unwrap_or_default();

    let document = if object.contains_key("customerDetails") {
        serde_json::from_value::<OutwardTransaction>(value.clone())
            .map_err(ServiceError::from)
            .and_then(|outward| InvoiceDocument::from_outward(&outward, &company, settings))
    } else {
        serde_json::from_value::<InwardTransaction>(value.clone())
            .map_err(ServiceError::from)
            .and_then(|inward| InvoiceDocument::from_inward(&inward, &company, settings))
    };

    match document {
        Ok(document) => render_invoice_html(&document),
        Err(err) => {
            tracing::warn!(error = %err, "refusing to render invoice");
            INVALID_INVOICE_HTML.to_string()
        }
    }
}
