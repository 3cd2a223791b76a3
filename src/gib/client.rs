//! GİB taxpayer-registry SOAP client.
//!
//! Hand-built SOAP 1.1 envelopes against the configured integration
//! endpoint: a forms-authentication ticket is obtained first and consumed
//! by the registry calls. Any `ServiceResult` other than "successful"
//! (case-insensitive) is a hard failure carrying the service's error code
//! and description. No call is ever retried.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use futures_util::TryStreamExt;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use tokio_util::io::StreamReader;

use super::taxpayer::{TaxpayerCheck, TaxpayerRecord, TaxpayerStatus, TaxpayerStore};
use crate::core::{EfaturaError, IntegrationConfig, IntegrationKind};

pub(crate) const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub(crate) const TEMPURI_NS: &str = "http://tempuri.org/";

const TICKET_ACTION: &str = "http://tempuri.org/GetFormsAuthenticationTicket";
const LIST_ACTION: &str = "http://tempuri.org/GetTaxIdListbyDate";
const CHECK_ACTION: &str = "http://tempuri.org/CheckCustomerTaxId";

const CALL_TIMEOUT: Duration = Duration::from_secs(60);
// Full-registry imports are slow on the service side.
const LIST_TIMEOUT: Duration = Duration::from_secs(300);
const ERROR_BODY_LIMIT: usize = 20_000;

/// Client for the taxpayer-registry SOAP service.
#[derive(Debug)]
pub struct GibClient {
    endpoint: String,
    corporate_code: String,
    login: String,
    password: String,
    channel: IntegrationKind,
    http: reqwest::Client,
}

impl GibClient {
    /// Build a client from an integration configuration, validating that
    /// the endpoint and credentials are present.
    pub fn from_config(config: &IntegrationConfig) -> Result<Self, EfaturaError> {
        let endpoint = config
            .web_service_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EfaturaError::Configuration("web service URL is required".into()))?
            .to_string();
        let corporate_code = config
            .corporate_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EfaturaError::Configuration("corporate code is required".into()))?
            .to_string();
        if config.api_user_name.trim().is_empty() || config.api_password.is_empty() {
            return Err(EfaturaError::Configuration(
                "API user name and API password are required".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| EfaturaError::Configuration(format!("HTTP client error: {e}")))?;

        Ok(Self {
            endpoint,
            corporate_code,
            login: config.api_user_name.trim().to_string(),
            password: config.api_password.clone(),
            channel: config.kind,
            http,
        })
    }

    /// Obtain a forms-authentication ticket for subsequent calls.
    pub async fn authentication_ticket(&self) -> Result<String, EfaturaError> {
        let envelope = ticket_envelope(&self.corporate_code, &self.login, &self.password);
        let response = self.post_soap(TICKET_ACTION, envelope, CALL_TIMEOUT).await?;
        let body = read_body(response).await?;
        first_text(&body, b"GetFormsAuthenticationTicketResult")?
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                EfaturaError::Protocol("authentication ticket missing from SOAP response".into())
            })
    }

    /// Import the taxpayer registry incrementally, upserting every record
    /// into `store` as soon as it is parsed. Returns the imported count.
    ///
    /// The response stream is processed element-by-element, so memory
    /// stays bounded even for full-registry imports.
    pub async fn import_taxpayer_list(
        &self,
        ticket: &str,
        start_date: NaiveDate,
        store: &mut dyn TaxpayerStore,
    ) -> Result<usize, EfaturaError> {
        let envelope = list_envelope(ticket, &start_date.format("%Y-%m-%d").to_string());
        let response = self.post_soap(LIST_ACTION, envelope, LIST_TIMEOUT).await?;

        let stream = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
        let reader = tokio::io::BufReader::new(StreamReader::new(stream));
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut scanner = SoapScanner::default();
        let mut imported = 0usize;
        let mut buf = Vec::new();
        loop {
            match xml.read_event_into_async(&mut buf).await {
                Ok(Event::Start(ref e)) => scanner.on_start(e.local_name().as_ref()),
                Ok(Event::Text(ref t)) => {
                    let text = t.unescape().unwrap_or_default();
                    scanner.on_text(&text);
                }
                Ok(Event::End(ref e)) => {
                    if let Some(customer) = scanner.on_end(e.local_name().as_ref()) {
                        if let Some(record) = customer.into_record(self.channel) {
                            store.upsert(record);
                            imported += 1;
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(parse_err(e)),
            }
            buf.clear();
        }

        ensure_service_successful(&scanner.service)?;
        Ok(imported)
    }

    /// Query the registration status of a single tax id. Matching records
    /// are upserted into `store`; the returned check carries the
    /// machine-readable status and the user-facing summary.
    pub async fn check_customer_tax_id(
        &self,
        ticket: &str,
        tax_id: &str,
        store: &mut dyn TaxpayerStore,
    ) -> Result<TaxpayerCheck, EfaturaError> {
        let envelope = check_envelope(ticket, tax_id);
        let response = self.post_soap(CHECK_ACTION, envelope, CALL_TIMEOUT).await?;
        let body = read_body(response).await?;

        let (service, customers) = parse_customer_results(&body)?;
        ensure_service_successful(&service)?;

        if customers.is_empty() {
            return Ok(TaxpayerCheck {
                status: TaxpayerStatus::NotRegistered,
                summary: "Sorgu başarılı fakat kayıt bulunamadı.".into(),
                records: Vec::new(),
            });
        }

        let mut lines = Vec::new();
        let mut records = Vec::new();
        let mut any_registered = false;
        for customer in customers {
            any_registered |= customer.is_exist;
            lines.push(format!(
                "{} | {} | {} | Durum: {}",
                customer.tax_id.as_deref().unwrap_or("-"),
                customer.title.as_deref().unwrap_or("-"),
                customer.alias.as_deref().unwrap_or("-"),
                if customer.is_exist { "Var" } else { "Yok" },
            ));
            if let Some(record) = customer.into_record(self.channel) {
                store.upsert(record.clone());
                records.push(record);
            }
        }

        Ok(TaxpayerCheck {
            status: if any_registered {
                TaxpayerStatus::Registered
            } else {
                TaxpayerStatus::NotRegistered
            },
            summary: lines.join("\n"),
            records,
        })
    }

    async fn post_soap(
        &self,
        action: &str,
        envelope: String,
        timeout: Duration,
    ) -> Result<reqwest::Response, EfaturaError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .timeout(timeout)
            .body(envelope)
            .send()
            .await
            .map_err(|e| {
                log::error!("SOAP connection error while requesting {action}: {e}");
                EfaturaError::Protocol(format!("SOAP connection error: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("SOAP HTTP error {status} while requesting {action}");
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let mut end = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(EfaturaError::Protocol(format!(
                "SOAP HTTP error {status}: {body}"
            )));
        }
        Ok(response)
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, EfaturaError> {
    response
        .text()
        .await
        .map_err(|e| EfaturaError::Protocol(format!("SOAP response read error: {e}")))
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

fn ticket_envelope(corporate_code: &str, login: &str, password: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:tem="{TEMPURI_NS}">
   <soapenv:Header/>
   <soapenv:Body>
      <tem:GetFormsAuthenticationTicket>
         <tem:CorporateCode>{}</tem:CorporateCode>
         <tem:LoginName>{}</tem:LoginName>
         <tem:Password><![CDATA[{}]]></tem:Password>
      </tem:GetFormsAuthenticationTicket>
   </soapenv:Body>
</soapenv:Envelope>"#,
        escape(corporate_code),
        escape(login),
        password,
    )
}

fn list_envelope(ticket: &str, start_date: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:tem="{TEMPURI_NS}">
   <soapenv:Header/>
   <soapenv:Body>
      <tem:GetTaxIdListbyDate>
         <tem:Ticket>{}</tem:Ticket>
         <tem:StartDate>{}</tem:StartDate>
      </tem:GetTaxIdListbyDate>
   </soapenv:Body>
</soapenv:Envelope>"#,
        escape(ticket),
        escape(start_date),
    )
}

fn check_envelope(ticket: &str, tax_id: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:tem="{TEMPURI_NS}">
   <soapenv:Header/>
   <soapenv:Body>
      <tem:CheckCustomerTaxId>
         <tem:Ticket>{}</tem:Ticket>
         <tem:TaxIdOrPersonalId>{}</tem:TaxIdOrPersonalId>
      </tem:CheckCustomerTaxId>
   </soapenv:Body>
</soapenv:Envelope>"#,
        escape(ticket),
        escape(tax_id),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ServiceFields {
    result: String,
    description: String,
    error_code: String,
}

#[derive(Debug, Default)]
struct ParsedCustomer {
    tax_id: Option<String>,
    alias: Option<String>,
    kind: Option<String>,
    title: Option<String>,
    registered_at: Option<String>,
    alias_created_at: Option<String>,
    is_exist: bool,
}

impl ParsedCustomer {
    fn into_record(self, channel: IntegrationKind) -> Option<TaxpayerRecord> {
        let tax_id = self.tax_id?;
        Some(TaxpayerRecord {
            tax_id,
            alias: self.alias,
            kind: self.kind,
            title: self.title,
            registered_at: self.registered_at.as_deref().and_then(parse_registry_datetime),
            alias_created_at: self
                .alias_created_at
                .as_deref()
                .and_then(parse_registry_datetime),
            channel: Some(channel),
        })
    }
}

/// Event-driven scanner shared by the buffered and the streaming parse
/// paths. Matches on local names so the response prefix does not matter.
#[derive(Debug, Default)]
struct SoapScanner {
    service: ServiceFields,
    pending: Option<ParsedCustomer>,
    field: Option<Vec<u8>>,
}

impl SoapScanner {
    fn on_start(&mut self, local: &[u8]) {
        if local == b"EInvoiceCustomerResult" {
            self.pending = Some(ParsedCustomer::default());
        } else {
            self.field = Some(local.to_vec());
        }
    }

    fn on_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let Some(field) = self.field.as_deref() else {
            return;
        };
        if let Some(customer) = self.pending.as_mut() {
            match field {
                b"TaxIdOrPersonalId" => customer.tax_id = Some(text.to_string()),
                b"Alias" => customer.alias = Some(text.to_string()),
                b"Type" => customer.kind = Some(text.to_string()),
                b"Name" => customer.title = Some(text.to_string()),
                b"RegisterTime" => customer.registered_at = Some(text.to_string()),
                b"AliasCreateDate" => customer.alias_created_at = Some(text.to_string()),
                b"IsExist" => customer.is_exist = text.eq_ignore_ascii_case("true"),
                _ => {}
            }
        } else {
            match field {
                b"ServiceResult" => self.service.result = text.to_string(),
                b"ServiceResultDescription" => self.service.description = text.to_string(),
                b"ErrorCode" => self.service.error_code = text.to_string(),
                _ => {}
            }
        }
    }

    fn on_end(&mut self, local: &[u8]) -> Option<ParsedCustomer> {
        self.field = None;
        if local == b"EInvoiceCustomerResult" {
            self.pending.take()
        } else {
            None
        }
    }
}

fn parse_customer_results(
    xml: &str,
) -> Result<(ServiceFields, Vec<ParsedCustomer>), EfaturaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut scanner = SoapScanner::default();
    let mut customers = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => scanner.on_start(e.local_name().as_ref()),
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().unwrap_or_default();
                scanner.on_text(&text);
            }
            Ok(Event::End(ref e)) => {
                if let Some(customer) = scanner.on_end(e.local_name().as_ref()) {
                    customers.push(customer);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_err(e)),
        }
    }
    Ok((scanner.service, customers))
}

/// Text of the first element whose local name matches, anywhere in the
/// response.
fn first_text(xml: &str, local: &[u8]) -> Result<Option<String>, EfaturaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut capture = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => capture = e.local_name().as_ref() == local,
            Ok(Event::Text(ref t)) if capture => {
                let text = t.unescape().unwrap_or_default();
                return Ok(Some(text.trim().to_string()));
            }
            Ok(Event::End(_)) => capture = false,
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(parse_err(e)),
        }
    }
}

fn ensure_service_successful(service: &ServiceFields) -> Result<(), EfaturaError> {
    if service.result.is_empty() || service.result.eq_ignore_ascii_case("successful") {
        return Ok(());
    }
    let code = if service.error_code.is_empty() {
        "-"
    } else {
        service.error_code.as_str()
    };
    let description = if service.description.is_empty() {
        "-"
    } else {
        service.description.as_str()
    };
    Err(EfaturaError::Protocol(format!(
        "taxpayer query failed (error code {code}): {description}"
    )))
}

/// Registry timestamps come as ISO strings with optional `T`/`Z`.
fn parse_registry_datetime(value: &str) -> Option<NaiveDateTime> {
    let cleaned = value.trim().replace('T', " ");
    let cleaned = cleaned.trim_end_matches('Z').trim();
    NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%d %H:%M:%S%.f").ok()
}

fn parse_err(e: quick_xml::Error) -> EfaturaError {
    EfaturaError::Protocol(format!("SOAP response could not be parsed: {e}"))
}
