use std::time::Duration;

use engine_logging::engine_debug;
use repricer_core::{DocumentRef, TableSnapshot, UpdateInstruction};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::store::{StoreError, TableStore};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const USER_ENTERED: &str = "USER_ENTERED";

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub sheets_base_url: String,
    pub drive_base_url: String,
    /// A1 range read for snapshots; without a sheet name it targets the
    /// first sheet of the document.
    pub values_range: String,
    pub access_token: String,
    pub request_timeout: Duration,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            sheets_base_url: "https://sheets.googleapis.com".to_string(),
            drive_base_url: "https://www.googleapis.com".to_string(),
            values_range: "A:Z".to_string(),
            access_token: String::new(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Google Sheets (values) and Drive (document lookup) over REST.
#[derive(Debug, Clone)]
pub struct SheetsStore {
    client: reqwest::Client,
    settings: SheetsSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'static str,
    data: Vec<CellWrite<'a>>,
}

#[derive(Debug, Serialize)]
struct CellWrite<'a> {
    range: &'a str,
    values: [[&'a str; 1]; 1],
}

impl SheetsStore {
    pub fn new(settings: SheetsSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn find_spreadsheets(&self, name: Option<&str>) -> Result<Vec<DocumentRef>, StoreError> {
        let mut query = format!("mimeType='{SPREADSHEET_MIME}' and trashed=false");
        if let Some(name) = name {
            query.push_str(&format!(" and name='{}'", escape_query_literal(name)));
        }

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = endpoint(&self.settings.drive_base_url, &["drive", "v3", "files"])?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs
                    .append_pair("q", &query)
                    .append_pair("fields", "nextPageToken,files(id,name)")
                    .append_pair("pageSize", "100");
                if let Some(token) = page_token.as_deref() {
                    pairs.append_pair("pageToken", token);
                }
            }

            let page: FileList = self.send_json(self.client.get(url)).await?;
            documents.extend(page.files.into_iter().map(|file| DocumentRef {
                id: file.id,
                name: file.name,
            }));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(documents)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request
            .bearer_auth(&self.settings.access_token)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(StoreError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl TableStore for SheetsStore {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError> {
        self.find_spreadsheets(None).await
    }

    async fn open_document(&self, name: &str) -> Result<DocumentRef, StoreError> {
        self.find_spreadsheets(Some(name))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::DocumentNotFound(name.to_string()))
    }

    async fn snapshot(&self, document: &DocumentRef) -> Result<TableSnapshot, StoreError> {
        let mut url = endpoint(
            &self.settings.sheets_base_url,
            &[
                "v4",
                "spreadsheets",
                document.id.as_str(),
                "values",
                self.settings.values_range.as_str(),
            ],
        )?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");

        let range: ValueRange = self.send_json(self.client.get(url)).await?;
        let rows = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(TableSnapshot::new(rows))
    }

    async fn batch_update(
        &self,
        document: &DocumentRef,
        updates: &[UpdateInstruction],
    ) -> Result<(), StoreError> {
        let url = endpoint(
            &self.settings.sheets_base_url,
            &["v4", "spreadsheets", document.id.as_str(), "values:batchUpdate"],
        )?;
        let body = BatchUpdateRequest {
            value_input_option: USER_ENTERED,
            data: updates
                .iter()
                .map(|update| CellWrite {
                    range: update.address.as_str(),
                    values: [[update.value.as_str()]],
                })
                .collect(),
        };

        self.send(self.client.post(url).json(&body)).await?;
        engine_debug!("batch update of {} cells sent to {}", updates.len(), document.name);
        Ok(())
    }
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base).map_err(|err| StoreError::Endpoint(format!("{base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Endpoint(format!("{base}: cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Drive query string literals escape `\` and `'` with a backslash.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
