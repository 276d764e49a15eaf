use std::rc::Rc;

use crate::{
    api::{ApiClient, ApiError, FetchRecordsResult, MeterReader, ReaderSummary},
    state::session::Session,
};

const MSG_FETCH_FAILED: &str = "Failed to fetch meter readers data";
const MSG_FETCH_NETWORK: &str = "Network error occurred while fetching data";

/// One successful fetch: the full record set and the optional summary.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadersSnapshot {
    pub readers: Vec<MeterReader>,
    pub summary: Option<ReaderSummary>,
}

#[derive(Clone)]
pub struct ReadersRepository {
    client: Rc<ApiClient>,
}

impl ReadersRepository {
    pub fn new_with_client(client: Rc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, session: &Session) -> Result<ReadersSnapshot, ApiError> {
        match self
            .client
            .fetch_meter_readers(&session.user.id, &session.token)
            .await
        {
            Ok(FetchRecordsResult::Fetched { readers, summary }) => {
                log::info!("loaded {} meter readers", readers.len());
                Ok(ReadersSnapshot { readers, summary })
            }
            Ok(FetchRecordsResult::Rejected { message }) => Err(ApiError::rejected(
                message.unwrap_or_else(|| MSG_FETCH_FAILED.into()),
            )),
            Err(err) => {
                log::warn!("meter reader fetch failed: {}", err);
                Err(ApiError::request_failed(MSG_FETCH_NETWORK))
            }
        }
    }
}
