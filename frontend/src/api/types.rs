use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Discriminator sent both in the body (`reqType`) and as the `type` query
/// parameter of the supervisor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReqType {
    OtpGeneration,
    OtpValidation,
    GetMeterReaders,
}

impl ReqType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReqType::OtpGeneration => "OTP_GENERATION",
            ReqType::OtpValidation => "OTP_VALIDATION",
            ReqType::GetMeterReaders => "GET_METER_READERS",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpGenerationRequest {
    pub req_type: ReqType,
    pub supervisor_id: String,
}

impl OtpGenerationRequest {
    pub fn new(supervisor_id: impl Into<String>) -> Self {
        Self {
            req_type: ReqType::OtpGeneration,
            supervisor_id: supervisor_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpValidationRequest {
    pub req_type: ReqType,
    pub supervisor_id: String,
    pub otp: String,
    pub temp_token: String,
}

impl OtpValidationRequest {
    pub fn new(
        supervisor_id: impl Into<String>,
        otp: impl Into<String>,
        temp_token: impl Into<String>,
    ) -> Self {
        Self {
            req_type: ReqType::OtpValidation,
            supervisor_id: supervisor_id.into(),
            otp: otp.into(),
            temp_token: temp_token.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReadersRequest {
    pub req_type: ReqType,
    pub supervisor_id: String,
}

impl MeterReadersRequest {
    pub fn new(supervisor_id: impl Into<String>) -> Self {
        Self {
            req_type: ReqType::GetMeterReaders,
            supervisor_id: supervisor_id.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpGenerationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub temp_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpValidationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub supervisor: Option<Supervisor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReadersResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub meter_readers: Option<Vec<MeterReader>>,
    #[serde(default)]
    pub summary: Option<ReaderSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpRequestResult {
    Sent {
        temp_token: String,
        message: Option<String>,
    },
    Rejected {
        message: Option<String>,
    },
}

impl From<OtpGenerationResponse> for OtpRequestResult {
    fn from(response: OtpGenerationResponse) -> Self {
        match (response.success, non_empty(response.temp_token)) {
            (true, Some(temp_token)) => OtpRequestResult::Sent {
                temp_token,
                message: non_empty(response.message),
            },
            _ => OtpRequestResult::Rejected {
                message: non_empty(response.message),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OtpVerifyResult {
    Verified {
        access_token: String,
        supervisor: Supervisor,
    },
    Rejected {
        message: Option<String>,
    },
}

impl From<OtpValidationResponse> for OtpVerifyResult {
    fn from(response: OtpValidationResponse) -> Self {
        match (
            response.success,
            non_empty(response.access_token),
            response.supervisor.filter(|s| !s.id.trim().is_empty()),
        ) {
            (true, Some(access_token), Some(supervisor)) => OtpVerifyResult::Verified {
                access_token,
                supervisor,
            },
            _ => OtpVerifyResult::Rejected {
                message: non_empty(response.message),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchRecordsResult {
    Fetched {
        readers: Vec<MeterReader>,
        summary: Option<ReaderSummary>,
    },
    Rejected {
        message: Option<String>,
    },
}

impl From<MeterReadersResponse> for FetchRecordsResult {
    fn from(response: MeterReadersResponse) -> Self {
        match (response.success, response.meter_readers) {
            (true, Some(readers)) => FetchRecordsResult::Fetched {
                readers,
                summary: response.summary,
            },
            _ => FetchRecordsResult::Rejected {
                message: non_empty(response.message),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mobile: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub discom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReader {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub mobile: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub employee_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub agency: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub division_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub discom: String,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub pending_readings: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub total_assigned: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub completion_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaderSummary {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_readers: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub active_readers: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_pending: u32,
}

/// The supervisor backend is loose about JSON types: ids and counters show up
/// as numbers or as strings depending on the row.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(de: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_string(de)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(de)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn count<'de, D>(de: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_count(de)?.unwrap_or_default())
    }

    pub fn opt_count<'de, D>(de: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(de)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl ApiError {
    fn with_code(msg: impl Into<String>, code: &str) -> Self {
        Self {
            error: msg.into(),
            code: code.to_string(),
            details: None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_code(msg, "VALIDATION_ERROR")
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::with_code(msg, "REJECTED")
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::with_code(msg, "REQUEST_FAILED")
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::with_code(msg, "INVALID_RESPONSE")
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_code(msg, "STORAGE_ERROR")
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_validation(&self) -> bool {
        self.code == "VALIDATION_ERROR"
    }

    /// Transport and decode failures; both are shown to the user as a network error.
    pub fn is_transport(&self) -> bool {
        self.code == "REQUEST_FAILED" || self.code == "INVALID_RESPONSE"
    }
}
