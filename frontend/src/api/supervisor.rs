use super::{
    client::ApiClient,
    types::{
        ApiError, FetchRecordsResult, MeterReadersRequest, MeterReadersResponse,
        OtpGenerationRequest, OtpGenerationResponse, OtpRequestResult, OtpValidationRequest,
        OtpValidationResponse, OtpVerifyResult, ReqType,
    },
};

impl ApiClient {
    pub async fn request_otp(&self, supervisor_id: &str) -> Result<OtpRequestResult, ApiError> {
        let body = OtpGenerationRequest::new(supervisor_id.trim());
        let response: OtpGenerationResponse =
            self.post_json(ReqType::OtpGeneration, &body, None).await?;
        Ok(response.into())
    }

    pub async fn verify_otp(
        &self,
        supervisor_id: &str,
        otp: &str,
        temp_token: &str,
    ) -> Result<OtpVerifyResult, ApiError> {
        let body = OtpValidationRequest::new(supervisor_id, otp, temp_token);
        let response: OtpValidationResponse =
            self.post_json(ReqType::OtpValidation, &body, None).await?;
        Ok(response.into())
    }

    pub async fn fetch_meter_readers(
        &self,
        supervisor_id: &str,
        access_token: &str,
    ) -> Result<FetchRecordsResult, ApiError> {
        let body = MeterReadersRequest::new(supervisor_id);
        let response: MeterReadersResponse = self
            .post_json(ReqType::GetMeterReaders, &body, Some(access_token))
            .await?;
        Ok(response.into())
    }
}
