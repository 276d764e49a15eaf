use crate::state::session::{is_valid_otp_code, OTP_LENGTH};

pub fn countdown_label(seconds: u32) -> String {
    format!("Resend OTP in {}s", seconds)
}

pub fn can_submit(digits: &str, pending: bool) -> bool {
    !pending && is_valid_otp_code(digits)
}

/// Subtitle shown under the OTP heading.
pub fn destination_hint(supervisor_id: &str) -> String {
    format!(
        "Enter the {}-digit code sent for supervisor {}",
        OTP_LENGTH, supervisor_id
    )
}
