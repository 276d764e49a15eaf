use crate::{
    api::{MeterReader, ReaderSummary, Supervisor},
    state::table::Searchable,
};

const NOT_AVAILABLE: &str = "N/A";
const NOT_ASSIGNED: &str = "Not assigned";

impl Searchable for MeterReader {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.id.clone(),
            self.name.clone(),
            self.mobile.clone(),
            self.email.clone(),
            self.employee_code.clone(),
            self.agency.clone(),
            self.division_code.clone(),
            self.discom.clone(),
        ];
        fields.extend(self.pending_readings.map(|n| n.to_string()));
        fields.extend(self.total_assigned.map(|n| n.to_string()));
        fields.extend(self.completion_rate.clone());
        fields.extend(self.status.clone());
        fields
    }
}

pub fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Last six characters of the reader id.
pub fn short_id(id: &str) -> String {
    if id.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    let count = id.chars().count();
    id.chars().skip(count.saturating_sub(6)).collect()
}

pub fn name_label(name: &str) -> String {
    if name.trim().is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

pub fn pending_count(reader: &MeterReader) -> u32 {
    reader.pending_readings.unwrap_or(0)
}

pub fn completion_label(reader: &MeterReader) -> String {
    reader
        .completion_rate
        .as_deref()
        .filter(|rate| !rate.trim().is_empty())
        .unwrap_or("0%")
        .to_string()
}

/// Summary total when the server sent a non-zero one, else the row count.
pub fn total_label(summary: Option<&ReaderSummary>, record_count: usize) -> String {
    summary
        .map(|s| s.total_readers as usize)
        .filter(|total| *total > 0)
        .unwrap_or(record_count)
        .to_string()
}

pub fn avatar_initial(user: Option<&Supervisor>) -> String {
    user.and_then(|u| u.name.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "S".to_string())
}

pub fn assigned_or_default(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_ASSIGNED)
        .to_string()
}

/// "Showing 26-30 of 30" for a zero-based `[start, end)` slice.
pub fn range_label(start: usize, end: usize, total: usize) -> String {
    if total == 0 || start >= end {
        return "Showing 0 of 0".to_string();
    }
    format!("Showing {}-{} of {}", start + 1, end, total)
}

pub fn page_label(current: usize, total: usize) -> String {
    format!("Page {} of {}", if total == 0 { 0 } else { current }, total)
}
