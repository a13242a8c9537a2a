mod report_payload;

pub use report_payload::{
    sanitize_custom_parameters, ReportForm, ReportPayload, RESERVED_PAYLOAD_KEYS,
};
