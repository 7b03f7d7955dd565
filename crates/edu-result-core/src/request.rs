//! Lookup request carried inside the request envelope

use serde::{Deserialize, Serialize};

/// Parameters identifying one upstream result query.
///
/// `reg` is the registration number. `mobileNumber` is optional contact
/// information that only travels to the mirror backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub exam: String,
    pub year: String,
    pub board: String,
    pub roll: String,
    pub reg: String,
    #[serde(
        rename = "mobileNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mobile_number: Option<String>,
}

impl LookupRequest {
    pub fn new(
        exam: impl Into<String>,
        year: impl Into<String>,
        board: impl Into<String>,
        roll: impl Into<String>,
        reg: impl Into<String>,
    ) -> Self {
        Self {
            exam: exam.into(),
            year: year.into(),
            board: board.into(),
            roll: roll.into(),
            reg: reg.into(),
            mobile_number: None,
        }
    }

    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }
}
