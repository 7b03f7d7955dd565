//! Result record returned by the upstream exam board
//!
//! The upstream format is not under our control, so every field defaults when
//! absent and unknown student fields are kept in [`StudentInfo::extra`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default)]
    pub student_info: StudentInfo,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub summary: ResultSummary,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub exam: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<EchoedRequest>,
}

/// Student details as labelled by the exam board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(rename = "Roll No", default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Board", default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(rename = "Fathers Name", default, skip_serializing_if = "Option::is_none")]
    pub fathers_name: Option<String>,
    #[serde(rename = "Group", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "Mothers Name", default, skip_serializing_if = "Option::is_none")]
    pub mothers_name: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub student_type: Option<String>,
    #[serde(rename = "Date of Birth", default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(rename = "Result", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "Institute", default, skip_serializing_if = "Option::is_none")]
    pub institute: Option<String>,
    #[serde(rename = "Reg No", default, skip_serializing_if = "Option::is_none")]
    pub reg_no: Option<String>,
    /// Fields the board sends that are not listed above
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StudentInfo {
    /// Labelled fields in display order, skipping those the board left out.
    ///
    /// `Reg No` is always present and falls back to "N/A".
    pub fn display_rows(&self) -> Vec<(&'static str, &str)> {
        let fields: [(&'static str, &Option<String>); 10] = [
            ("Name", &self.name),
            ("Father's Name", &self.fathers_name),
            ("Mother's Name", &self.mothers_name),
            ("Institute", &self.institute),
            ("Board", &self.board),
            ("Roll No", &self.roll_no),
            ("Group", &self.group),
            ("Type", &self.student_type),
            ("Date of Birth", &self.date_of_birth),
            ("Result", &self.result),
        ];

        let mut rows: Vec<(&'static str, &str)> = fields
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
            .collect();

        let reg = self.reg_no.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A");
        let position = rows
            .iter()
            .position(|(label, _)| *label == "Roll No")
            .map(|i| i + 1)
            .unwrap_or(rows.len());
        rows.insert(position, ("Reg No", reg));
        rows
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grade: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde(rename = "GPA", default)]
    pub gpa: String,
    #[serde(rename = "Result", default)]
    pub result: String,
}

/// Copy of the lookup parameters as echoed back in the record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedRequest {
    #[serde(default)]
    pub exam: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub board: String,
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub reg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "studentInfo": {
                "Roll No": "123456",
                "Name": "RAHIM UDDIN",
                "Board": "DHAKA",
                "Fathers Name": "KARIM UDDIN",
                "Group": "SCIENCE",
                "Mothers Name": "AMENA BEGUM",
                "Type": "REGULAR",
                "Date of Birth": "01-01-2007",
                "Result": "PASSED",
                "Institute": "DHAKA COLLEGIATE SCHOOL",
                "Reg No": "987654321",
                "Session": "2021-22"
            },
            "subjects": [
                {"code": "101", "name": "BANGLA", "grade": "A+"},
                {"code": "107", "name": "ENGLISH", "grade": "A"}
            ],
            "summary": {"GPA": "5.00", "Result": "Passed"},
            "success": true,
            "exam": "SSC",
            "timestamp": "2024-05-12T10:00:00Z",
            "request": {
                "exam": "ssc", "year": "2023", "board": "dhaka",
                "roll": "123456", "reg": "987654321"
            }
        })
    }

    #[test]
    fn test_parse_full_record() {
        let record: ResultRecord = serde_json::from_value(sample()).unwrap();

        assert!(record.success);
        assert_eq!(record.summary.gpa, "5.00");
        assert_eq!(record.student_info.name.as_deref(), Some("RAHIM UDDIN"));
        assert_eq!(record.student_info.fathers_name.as_deref(), Some("KARIM UDDIN"));
        assert_eq!(record.subjects.len(), 2);
        assert_eq!(record.subjects[0].grade, "A+");
        assert_eq!(record.request.unwrap().reg, "987654321");
        assert_eq!(record.student_info.extra.get("Session"), Some(&json!("2021-22")));
    }

    #[test]
    fn test_parse_sparse_record() {
        let record: ResultRecord =
            serde_json::from_value(json!({"success": false})).unwrap();

        assert!(!record.success);
        assert!(record.subjects.is_empty());
        assert!(record.request.is_none());
    }

    #[test]
    fn test_subject_order_preserved() {
        let record: ResultRecord = serde_json::from_value(sample()).unwrap();
        let codes: Vec<_> = record.subjects.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["101", "107"]);
    }

    #[test]
    fn test_display_rows_reg_fallback() {
        let info = StudentInfo {
            name: Some("A".into()),
            roll_no: Some("1".into()),
            ..Default::default()
        };

        let rows = info.display_rows();
        assert_eq!(rows, vec![("Name", "A"), ("Roll No", "1"), ("Reg No", "N/A")]);
    }
}
