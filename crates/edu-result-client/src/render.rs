//! Plain-text rendering of a result record for terminals

use std::fmt::Write;

use edu_result_core::ResultRecord;

/// Render the summary, student details and grade sheet
pub fn render_record(record: &ResultRecord) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{} - {}", record.summary.result, record.exam);
    let _ = writeln!(out, "GPA: {}", record.summary.gpa);
    let _ = writeln!(out);

    let rows = record.student_info.display_rows();
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "{:<width$}  {}", label, value, width = label_width);
    }

    if !record.subjects.is_empty() {
        let _ = writeln!(out);
        let name_width = record
            .subjects
            .iter()
            .map(|s| s.name.len())
            .chain(std::iter::once("Subject".len()))
            .max()
            .unwrap_or(0);

        let _ = writeln!(out, "{:<6} {:<width$} {}", "Code", "Subject", "Grade", width = name_width);
        for subject in &record.subjects {
            let _ = writeln!(
                out,
                "{:<6} {:<width$} {}",
                subject.code,
                subject.name,
                subject.grade,
                width = name_width
            );
        }
    }

    out
}
