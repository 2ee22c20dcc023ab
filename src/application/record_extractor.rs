//! Tabular record extraction
//!
//! The portal's report tables carry no stable column identifiers, so
//! extraction is position-based on purpose: exactly eleven data cells,
//! cells 0-6 and 8-10 fixed, cell 7 keyed by report kind (hire date vs
//! termination date). Loosening the threshold would silently admit garbage
//! rows or reject valid ones. Rows that fall short are dropped, not padded;
//! partial data beats aborting a whole report over one malformed row.

use tracing::debug;

use crate::domain::{EmployeeRecord, ReportKind};
use crate::infrastructure::document::{DocElement, DocumentView};

/// Minimum extractable cells for a row to become a record.
const MIN_CELLS: usize = 11;

/// Position of the kind-dependent event-date cell.
const EVENT_DATE_CELL: usize = 7;

/// Lazily extract records from a parsed report document. Re-invoking on
/// the same document yields an identical sequence; no state is carried
/// between rows.
pub fn extract(
    doc: &DocumentView,
    kind: ReportKind,
) -> impl Iterator<Item = EmployeeRecord> + '_ {
    doc.find_all("tr", &[])
        .into_iter()
        .filter_map(move |row| record_from_row(&row, kind))
}

/// Parse a report body and collect every extractable record.
pub fn extract_records(body: &str, kind: ReportKind) -> Vec<EmployeeRecord> {
    let doc = DocumentView::parse(body);
    extract(&doc, kind).collect()
}

fn record_from_row(row: &DocElement<'_>, kind: ReportKind) -> Option<EmployeeRecord> {
    // Header rows carry <th> cells.
    if row.find_first("th", &[]).is_some() {
        return None;
    }

    let cells: Vec<String> = row
        .find_all("td", &[])
        .iter()
        .map(DocElement::text)
        .collect();

    if cells.len() < MIN_CELLS {
        if !cells.is_empty() {
            debug!(
                "Dropping row with {} cell(s), need {}",
                cells.len(),
                MIN_CELLS
            );
        }
        return None;
    }

    let event_date = Some(cells[EVENT_DATE_CELL].clone());
    let (hire_date, termination_date) = match kind {
        ReportKind::NewHire => (event_date, None),
        ReportKind::Termination => (None, event_date),
    };

    Some(EmployeeRecord {
        first_name: cells[0].clone(),
        middle_name: cells[1].clone(),
        last_name: cells[2].clone(),
        suffix: cells[3].clone(),
        ssn: cells[4].clone(),
        address: cells[5].clone(),
        state: cells[6].clone(),
        hire_date,
        termination_date,
        birth_date: cells[8].clone(),
        received_date: cells[9].clone(),
        sent_date: cells[10].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLS: [&str; 11] = [
        "A",
        "",
        "B",
        "",
        "111-22-3333",
        "1 Main St",
        "IN",
        "2020-01-01",
        "1990-05-05",
        "2020-01-02",
        "2020-01-03",
    ];

    fn row_html(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    fn report_html(rows: &[String]) -> String {
        format!(
            "<html><body><table>\
             <tr><th>First</th><th>MI</th><th>Last</th></tr>\
             {}</table></body></html>",
            rows.join("")
        )
    }

    #[test]
    fn eleven_cell_row_yields_one_new_hire_record() {
        let body = report_html(&[row_html(&CELLS)]);
        let records = extract_records(&body, ReportKind::NewHire);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.first_name, "A");
        assert_eq!(record.last_name, "B");
        assert_eq!(record.ssn, "111-22-3333");
        assert_eq!(record.state, "IN");
        assert_eq!(record.hire_date.as_deref(), Some("2020-01-01"));
        assert_eq!(record.termination_date, None);
        assert_eq!(record.birth_date, "1990-05-05");
        assert_eq!(record.sent_date, "2020-01-03");
    }

    #[test]
    fn cell_seven_is_keyed_by_report_kind() {
        let body = report_html(&[row_html(&CELLS)]);

        let hires = extract_records(&body, ReportKind::NewHire);
        let terms = extract_records(&body, ReportKind::Termination);

        assert_eq!(hires[0].hire_date.as_deref(), Some("2020-01-01"));
        assert_eq!(hires[0].termination_date, None);
        assert_eq!(terms[0].termination_date.as_deref(), Some("2020-01-01"));
        assert_eq!(terms[0].hire_date, None);

        // Every other field is identical between kinds.
        assert_eq!(hires[0].first_name, terms[0].first_name);
        assert_eq!(hires[0].ssn, terms[0].ssn);
        assert_eq!(hires[0].birth_date, terms[0].birth_date);
        assert_eq!(hires[0].received_date, terms[0].received_date);
        assert_eq!(hires[0].sent_date, terms[0].sent_date);
    }

    #[test]
    fn short_rows_are_dropped_without_error() {
        let short = row_html(&CELLS[..10]);
        let body = report_html(&[short, row_html(&CELLS)]);

        let records = extract_records(&body, ReportKind::NewHire);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn header_rows_are_skipped() {
        let body = report_html(&[row_html(&CELLS)]);
        let records = extract_records(&body, ReportKind::NewHire);
        // The fixture's header row must not produce a record.
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn extra_cells_beyond_eleven_are_ignored() {
        let mut cells: Vec<&str> = CELLS.to_vec();
        cells.push("extra");
        let body = report_html(&[row_html(&cells)]);

        let records = extract_records(&body, ReportKind::NewHire);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sent_date, "2020-01-03");
    }

    #[test]
    fn cell_text_is_trimmed() {
        let padded: Vec<String> = CELLS.iter().map(|c| format!("  {c}\n ")).collect();
        let refs: Vec<&str> = padded.iter().map(String::as_str).collect();
        let body = report_html(&[row_html(&refs)]);

        let records = extract_records(&body, ReportKind::NewHire);
        assert_eq!(records[0].first_name, "A");
        assert_eq!(records[0].address, "1 Main St");
    }

    #[test]
    fn extraction_is_restartable() {
        let body = report_html(&[row_html(&CELLS), row_html(&CELLS)]);
        let doc = DocumentView::parse(&body);

        let first: Vec<_> = extract(&doc, ReportKind::NewHire).collect();
        let second: Vec<_> = extract(&doc, ReportKind::NewHire).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_body_yields_no_records() {
        let records = extract_records("<html><body></body></html>", ReportKind::Termination);
        assert!(records.is_empty());
    }
}
