//! The submission loop.
//!
//! For each row, in source order: map it to a [`ProductRecord`], print the
//! JSON, post it through a [`RecordSink`], then print the response body and a
//! blank line. The first error of any kind ends the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use product_loader::{submit_all, CsvSource, HttpSink, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::default();
//!     let source = CsvSource::open(&settings.input_path)?;
//!     let sink = HttpSink::from_settings(&settings)?;
//!
//!     let report = submit_all(source, &sink, &mut std::io::stdout()).await?;
//!     eprintln!("Submitted {} products", report.submitted);
//!     Ok(())
//! }
//! ```

use std::io::Write;

use tracing::debug;

use crate::error::{SourceResult, SubmitError, SubmitResult};
use crate::logs::{log_info_indent, log_warning};
use crate::models::{ProductRecord, Row};
use crate::sink::RecordSink;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Rows whose HTTP exchange completed, whatever the status.
    pub submitted: usize,
    /// Completed exchanges with a non-2xx status.
    pub non_success: usize,
}

/// Submit every row to the sink, writing payloads and responses to `out`.
///
/// Stops at the first source, record, sink or output error. The returned
/// error is [`SubmitError::Aborted`] carrying the number of rows already
/// submitted.
pub async fn submit_all<I, S, W>(rows: I, sink: &S, out: &mut W) -> SubmitResult<SubmitReport>
where
    I: IntoIterator<Item = SourceResult<Row>>,
    S: RecordSink,
    W: Write,
{
    let mut report = SubmitReport::default();

    for row in rows {
        if let Err(e) = submit_row(row, sink, out, &mut report).await {
            return Err(SubmitError::Aborted {
                submitted: report.submitted,
                source: Box::new(e),
            });
        }
    }

    Ok(report)
}

/// Print the JSON payload of every row without sending anything.
///
/// Returns the number of rows printed.
pub fn preview_all<I, W>(rows: I, out: &mut W) -> SubmitResult<usize>
where
    I: IntoIterator<Item = SourceResult<Row>>,
    W: Write,
{
    let mut printed = 0;
    for row in rows {
        render_row(&row?, out)?;
        printed += 1;
    }
    Ok(printed)
}

async fn submit_row<S, W>(
    row: SourceResult<Row>,
    sink: &S,
    out: &mut W,
    report: &mut SubmitReport,
) -> SubmitResult<()>
where
    S: RecordSink,
    W: Write,
{
    let row = row?;
    let payload = render_row(&row, out)?;

    let response = sink.send(&payload).await?;
    report.submitted += 1;

    if !response.is_success() {
        report.non_success += 1;
        log_warning(format!("Line {}: HTTP {}", row.line, response.status));
    }

    write!(out, "{}\n\n", response.body)?;
    out.flush()?;
    Ok(())
}

/// Map, serialize and print one row. Returns the payload.
fn render_row<W: Write>(row: &Row, out: &mut W) -> SubmitResult<String> {
    let record = ProductRecord::from_row(row)?;
    let payload = record.to_json()?;

    debug!(line = row.line, lot_number = %record.lot_number, "product record ready");
    log_info_indent(format!("Line {}: {}", row.line, record.lot_number), 1);

    writeln!(out, "{}", payload)?;
    out.flush()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RecordError, SinkError, SinkResult, SourceError};
    use crate::sink::SinkResponse;
    use crate::source::{parse_rows, CsvSource};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records payloads and replays scripted responses.
    #[derive(Default)]
    struct FakeSink {
        sent: RefCell<Vec<String>>,
        script: RefCell<VecDeque<Option<SinkResponse>>>,
    }

    impl FakeSink {
        fn scripted(responses: Vec<Option<SinkResponse>>) -> Self {
            Self {
                sent: RefCell::default(),
                script: RefCell::new(responses.into()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.borrow().clone()
        }
    }

    /// A real transport-class error without touching the network.
    fn transport_error() -> SinkError {
        let err = reqwest::Client::new()
            .post("not a url")
            .build()
            .unwrap_err();
        SinkError::Transport(err)
    }

    impl RecordSink for FakeSink {
        async fn send(&self, payload: &str) -> SinkResult<SinkResponse> {
            self.sent.borrow_mut().push(payload.to_string());
            let n = self.sent.borrow().len();
            match self.script.borrow_mut().pop_front() {
                Some(Some(response)) => Ok(response),
                Some(None) => Err(transport_error()),
                None => Ok(SinkResponse::new(200, format!("{{\"id\":\"rec{}\"}}", n))),
            }
        }
    }

    fn rows(csv: &str) -> Vec<SourceResult<Row>> {
        parse_rows(csv).unwrap().into_iter().map(Ok).collect()
    }

    #[tokio::test]
    async fn test_widget_output() {
        let sink = FakeSink::default();
        let mut out = Vec::new();

        let report = submit_all(rows("L100,Widget,250,10,kg,Y\n"), &sink, &mut out)
            .await
            .unwrap();

        let expected_payload = r#"{"lotNumber":"L100","label":"Widget","price":"250","kg":"10","unit":"kg","is_active":true,"priceByWeight":true}"#;
        assert_eq!(sink.sent(), vec![expected_payload.to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n{{\"id\":\"rec1\"}}\n\n", expected_payload)
        );
        assert_eq!(report, SubmitReport { submitted: 1, non_success: 0 });
    }

    #[tokio::test]
    async fn test_rows_sent_in_order() {
        let sink = FakeSink::default();
        let mut out = Vec::new();
        let csv = "A,a,1,1,kg,Y\nB,b,2,2,kg,N\nC,c,3,3,pc,y\n";

        let report = submit_all(rows(csv), &sink, &mut out).await.unwrap();

        let lots: Vec<String> = sink
            .sent()
            .iter()
            .map(|p| serde_json::from_str::<ProductRecord>(p).unwrap().lot_number)
            .collect();
        assert_eq!(lots, vec!["A", "B", "C"]);
        assert_eq!(report.submitted, 3);
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let sink = FakeSink::default();
        let mut out = Vec::new();

        let report = submit_all(rows(""), &sink, &mut out).await.unwrap();

        assert!(sink.sent().is_empty());
        assert!(out.is_empty());
        assert_eq!(report, SubmitReport::default());
    }

    #[tokio::test]
    async fn test_short_row_stops_run() {
        let sink = FakeSink::default();
        let mut out = Vec::new();
        let csv = "A,a,1,1,kg,Y\nB,b,2,2,kg\nC,c,3,3,pc,N\n";

        let err = submit_all(CsvSource::from_reader(csv.as_bytes()), &sink, &mut out)
            .await
            .unwrap_err();

        assert_eq!(sink.sent().len(), 1);
        assert_eq!(err.submitted(), 1);
        match err {
            SubmitError::Aborted { source, .. } => assert!(matches!(
                *source,
                SubmitError::Source(SourceError::Read { line: 2, .. })
            )),
            other => panic!("expected Aborted, got {:?}", other),
        }
        assert!(!String::from_utf8(out).unwrap().contains("\"C\""));
    }

    #[tokio::test]
    async fn test_wider_row_stops_run() {
        let sink = FakeSink::default();
        let mut out = Vec::new();
        let csv = "A,a,1,1,kg,Y\nB,b,2,2,kg,N,x\nC,c,3,3,pc,N\n";

        let err = submit_all(CsvSource::from_reader(csv.as_bytes()), &sink, &mut out)
            .await
            .unwrap_err();

        assert_eq!(sink.sent().len(), 1);
        match err {
            SubmitError::Aborted { submitted: 1, source } => assert!(matches!(
                *source,
                SubmitError::Source(SourceError::Read { line: 2, .. })
            )),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_narrow_first_row_stops_run() {
        let sink = FakeSink::default();
        let mut out = Vec::new();

        let err = submit_all(rows("A,a,1,1,kg\nB,b,2,2,kg\n"), &sink, &mut out)
            .await
            .unwrap_err();

        assert!(sink.sent().is_empty());
        match err {
            SubmitError::Aborted { submitted: 0, source } => assert!(matches!(
                *source,
                SubmitError::Record(RecordError::MissingField { line: 1, found: 5, .. })
            )),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_success_printed_and_continues() {
        let sink = FakeSink::scripted(vec![
            Some(SinkResponse::new(400, r#"{"code":400,"message":"Failed to create record."}"#)),
            Some(SinkResponse::new(200, r#"{"id":"ok"}"#)),
        ]);
        let mut out = Vec::new();

        let report = submit_all(rows("A,a,1,1,kg,Y\nB,b,2,2,kg,N\n"), &sink, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("{\"code\":400,\"message\":\"Failed to create record.\"}\n\n"));
        assert!(text.ends_with("{\"id\":\"ok\"}\n\n"));
        assert_eq!(report, SubmitReport { submitted: 2, non_success: 1 });
    }

    #[tokio::test]
    async fn test_transport_error_stops_run() {
        let sink = FakeSink::scripted(vec![
            Some(SinkResponse::new(200, "{}")),
            None,
        ]);
        let mut out = Vec::new();
        let csv = "A,a,1,1,kg,Y\nB,b,2,2,kg,N\nC,c,3,3,pc,N\n";

        let err = submit_all(rows(csv), &sink, &mut out).await.unwrap_err();

        assert_eq!(sink.sent().len(), 2);
        assert_eq!(err.submitted(), 1);
        match err {
            SubmitError::Aborted { source, .. } => {
                assert!(matches!(*source, SubmitError::Sink(SinkError::Transport(_))))
            }
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_error_stops_run() {
        let bytes: &[u8] = b"A,a,1,1,kg,Y\nB,\xff,2,2,kg,N\nC,c,3,3,pc,N\n";
        let sink = FakeSink::default();
        let mut out = Vec::new();

        let err = submit_all(CsvSource::from_reader(bytes), &sink, &mut out)
            .await
            .unwrap_err();

        assert_eq!(sink.sent().len(), 1);
        match err {
            SubmitError::Aborted { submitted: 1, source } => assert!(matches!(
                *source,
                SubmitError::Source(SourceError::Read { line: 2, .. })
            )),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_prints_payloads_only() {
        let mut out = Vec::new();

        let printed = preview_all(rows("A,a,1,1,kg,Y\nB,b,2,2,kg,N\n"), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(printed, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"lotNumber\":\"A\""));
        assert!(lines[1].contains("\"priceByWeight\":false"));
    }

    #[test]
    fn test_preview_short_row_fails() {
        let mut out = Vec::new();
        let err = preview_all(rows("A,a,1\n"), &mut out).unwrap_err();
        assert!(matches!(err, SubmitError::Record(RecordError::MissingField { .. })));
    }
}
