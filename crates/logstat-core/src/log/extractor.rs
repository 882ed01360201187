use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

// Example line:
// 1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927
// "-" "Lynx/2.8.8dev.9 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/2.10.5" "-"
// "1498697422-2190034393-4708-9752759" "dc7161be3" 0.390
//
// The duration is taken from the last whitespace-delimited field. Nothing checks
// that this field really is the request time, so a log format whose last field
// is some other number will be silently misread.
lazy_static! {
    static ref LINE_PATTERN: Regex = Regex::new(
        r"^.+?(?:GET|POST|PUT|DELETE|HEAD|CONNECT|OPTIONS|TRACE)(?P<url>.+?)(?:\?|HTTP).*\s(?P<time>[\d.]+)\s*$"
    )
    .unwrap();
}

/// One (url, duration) observation taken from a log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub url: String,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Line does not have the method / url / trailing duration shape
    NoMatch,
    /// Method token was found but the url between it and `?`/`HTTP` is blank
    EmptyUrl,
    /// Trailing field is not a finite, non-negative decimal
    InvalidDuration(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoMatch => write!(f, "line does not match the access log pattern"),
            FailureReason::EmptyUrl => write!(f, "empty url"),
            FailureReason::InvalidDuration(raw) => write!(f, "invalid duration '{}'", raw),
        }
    }
}

/// A line the extractor could not turn into a [`LogRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub line_index: usize,
    pub raw_line: String,
    pub reason: FailureReason,
}

pub struct RecordExtractor;

impl RecordExtractor {
    /// Extract the url path and request duration from a single log line.
    ///
    /// `line_index` is only used to label a failure.
    pub fn extract(line_index: usize, line: &str) -> Result<LogRecord, ParseFailure> {
        let fail = |reason| ParseFailure {
            line_index,
            raw_line: line.to_string(),
            reason,
        };

        let caps = LINE_PATTERN
            .captures(line)
            .ok_or_else(|| fail(FailureReason::NoMatch))?;

        let url = caps["url"].trim();
        if url.is_empty() {
            return Err(fail(FailureReason::EmptyUrl));
        }

        let raw_time = &caps["time"];
        let duration = match raw_time.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            _ => return Err(fail(FailureReason::InvalidDuration(raw_time.to_string()))),
        };

        Ok(LogRecord {
            url: url.to_string(),
            duration,
        })
    }
}
