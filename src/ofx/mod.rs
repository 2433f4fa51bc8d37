//! Statement protocol: rendering, validation, fetching and combining

pub mod combine;
pub mod fetch;
pub mod render;
pub mod validate;

pub use combine::{combine, combine_at, combine_files, combine_to_file, MessageGroup, SIGNON_ORG};
pub use fetch::{collect_statements, FetchFailure, StatementBatch, StatementFetcher};
pub use render::{aggregate, date_time_str, field, format_timestamp, SGML_HEADER};
pub use validate::{validate, StatementIssue};
