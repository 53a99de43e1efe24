//! Input parsing, cell values and normalized rows.

mod parser;
mod row;
mod source;
mod value;
mod workbook;

pub use parser::{Parser, ParserConfig};
pub use row::{Row, normalize_column_name};
pub use source::{Sheet, SourceMetadata};
pub use value::{
    Scalar, ScalarKind, datetime_to_serial, format_datetime, format_number, serial_to_datetime,
};
pub use workbook::Workbook;
