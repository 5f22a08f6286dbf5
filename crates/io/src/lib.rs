//! # cauce-io
//!
//! Read gridded climate model output from NetCDF and basin tables from CSV;
//! write result tables as CSV, JSON and LaTeX.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A[".nc file"] -->|"read_gridded()"| B["GriddedDataset"]
//!     C[".csv file"] -->|"Table::read_csv()"| D["Table"]
//!     E["Serialize rows"] -->|"write_csv() / write_json()"| F[".csv / .json"]
//!     G["LatexTable"] -->|"latex_table()"| H[".tex"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::path::Path;
//! use cauce_io::{GridReaderConfig, TimeAxis, read_gridded};
//!
//! let config = GridReaderConfig::default()
//!     .with_time_axis(TimeAxis::MonthlyFrom { year: 1980, month: 1 });
//! let dataset = read_gridded(Path::new("tas_maipo.nc"), &config)?;
//! println!("{:?}", dataset.names());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `reader` | Gridded NetCDF reader configuration |
//! | `netcdf_read` | Low-level NetCDF access and CF time decoding |
//! | `table` | CSV tables with typed columns |
//! | `writer` | CSV, JSON and text output |
//! | `latex` | LaTeX table rendering |
//! | `error` | Error types |

mod error;
mod latex;
mod netcdf_read;
mod reader;
mod table;
mod writer;

pub use error::IoError;
pub use latex::{LatexTable, escape_latex, format_pm, latex_table};
pub use reader::{GridReaderConfig, TimeAxis, read_gridded};
pub use table::{Table, TableConfig};
pub use writer::{write_csv, write_json, write_records, write_text};
