//! Utility modules supporting catalog access and terminal output.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and user agent
//! - [`truncate_with_ellipsis`], [`truncate_at_word`]: unicode-aware truncation
//! - [`format_number`]: thousands separators for result counts
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use bookfinder::utils::HttpClient;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("bookfinder/0.1", Duration::from_secs(10))?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

mod display;
mod http;

pub use display::{
    book_table_columns, display_width, format_number, is_terminal, terminal_width,
    truncate_at_word, truncate_with_ellipsis,
};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
