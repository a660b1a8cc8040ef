// Quote assembly: configuration record → Quote envelope for the report collaborator,
// plus the HTTP handlers that expose layout, quote, breakdown and catalog.

pub mod assembly;
pub mod catalog;
pub mod handlers;
pub mod request;

pub use assembly::{assemble_quote, Quote};
pub use request::QuoteRequest;
