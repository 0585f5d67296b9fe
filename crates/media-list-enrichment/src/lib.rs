pub mod error;
pub mod gemini;
pub mod parser;
pub mod traits;

pub use error::EnrichmentError;
pub use gemini::GeminiClient;
pub use parser::{extract_json_object, parse_details};
pub use traits::{EnrichmentClient, Unconfigured};
