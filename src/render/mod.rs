//! Rendering of analysis results to output records and JSON.

mod json;
mod result;

pub use json::{to_json, write_json, JsonFormat};
pub use result::{
    Diagnostics, ExtractedSection, Metadata, OutlineResult, PersonaResult, SubsectionAnalysis,
};
