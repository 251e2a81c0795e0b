pub mod gemini;
pub mod meaning;
