pub mod feed;
pub mod genai;
pub mod normalizer;
