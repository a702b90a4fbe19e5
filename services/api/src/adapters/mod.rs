pub mod document_text;
pub mod generation_llm;

pub use document_text::PdfTextExtractor;
pub use generation_llm::OpenAiGenerationAdapter;
