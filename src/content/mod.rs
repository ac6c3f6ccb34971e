// Content module - lessons, learner profiles, uploads, and the transformation contract

pub mod glossary;
mod lesson;
mod profile;
pub mod transform;
mod upload;

pub use lesson::{Lesson, LessonSection};
pub use profile::{AudioAssist, LearnerProfile};
pub use transform::{
    fallback_content, TransformError, TransformRequest, TransformService, TransformedContent,
    Transformer, UnconfiguredTransformer,
};
pub use upload::{is_text_file, load_text_file, UploadError};
