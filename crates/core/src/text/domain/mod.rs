pub mod caption_text;
pub mod input_validator;
pub mod segmenter;
pub mod word_wrap;
