mod video_input_form;

pub use video_input_form::{FormError, VideoInputForm};
