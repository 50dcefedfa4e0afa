mod http_video_api;
mod mock_video_api;

pub use http_video_api::HttpVideoApi;
pub use mock_video_api::MockVideoApi;
