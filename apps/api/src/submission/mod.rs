// Application intake: multipart form → validated submission → pipeline.

pub mod form;
pub mod handlers;
pub mod pipeline;
