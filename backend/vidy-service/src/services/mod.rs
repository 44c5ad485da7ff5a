/// Business logic layer
///
/// Multi-step flows that touch more than one repository or the media store.
/// Single-query operations are called straight from the handlers.
pub mod media;
pub mod users;
pub mod videos;

pub use media::UploadedFile;
pub use users::UserService;
pub use videos::VideoService;
