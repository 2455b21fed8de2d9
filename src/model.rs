pub use subscriber::*;
pub use timestamp::*;
pub use user::*;
pub use video::*;

mod subscriber;
mod timestamp;
mod user;
mod video;
