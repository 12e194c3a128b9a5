//! Request resolution: turning a read-only target into one concrete,
//! executable request per attempt.
mod builder;
mod descriptor;


pub use builder::RequestBuilder;
pub use descriptor::{Credentials, RequestDescriptor};
