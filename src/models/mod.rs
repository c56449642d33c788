//! Cloud Foundry API model types.

mod job;
mod organization;
mod resource;
mod service_instance;
mod space;
mod space_quota;

pub use job::*;
pub use organization::*;
pub use resource::*;
pub use service_instance::*;
pub use space::*;
pub use space_quota::*;
