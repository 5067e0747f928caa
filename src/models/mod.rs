mod attendee;
mod registration;

pub use attendee::*;
pub use registration::*;
