pub mod detect;
pub mod driver;
pub mod error;
pub mod interrupt;
pub mod player;
pub mod registry;
pub mod request;

pub use detect::detect;
pub use driver::{Device, Driver, DriverKind, OpenHandle, ToneDevice};
pub use error::Error;
pub use interrupt::{Delivery, Interrupt, Pause};
pub use player::Player;
pub use registry::Registry;
pub use request::{RequestChain, RequestError, StdinTrigger, ToneRequest};
