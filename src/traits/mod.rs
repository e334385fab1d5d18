pub mod driver;
pub mod populate;
pub mod provider;

pub use driver::{CreateFlag, Driver, DriverFlags, HostState};
pub use populate::{Populate, PopulateContext};
pub use provider::{BaseDriverOptions, HostProvider};
