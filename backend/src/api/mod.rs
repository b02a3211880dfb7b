pub mod ads;
pub mod analysis;
pub mod crawler;
pub mod proxy;
pub mod setup;
pub mod system;

pub use ads::*;
pub use analysis::*;
pub use crawler::*;
pub use proxy::*;
pub use setup::*;
pub use system::*;
