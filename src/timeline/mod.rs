pub mod expand;
pub mod filter;
pub mod matches;
pub mod playback;
pub mod state;

pub use expand::*;
pub use filter::*;
pub use matches::*;
pub use playback::*;
pub use state::*;
