pub mod lookup;
pub mod search;

pub use lookup::*;
pub use search::*;
