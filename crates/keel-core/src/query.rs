mod filter;
pub use filter::Filter;

mod state;
pub use state::{Combine, Condition, Connector, QueryState};
