pub mod blob;

mod coerce;
pub use coerce::{from_backend, parse_lenient_number, to_backend, Coercion, DefaultCoercion};

mod operator;
pub use operator::Operator;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
