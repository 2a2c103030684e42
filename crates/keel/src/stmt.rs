mod primitive;
pub use primitive::Primitive;

pub use keel_core::stmt::{blob, Operator, Type, Value};
