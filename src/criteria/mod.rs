//! Criteria model: fields, values, entries and the criteria chain.

#[allow(clippy::module_inception)]
pub mod criteria;
pub mod entry;
pub mod field;
pub mod value;

pub use self::criteria::{Conjunction, Criteria, CriteriaNode};
pub use self::entry::{CriteriaEntry, Operator};
pub use self::field::{Field, FieldKind};
pub use self::value::Value;
