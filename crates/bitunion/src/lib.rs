//! # bitunion
//!
//! C-style unions and bitfields over a single integer.
//!
//! Declare named fields as views onto one backing value: bit ranges given by a
//! mask or by size and offset, the whole value, fixed-width arrays packed from
//! bit 0, or zero-padded strings in a byte range. Fields may overlap; writing
//! through one changes what every overlapping field reads.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use bitunion::encoding::Encoding;
//! use bitunion::field::Field;
//! use bitunion::schema::Schema;
//! use bitunion::union::Union;
//! use bitunion::value::{Endian, Value};
//!
//! let schema = Arc::new(
//!     Schema::compile(
//!         "Some",
//!         &[
//!             Field::bitfield_mask("x", 0xff00),
//!             Field::bitfield("y", 8, 0),
//!             Field::scalar("foo"),
//!             Field::array("bar", 8, 4, Endian::Little),
//!             Field::string("string", 4, 0, Encoding::Utf8),
//!         ],
//!     )
//!     .unwrap(),
//! );
//!
//! let some = Union::with_values(schema, 0, [("x", 4u32), ("y", 64)]).unwrap();
//! assert_eq!(some.value(), 1088);
//! assert_eq!(some.get("bar").unwrap(), Value::Array(vec![64, 4, 0, 0]));
//! ```

pub mod bits;
pub mod compiled;
pub mod encoding;
pub mod errors;
pub mod field;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod union;
pub mod value;

pub use errors::{DeclareError, Error, ReadError, WriteError};
pub use field::Field;
pub use schema::Schema;
pub use union::Union;
pub use value::{Endian, Value};
