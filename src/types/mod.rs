//! Value types with a fixed binary layout.
//!
//! Besides the types defined here, [`Primitive`](crate::Primitive) is
//! implemented for [`half::f16`] and for `chrono`'s [`NaiveDateTime`],
//! [`NaiveDate`] and [`NaiveTime`].
//!
//! [`NaiveDateTime`]: chrono::NaiveDateTime
//! [`NaiveDate`]: chrono::NaiveDate
//! [`NaiveTime`]: chrono::NaiveTime

mod decimal;
mod numerics;
pub mod time;

pub use decimal::Decimal;
pub use numerics::{Matrix4x4, Quaternion, Vector2, Vector3, Vector4};
