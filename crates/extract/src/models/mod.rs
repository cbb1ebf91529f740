mod field;
mod metadata;

pub use self::field::Field;
pub use self::metadata::Metadata;
