mod descriptor;

pub use self::descriptor::{ShapeKind, ShapeDescriptor, ShapeInfo};
