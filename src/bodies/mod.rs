mod body_type;
mod material;
mod lifecycle;
mod mutators;
mod fixture;

pub use self::material::Material;
pub use self::body_type::BodyKind;
