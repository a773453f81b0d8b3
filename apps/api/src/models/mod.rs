pub mod annotation;
pub mod visibility;
