pub mod density;
pub mod orbital;
pub mod spherical;
