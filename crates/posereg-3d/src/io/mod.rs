/// Wavefront OBJ reader module.
pub mod obj;
