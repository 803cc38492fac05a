pub mod boundary;
pub mod flux;
pub mod mesh;
pub mod transport;
