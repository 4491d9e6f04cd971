pub mod analysis;
pub mod buffer;
pub mod decode;
pub mod features;
pub mod overview;
pub mod tempo;
