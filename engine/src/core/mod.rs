pub mod frame_clock;
pub mod linkage;
