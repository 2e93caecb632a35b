pub mod ngxc;

pub use ngxc::NgxcConfig;
