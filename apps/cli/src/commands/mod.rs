pub mod defaults;
pub mod design;
pub mod interactive;
