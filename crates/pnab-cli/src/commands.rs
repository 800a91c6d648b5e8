pub mod data;
pub mod options;
pub mod run;
