pub mod errors;
pub mod k8s;
pub mod logging;
pub mod prelude;
