// Seams between the sync pipeline and the outside world
pub mod ports;
