pub mod vivo;
