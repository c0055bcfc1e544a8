//! Steganalysis tool for bitmap images.
//!
//! Brute-forces payloads hidden in the RGB least-significant bits of a BMP
//! image: every ordering of one, two or three channels is extracted and the
//! resulting byte streams are checked for known file signatures.
pub mod bitmap;
pub mod cli;
pub mod signature;
pub mod stego;
