pub mod bitmap;
pub mod brush;
pub mod composite;
pub mod compress;
pub mod consts;
pub mod convert;
pub mod error;
pub mod history;
pub mod io;
pub mod layers;
pub mod pipeline;
pub mod removebg;
pub mod transform;
