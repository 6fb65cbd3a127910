//! Asynchronous asset intake: the model scene and the annotation content
//! table each load independently and publish into read-mostly resources
//! exactly once; consumers guard on the readiness flags.

pub mod content;
pub mod model;
