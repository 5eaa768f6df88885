pub mod autopick;
pub mod cloze;
pub mod io;
pub mod models;
pub mod outline;
pub mod picker;
pub mod relocate;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use autopick::{KnownSense, KnownSenses};
pub use cloze::Cloze;
pub use io::*;
pub use models::*;
pub use outline::{
    OutlineEntry, OutlineError, ParticleOutline, SectionNumber, SharedOutline, parse_outline,
};
pub use picker::{AlternateForms, ParticlePicker, ParticleQuery, Selection};
pub use relocate::{AcceptanceRule, BoundaryAdjacency, Relocator};
pub use session::{AnnotationSession, CarryOverReport};
