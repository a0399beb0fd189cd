//! Descriptor construction and persistence.

pub mod descriptor;
pub mod events;
pub mod makefile;

pub use descriptor::{build_descriptor, DescriptorBuilder};
pub use events::GenerateEvent;
pub use makefile::{render_makefile, DescriptorWriter, MakefileWriter, MemoryWriter};
