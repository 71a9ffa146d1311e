//! WebExtension schema model: descriptors and their classification.

pub mod descriptor;
pub mod kind;

pub use descriptor::{
    AdditionalProperties, Asynchrony, CALLBACK_PARAM, Deprecation, Descriptor, EnumChoice,
    Optionality,
};
pub use kind::{DescriptorKind, classify};
