//! Standard function blocks (E_RS, F_ADD, GEN_STRUCT_MUX, etc.).

#![allow(missing_docs)]

mod arith;
mod convert;
mod counters;
mod events;

pub use arith::{FAcos, FAdd, FAddDtTime, F_ACOS_SPEC, F_ADD_DT_TIME_SPEC, F_ADD_SPEC};
pub use convert::{struct_type_name, StructDemux, StructMux};
pub use counters::{FbCtdUdint, FB_CTD_UDINT_SPEC};
pub use events::{EDemux, ERs, E_DEMUX_SPEC, E_RS_SPEC};

use std::sync::Arc;

use crate::typelib::TypeLibrary;

/// Registers every standard FB type in `library`.
pub fn register(library: &TypeLibrary) {
    library.register_fb_type("E_RS", &E_RS_SPEC, || Box::new(ERs::new()));
    library.register_fb_type("E_DEMUX", &E_DEMUX_SPEC, || Box::new(EDemux));
    library.register_fb_type("F_ADD", &F_ADD_SPEC, || Box::new(FAdd));
    library.register_fb_type("F_ADD_DT_TIME", &F_ADD_DT_TIME_SPEC, || Box::new(FAddDtTime));
    library.register_fb_type("F_ACOS", &F_ACOS_SPEC, || Box::new(FAcos));
    library.register_fb_type("FB_CTD_UDINT", &FB_CTD_UDINT_SPEC, || Box::new(FbCtdUdint));
    library.register_generic_fb_type("GEN_STRUCT_MUX", Arc::new(StructMux));
    library.register_generic_fb_type("GEN_STRUCT_DEMUX", Arc::new(StructDemux));
}
