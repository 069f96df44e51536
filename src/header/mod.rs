pub mod native;

pub use native::{
    extract_region, has_native_header, CorruptHeader, PreviewKind, PreviewRegion, RegionOutcome,
    NATIVE_SIGNATURE,
};
