pub mod bmkg;
pub mod feature;
pub mod usgs;

pub use feature::{
    classify_impact, estimate_intensity, Feature, FeatureCollection, Geometry, Impact,
    QuakeProperties,
};
