// Pipeline processing: dictionary resolution, classification, normalization, aggregation

pub mod aggregate;
pub mod champion;
pub mod dictionary;
pub mod normalize;
pub mod origin;
