pub mod fill_data;
pub mod label_matcher;
pub mod similarity;
