pub mod element_scorer;
