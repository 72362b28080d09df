pub mod tree_assertions;
