pub mod csv_store;

pub use csv_store::{StoreError, read_samples, write_samples};
