pub mod quote;

pub use quote::QuoteProvider;
