mod quote_query;
mod quote_record;

pub use quote_query::QuoteQuery;
pub use quote_record::{NewQuote, QuoteRecord};
