mod url_store;

pub use url_store::UrlStore;
