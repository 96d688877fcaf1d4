pub mod short_id;

pub use short_id::{SHORT_ID_LEN, short_id};
