mod short_entry;

pub use short_entry::{BatchItem, BatchShortened, InsertOutcome, ShortEntry, UserUrl};
