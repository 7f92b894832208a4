pub mod pipeline;

pub use pipeline::{IngestFailure, IngestOutcome, IngestReport, Pipeline};

pub mod prelude {
    pub use super::pipeline::{IngestFailure, IngestOutcome, IngestReport, Pipeline};
    pub use nd_core::{Error, RawArticle, Result};
}
