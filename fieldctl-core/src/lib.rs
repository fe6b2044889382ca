pub mod config;
pub mod error;
pub mod field;
pub mod order_by;
pub mod query;
pub mod registry;
pub mod schema;
pub mod session;
pub mod statistics;

pub use config::{FieldctlConfig, SelectionDefaults};
pub use error::{FieldError, Result};
pub use field::{FieldEntry, FieldEvent};
pub use order_by::{OrderByField, OrderByList, SortOrder};
pub use query::StatisticsQuery;
pub use registry::{FieldObserver, FieldRegistry, ObserverId};
pub use schema::{Schema, SchemaField};
pub use session::SelectionSession;
pub use statistics::{StatisticDefinition, StatisticDefinitions, StatisticType};
