//! Pure data types shared by every later stage. Nothing in this module
//! performs I/O; it is the vocabulary the rest of the crate speaks.

pub mod graph;
pub mod id;
pub mod interval;
pub mod market;
pub mod money;
pub mod opportunity;
pub mod order_book;
pub mod relation;
pub mod threshold;

pub use graph::MarketGraph;
pub use id::{ClusterId, EventId, MarketId, OpportunityId, TokenId};
pub use interval::{Bound, Endpoint, IntervalInfo};
pub use market::{Event, Market, MarketFields, Side};
pub use money::{Price, Usd};
pub use opportunity::{
    ApyRating, Opportunity, OpportunityLeg, OracleAlignment, RequiredInputs, Status, Strategy, ValidationLayer,
    ValidationRecord,
};
pub use order_book::{OrderBook, PriceLevel};
pub use relation::{Cluster, RelationType, RelationshipAnalysis};
pub use threshold::{Boundary, Direction, Subject, ThresholdInfo};
